use std::io::Cursor;

use boggle::boggle::word_search::{StepLimit, WordSearcher};
use boggle::boggle::{solve, solve_parallel, Board, Dictionary};
use boggle::config::WildcardPolicy;
use boggle::errors::WildcardLimitExceeded;

const WORDS: &str = "cat\ncar\ncart\nact\nrat\ntar\nstar\narts\nscat\ntact\nzebra\n";

fn dictionary() -> Dictionary {
    Dictionary::from_reader(Cursor::new(WORDS)).unwrap()
}

#[test]
fn wildcard_expands_to_every_first_letter() {
    let dict = Dictionary::build(vec!["ab", "xb"]);
    let board = Board::parse("*, b", 2).unwrap();
    let found = solve(&board, &dict);
    assert_eq!(found.len(), 2);
    assert!(found.contains("ab"));
    assert!(found.contains("xb"));
}

#[test]
fn diagonal_and_vertical_moves() {
    let dict = Dictionary::build(vec!["cat", "car"]);
    let board = Board::parse("C, A, T, R", 2).unwrap();
    let found = solve(&board, &dict);
    assert_eq!(found.iter().collect::<Vec<_>>(), vec!["car", "cat"]);
}

#[test]
fn missing_word_gives_empty_result() {
    let dict = Dictionary::build(vec!["zzz"]);
    let board = Board::parse("a, b, c, d, e, f, g, h, i, j, k, l, m, n, o, z", 4).unwrap();
    assert!(solve(&board, &dict).is_empty());
}

#[test]
fn repeated_searches_agree() {
    let dict = dictionary();
    let board = Board::parse("s, t, a, r, *, c, a, t, r, a, *, s, t, c, a, r", 4).unwrap();

    let first = solve(&board, &dict);
    assert_eq!(first, solve(&board, &dict));
    assert_eq!(first, solve_parallel(&board, &dict));

    let mut searcher = WordSearcher::new(&board, &dict);
    searcher.run_iterative();
    assert_eq!(first, searcher.finish().words);
}

#[test]
fn visited_grid_is_clean_after_search() {
    let dict = dictionary();
    let board = Board::parse("s, t, a, r, *, c, a, t, r, a, *, s, t, c, a, r", 4).unwrap();

    let mut searcher = WordSearcher::new(&board, &dict);
    searcher.run();
    assert!(searcher.visited().iter().all(|v| !v));

    let mut searcher = WordSearcher::with_budget(&board, &dict, StepLimit::new(50));
    searcher.run();
    assert!(!searcher.is_complete());
    assert!(searcher.visited().iter().all(|v| !v));
}

#[test]
fn too_many_wildcards_rejected_before_search() {
    let board = Board::parse("*, *, *, *, *, *, *, *, *, a, b, c, d, e, f, g", 4).unwrap();
    assert_eq!(board.count_wildcards(), 9);
    assert_eq!(
        WildcardPolicy { max: 8 }.enforce(&board),
        Err(WildcardLimitExceeded { count: 9, max: 8 })
    );
}

#[test]
fn sample_data_solves() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let dict = Dictionary::load(dir.join("dictionary.txt")).unwrap();
    let raw = std::fs::read_to_string(dir.join("test_board.txt")).unwrap();
    let board = Board::parse(&raw, 4).unwrap();
    let found = solve(&board, &dict);
    assert!(found.contains("cat"));
    assert!(found.contains("tar"));
    assert!(!found.contains("zebra"));
}
