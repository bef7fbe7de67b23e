use std::collections::BTreeMap;
use std::ops::Range;
use std::time::{Duration, Instant};

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use super::board::{Board, Tile};
use super::dictionary::{Dictionary, NodeId};
use super::util::Position;
use super::ALPHABET_SIZE;

/*
    Backtracking search over the board guided by the dictionary trie.

    A path may start on any tile and continues to any of the 8 surrounding tiles that
    it has not used yet. Each step follows the trie branch for the tile's letter, or every
    branch when the tile is a wildcard, and stops as soon as no word can continue.
*/

/// Consulted once per step of a search. Returning false stops the search,
/// every tile already on the current path is still released.
pub trait SearchBudget {
    fn proceed(&mut self) -> bool;
}

/// Never stops a search
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl SearchBudget for Unlimited {
    fn proceed(&mut self) -> bool {
        true
    }
}

/// Allows a fixed number of steps
#[derive(Debug, Clone, Copy)]
pub struct StepLimit {
    remaining: u64,
}

impl StepLimit {
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }
}

impl SearchBudget for StepLimit {
    fn proceed(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Stops once a point in time has passed
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    until: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            until: Instant::now() + timeout,
        }
    }
}

impl SearchBudget for Deadline {
    fn proceed(&mut self) -> bool {
        Instant::now() < self.until
    }
}

/// Words discovered on a board. Serializes as `{"word": true, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FoundWords(BTreeMap<String, bool>);

impl<'de> Deserialize<'de> for FoundWords {
    /// Entries flagged `false` are not words of the board and are dropped
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut words = BTreeMap::<String, bool>::deserialize(deserializer)?;
        words.retain(|_, present| *present);
        Ok(Self(words))
    }
}

impl FoundWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the word was not present yet
    pub fn insert(&mut self, word: &str) -> bool {
        if self.0.contains_key(word) {
            return false;
        }
        self.0.insert(word.to_string(), true);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.get(word).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Words in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|w| w.as_str())
    }

    pub fn merge(&mut self, other: FoundWords) {
        self.0.extend(other.0);
    }
}

impl<S: AsRef<str>> std::iter::FromIterator<S> for FoundWords {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut tmp = Self::new();
        iter.into_iter().for_each(|w| {
            tmp.insert(w.as_ref());
        });
        tmp
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub words: FoundWords,
    /// False if the budget ran out before every path was explored
    pub complete: bool,
}

/// Explicit stack frame used by `WordSearcher::run_iterative`
#[derive(Debug)]
struct Frame {
    pos: Position,
    node: NodeId,
    /// Trie slots still to be tried at this tile
    slots: Range<usize>,
    /// Child currently being extended
    child: Option<NodeId>,
    neighbors: Vec<Position>,
    next: usize,
}

/// State for a single search over one board. The visited grid and the found
/// words belong to this searcher only, the dictionary is shared.
pub struct WordSearcher<'a, B: SearchBudget = Unlimited> {
    board: &'a Board,
    dict: &'a Dictionary,
    /// Tiles on the current path
    visited: Array2<bool>,
    found: FoundWords,
    budget: B,
    exhausted: bool,
}

impl<'a> WordSearcher<'a, Unlimited> {
    pub fn new(board: &'a Board, dict: &'a Dictionary) -> Self {
        Self::with_budget(board, dict, Unlimited)
    }
}

impl<'a, B: SearchBudget> WordSearcher<'a, B> {
    pub fn with_budget(board: &'a Board, dict: &'a Dictionary, budget: B) -> Self {
        Self {
            board,
            dict,
            visited: Array2::from_elem(board.shape(), false),
            found: FoundWords::new(),
            budget,
            exhausted: false,
        }
    }

    /// Explores every path starting on every tile
    pub fn run(&mut self) {
        let board = self.board;
        let root = self.dict.root();
        for pos in board.positions() {
            self.explore(pos, root);
        }
        log::debug!(
            "Searched {} tiles, found {} words (complete: {})",
            board.rows() * board.cols(),
            self.found.len(),
            !self.exhausted
        );
    }

    /// Explores every path starting on a single tile
    pub fn explore_from(&mut self, start: Position) {
        let root = self.dict.root();
        self.explore(start, root);
    }

    /// Trie slots to try at `pos` when arriving from `node`. None when the tile
    /// cannot extend any word.
    fn slots(&self, pos: Position, node: NodeId) -> Option<Range<usize>> {
        match self.board[pos] {
            Tile::Wildcard => Some(0..ALPHABET_SIZE),
            tile => {
                let i = tile.as_index()?;
                self.dict[node].child_at(i).map(|_| i..i + 1)
            }
        }
    }

    fn explore(&mut self, pos: Position, node: NodeId) {
        if self.exhausted {
            return;
        }
        if !self.budget.proceed() {
            self.exhausted = true;
            return;
        }
        if self.visited[pos.as_tuple()] {
            return;
        }
        let slots = match self.slots(pos, node) {
            Some(slots) => slots,
            None => return,
        };

        self.visited[pos.as_tuple()] = true;

        let dict = self.dict;
        let neighbors = pos.neighbors(self.board.shape());
        for child in slots.filter_map(|i| dict[node].child_at(i)) {
            if let Some(word) = dict[child].word() {
                self.found.insert(word);
            }
            for &next in neighbors.iter() {
                self.explore(next, child);
            }
        }

        self.visited[pos.as_tuple()] = false;
    }

    /// Same search as `run` using an explicit stack instead of recursion
    pub fn run_iterative(&mut self) {
        let board = self.board;
        for pos in board.positions() {
            self.explore_iterative(pos);
        }
    }

    fn enter(&mut self, pos: Position, node: NodeId) -> Option<Frame> {
        if self.exhausted {
            return None;
        }
        if !self.budget.proceed() {
            self.exhausted = true;
            return None;
        }
        if self.visited[pos.as_tuple()] {
            return None;
        }
        let slots = self.slots(pos, node)?;
        self.visited[pos.as_tuple()] = true;
        Some(Frame {
            pos,
            node,
            slots,
            child: None,
            neighbors: pos.neighbors(self.board.shape()),
            next: 0,
        })
    }

    fn explore_iterative(&mut self, start: Position) {
        let dict = self.dict;
        let mut stack = Vec::new();
        if let Some(frame) = self.enter(start, dict.root()) {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let child = match frame.child {
                Some(child) if frame.next < frame.neighbors.len() && !self.exhausted => child,
                _ => {
                    let node = frame.node;
                    let next_child = if self.exhausted {
                        None
                    } else {
                        frame.slots.find_map(|i| dict[node].child_at(i))
                    };
                    match next_child {
                        Some(child) => {
                            frame.child = Some(child);
                            frame.next = 0;
                            if let Some(word) = dict[child].word() {
                                self.found.insert(word);
                            }
                        }
                        None => {
                            // Every candidate is done, release the tile
                            let pos = frame.pos;
                            stack.pop();
                            self.visited[pos.as_tuple()] = false;
                        }
                    }
                    continue;
                }
            };

            let next = frame.neighbors[frame.next];
            frame.next += 1;
            if let Some(frame) = self.enter(next, child) {
                stack.push(frame);
            }
        }
    }

    pub fn visited(&self) -> &Array2<bool> {
        &self.visited
    }

    pub fn found(&self) -> &FoundWords {
        &self.found
    }

    pub fn is_complete(&self) -> bool {
        !self.exhausted
    }

    pub fn finish(self) -> SearchOutcome {
        SearchOutcome {
            words: self.found,
            complete: !self.exhausted,
        }
    }
}

/// Finds every dictionary word that can be traced on the board
pub fn solve(board: &Board, dict: &Dictionary) -> FoundWords {
    let mut searcher = WordSearcher::new(board, dict);
    searcher.run();
    searcher.finish().words
}

/// Like `solve`, but stops early once the budget runs out
pub fn solve_with_budget<B: SearchBudget>(board: &Board, dict: &Dictionary, budget: B) -> SearchOutcome {
    let mut searcher = WordSearcher::with_budget(board, dict, budget);
    searcher.run();
    searcher.finish()
}

/// Searches every starting tile on its own thread. Each task gets a private
/// visited grid, the results are merged at the end.
pub fn solve_parallel(board: &Board, dict: &Dictionary) -> FoundWords {
    board
        .positions()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|pos| {
            let mut searcher = WordSearcher::new(board, dict);
            searcher.explore_from(pos);
            searcher.finish().words
        })
        .reduce(FoundWords::new, |mut acc, words| {
            acc.merge(words);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(found: &FoundWords) -> Vec<&str> {
        found.iter().collect()
    }

    #[test]
    fn test_wildcard_fan_out() {
        let dict = Dictionary::build(vec!["ab", "xb"]);
        let board = Board::parse("*, b", 2).unwrap();
        let found = solve(&board, &dict);
        assert_eq!(words(&found), vec!["ab", "xb"]);
    }

    #[test]
    fn test_adjacency() {
        let dict = Dictionary::build(vec!["cat", "car"]);
        let board = Board::parse("c, a, t, r", 2).unwrap();
        let found = solve(&board, &dict);
        assert_eq!(words(&found), vec!["car", "cat"]);
    }

    #[test]
    fn test_no_match() {
        let dict = Dictionary::build(vec!["zzz"]);
        let board = Board::parse("z, a, b, z, c, d, e, f", 4).unwrap();
        assert!(solve(&board, &dict).is_empty());
    }

    #[test]
    fn test_tile_not_reused() {
        let dict = Dictionary::build(vec!["aa", "aba", "ab"]);
        let board = Board::parse("a, b", 2).unwrap();
        assert_eq!(words(&solve(&board, &dict)), vec!["ab"]);

        // A wildcard is still a single tile
        let dict = Dictionary::build(vec!["xx", "xyz"]);
        let board = Board::parse("*", 1).unwrap();
        assert!(solve(&board, &dict).is_empty());
    }

    #[test]
    fn test_wildcard_needs_enough_tiles() {
        let dict = Dictionary::build(vec!["ab", "xyz", "q"]);
        let board = Board::parse("*, *", 2).unwrap();
        assert_eq!(words(&solve(&board, &dict)), vec!["ab", "q"]);
    }

    #[test]
    fn test_duplicate_paths_collapse() {
        let dict = Dictionary::build(vec!["a", "aa"]);
        let board = Board::parse("a, a, a, a", 2).unwrap();
        let found = solve(&board, &dict);
        assert_eq!(found.len(), 2);
        assert!(found.contains("a"));
        assert!(found.contains("aa"));
        assert!(!found.contains("aaa"));
    }

    #[test]
    fn test_visited_cleared_after_search() {
        let dict = Dictionary::build(vec!["cat", "cart", "tact", "act", "rat", "tar"]);
        let board = Board::parse("c, a, *, t, r, t, a, *, c, a, t, s, *, r, c, a", 4).unwrap();

        let mut searcher = WordSearcher::new(&board, &dict);
        searcher.run();
        assert!(searcher.visited().iter().all(|v| !v));
        assert!(searcher.is_complete());

        let mut searcher = WordSearcher::new(&board, &dict);
        searcher.run_iterative();
        assert!(searcher.visited().iter().all(|v| !v));
    }

    #[test]
    fn test_deterministic() {
        let dict = Dictionary::build(vec!["cat", "cart", "tact", "act", "rat", "tar", "star", "arts"]);
        let board = Board::parse("s, t, a, r, *, c, a, t, r, a, *, s, t, c, a, r", 4).unwrap();
        let first = solve(&board, &dict);
        for _ in 0..5 {
            assert_eq!(first, solve(&board, &dict));
        }
        assert!(!first.is_empty());
    }

    #[test]
    fn test_iterative_matches_recursive() {
        let dict = Dictionary::build(vec![
            "cat", "cart", "tact", "act", "rat", "tar", "star", "arts", "a", "scat", "tsar", "zebra",
        ]);
        for raw in [
            "s, t, a, r, *, c, a, t, r, a, *, s, t, c, a, r",
            "*, *, *, *",
            "c, a, t, s",
            "z, e, b, r, *, a, q, q",
        ] {
            let board = Board::parse(raw, 4).unwrap();
            let mut searcher = WordSearcher::new(&board, &dict);
            searcher.run_iterative();
            assert_eq!(searcher.finish().words, solve(&board, &dict), "board {}", raw);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dict = Dictionary::build(vec!["cat", "cart", "tact", "act", "rat", "tar", "star", "arts"]);
        let board = Board::parse("s, t, a, r, *, c, a, t, r, a, *, s, t, c, a, r", 4).unwrap();
        assert_eq!(solve_parallel(&board, &dict), solve(&board, &dict));
    }

    #[test]
    fn test_step_budget() {
        let dict = Dictionary::build(vec!["cat", "car", "at"]);
        let board = Board::parse("c, a, t, r", 2).unwrap();

        let mut searcher = WordSearcher::with_budget(&board, &dict, StepLimit::new(3));
        searcher.run();
        assert!(!searcher.is_complete());
        assert!(searcher.visited().iter().all(|v| !v));

        let mut searcher = WordSearcher::with_budget(&board, &dict, StepLimit::new(3));
        searcher.run_iterative();
        assert!(!searcher.is_complete());
        assert!(searcher.visited().iter().all(|v| !v));

        let outcome = solve_with_budget(&board, &dict, StepLimit::new(u64::MAX));
        assert!(outcome.complete);
        assert_eq!(outcome.words, solve(&board, &dict));
    }

    #[test]
    fn test_expired_deadline() {
        let dict = Dictionary::build(vec!["cat"]);
        let board = Board::parse("c, a, t, r", 2).unwrap();
        let outcome = solve_with_budget(&board, &dict, Deadline::after(Duration::ZERO));
        assert!(!outcome.complete);
        assert!(outcome.words.is_empty());
    }

    #[test]
    fn test_found_words_json() {
        let found: FoundWords = vec!["cat", "car", "cat"].into_iter().collect();
        assert_eq!(found.len(), 2);
        let json = serde_json::to_string(&found).unwrap();
        assert_eq!(json, r#"{"car":true,"cat":true}"#);
        let decoded: FoundWords = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, found);
    }

    #[test]
    fn test_found_words_json_drops_false() {
        let decoded: FoundWords = serde_json::from_str(r#"{"x":false,"cat":true}"#).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(!decoded.contains("x"));
        assert_eq!(decoded.iter().collect::<Vec<_>>(), vec!["cat"]);
    }
}
