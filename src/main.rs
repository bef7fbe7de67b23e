use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};

use boggle::boggle::board::generate_random;
use boggle::boggle::word_search::{solve_with_budget, StepLimit};
use boggle::boggle::{solve, solve_parallel, Board, Dictionary, NUM_TILES, TILE_ALPHABET};
use boggle::config::Config;

/// Finds every word that can be traced on a boggle board
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a board and print the words found as JSON
    Solve {
        /// Comma separated tiles, e.g. "A, B, *, D, ..."
        #[arg(short, long, conflicts_with = "random")]
        board: Option<String>,

        /// Use a randomly generated board
        #[arg(short, long)]
        random: bool,

        /// Word list, fst set or saved index
        #[arg(short, long)]
        dictionary: Option<PathBuf>,

        /// Tiles per row
        #[arg(long)]
        row_width: Option<usize>,

        /// Maximum number of wildcards on the board
        #[arg(long)]
        max_wildcards: Option<usize>,

        /// Search starting tiles in parallel
        #[arg(long)]
        parallel: bool,

        /// Stop the search after this many steps
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Build the dictionary index once and save it for later runs
    Index {
        /// Word list or fst set to index
        dictionary: PathBuf,

        /// Where to write the index (use a `.bin` extension)
        #[arg(short, long, default_value = "data/dictionary.bin")]
        out: PathBuf,
    },
    /// Print a random board
    Random {
        /// Number of tiles
        #[arg(short, long, default_value_t = NUM_TILES)]
        tiles: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug_enabled = cli.debug || std::env::var("BOGGLE_DEBUG").is_ok();
    boggle::log::init_logger(debug_enabled);

    if let Err(e) = try_main(cli) {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Solve {
            board,
            random,
            dictionary,
            row_width,
            max_wildcards,
            parallel,
            max_steps,
        } => {
            // Command line flags win over the config file
            if let Some(dictionary) = dictionary {
                config.dictionary = dictionary;
            }
            if let Some(row_width) = row_width {
                config.row_width = row_width;
            }
            if let Some(max_wildcards) = max_wildcards {
                config.max_wildcards = max_wildcards;
            }
            config.parallel |= parallel;
            config.max_steps = max_steps.or(config.max_steps);

            let raw = if random {
                generate_random(NUM_TILES, &TILE_ALPHABET, &mut rand::thread_rng())
            } else if let Some(board) = board {
                board
            } else {
                std::fs::read_to_string(&config.default_board)?
            };
            run_solve(&config, &raw)
        }
        Command::Index { dictionary, out } => {
            let t_load = Instant::now();
            let dict = Dictionary::load(&dictionary)?;
            dict.save_cache(&out)?;
            eprintln!(
                "Indexed {} words ({} nodes) in {:.3}s, saved to {}",
                dict.len(),
                dict.node_count(),
                t_load.elapsed().as_secs_f64(),
                out.display()
            );
            Ok(())
        }
        Command::Random { tiles } => {
            println!("{}", generate_random(tiles, &TILE_ALPHABET, &mut rand::thread_rng()));
            Ok(())
        }
    }
}

fn run_solve(config: &Config, raw: &str) -> Result<(), Box<dyn std::error::Error>> {
    let board = Board::parse(raw, config.row_width)?;
    let wildcards = config.wildcard_policy().enforce(&board)?;
    log::info!(
        "Board {}x{} with {} wildcards",
        board.rows(),
        board.cols(),
        wildcards
    );
    eprint!("{}", board);

    let t_load = Instant::now();
    let dict = Dictionary::load(&config.dictionary)?;
    let load_secs = t_load.elapsed().as_secs_f64();

    let t_solve = Instant::now();
    let (words, complete) = match (config.parallel, config.max_steps) {
        (true, Some(_)) => {
            log::warn!("max_steps is ignored for parallel searches");
            (solve_parallel(&board, &dict), true)
        }
        (true, None) => (solve_parallel(&board, &dict), true),
        (false, Some(steps)) => {
            let outcome = solve_with_budget(&board, &dict, StepLimit::new(steps));
            (outcome.words, outcome.complete)
        }
        (false, None) => (solve(&board, &dict), true),
    };
    let solve_secs = t_solve.elapsed().as_secs_f64();

    println!("{}", serde_json::to_string_pretty(&words)?);

    if !complete {
        eprintln!("Step budget ran out; some words may be missing");
    }
    eprintln!(
        "Loaded {} words in {:.3}s; found {} words in {:.3}s.",
        dict.len(),
        load_secs,
        words.len(),
        solve_secs
    );
    Ok(())
}
