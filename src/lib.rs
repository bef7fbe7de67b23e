//! Finds every dictionary word that can be traced on a grid of letter tiles.
//!
//! A word is traced by starting on any tile and moving to one of the 8
//! surrounding tiles for each following letter, never using a tile twice.
//! Wildcard tiles (`*`) stand for any letter.
//!
//! ```
//! use boggle::boggle::{solve, Board, Dictionary};
//!
//! let dict = Dictionary::build(vec!["cat", "car", "tar"]);
//! let board = Board::parse("c, a, t, r", 2)?;
//! let found = solve(&board, &dict);
//! assert_eq!(found.iter().collect::<Vec<_>>(), vec!["car", "cat", "tar"]);
//! # Ok::<(), boggle::errors::BoardConfigurationError>(())
//! ```

pub mod boggle;
pub mod config;
pub mod errors;
pub mod log;
pub mod utils;
