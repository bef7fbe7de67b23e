// 4x4 board, 26 letters + wildcard
pub mod board;
pub mod dictionary;
pub mod util;
pub mod word_search;

/// Number of tiles in a single row of the board
pub const BOARD_WIDTH: usize = 4;
/// Number of tiles on a randomly generated board
pub const NUM_TILES: usize = BOARD_WIDTH * BOARD_WIDTH;
/// Tile value that matches any single letter
pub const WILDCARD: char = '*';
/// Default cap on the number of wildcards a board may hold
pub const MAX_WILDCARDS: usize = 8;
/// Number of letters a trie node can branch on
pub const ALPHABET_SIZE: usize = 26;
/// Every value a tile can take when generating a board
pub const TILE_ALPHABET: [char; ALPHABET_SIZE + 1] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', WILDCARD,
];

pub use self::board::{Board, Tile};
pub use self::dictionary::{Dictionary, NodeId};
pub use self::util::{Direction, Position};
pub use self::word_search::{solve, solve_parallel, FoundWords, SearchOutcome, WordSearcher};
