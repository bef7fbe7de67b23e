use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::boggle::{Board, BOARD_WIDTH, MAX_WILDCARDS};
use crate::errors::{ConfigError, WildcardLimitExceeded};

/// Settings for the boggle binary, read from a JSON file. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tiles per board row
    pub row_width: usize,
    /// Boards with more wildcards than this are rejected before searching
    pub max_wildcards: usize,
    /// Word list (`.txt`), fst set (`.fst`) or saved index (`.bin`)
    pub dictionary: PathBuf,
    /// Board used when neither a board nor a random one is requested
    pub default_board: PathBuf,
    /// Search each starting tile on its own thread
    pub parallel: bool,
    /// Stop searching after this many steps
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_width: BOARD_WIDTH,
            max_wildcards: MAX_WILDCARDS,
            dictionary: PathBuf::from("data/dictionary.txt"),
            default_board: PathBuf::from("data/test_board.txt"),
            parallel: false,
            max_steps: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn wildcard_policy(&self) -> WildcardPolicy {
        WildcardPolicy {
            max: self.max_wildcards,
        }
    }
}

/// Caps the number of wildcards a board may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildcardPolicy {
    pub max: usize,
}

impl WildcardPolicy {
    /// Returns the wildcard count if the board is within the cap
    pub fn enforce(&self, board: &Board) -> Result<usize, WildcardLimitExceeded> {
        let count = board.count_wildcards();
        if count > self.max {
            return Err(WildcardLimitExceeded {
                count,
                max: self.max,
            });
        }
        Ok(count)
    }
}
