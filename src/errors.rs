//! Error types for building a dictionary index, parsing boards and loading
//! configuration.
//!
//! The word search itself has no error type: it only ever runs on a parsed
//! [`Board`](crate::boggle::Board) and a built [`Dictionary`](crate::boggle::Dictionary).

use std::path::PathBuf;

use thiserror::Error;

/// A raw board string that cannot be turned into a rectangular grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardConfigurationError {
    #[error("row width must be at least 1")]
    InvalidRowWidth,

    #[error("board has {tokens} tiles, which is not a multiple of the row width {row_width}")]
    RaggedBoard { tokens: usize, row_width: usize },

    #[error("tile {index} ('{token}') must be a single letter or the wildcard '*'")]
    InvalidToken { index: usize, token: String },
}

/// Raised by callers whose policy caps the number of wildcard tiles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("There can only be a maximum of {max} wildcards (board has {count})")]
pub struct WildcardLimitExceeded {
    pub count: usize,
    pub max: usize,
}

/// The word source for the index could not be used. Fatal for the caller,
/// nothing can be searched without an index.
#[derive(Debug, Error)]
pub enum DictionaryLoadError {
    #[error("failed to read word list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read word list: {0}")]
    Read(#[from] std::io::Error),

    #[error("word list contains no usable words")]
    Empty,

    #[error("corrupt dictionary index: {0}")]
    Corrupt(String),

    #[error("invalid fst word set: {0}")]
    Fst(#[from] fst::Error),

    #[error("invalid dictionary cache: {0}")]
    Cache(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
