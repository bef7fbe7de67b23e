use std::fmt;

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::util::Position;
use super::{ALPHABET_SIZE, WILDCARD};
use crate::errors::BoardConfigurationError;

static SEP: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tile {
    Wildcard,
    Letter(char),
}

impl Tile {
    /// Parses a single normalized token. Anything other than one lowercase
    /// ascii letter or the wildcard is rejected.
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(WILDCARD), None) => Some(Tile::Wildcard),
            (Some(c), None) if c.is_ascii_lowercase() => Some(Tile::Letter(c)),
            _ => None,
        }
    }

    /// Position of the letter in the alphabet, None for wildcards
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Wildcard => None,
            Self::Letter(l) => (*l as usize)
                .checked_sub('a' as usize)
                .filter(|&i| i < ALPHABET_SIZE),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "{}", WILDCARD),
            Self::Letter(l) => write!(f, "{}", l),
        }
    }
}

/// Rectangular grid of tiles. Built once per game and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
}

impl Board {
    /// Parses a comma separated board such as `"A, B, C, *"`. Whitespace is
    /// ignored, letters are case-insensitive and the tiles are laid out in rows
    /// of `row_width`.
    pub fn parse(raw: &str, row_width: usize) -> Result<Self, BoardConfigurationError> {
        if row_width == 0 {
            return Err(BoardConfigurationError::InvalidRowWidth);
        }

        let normalized = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let tokens = normalized.split(SEP).collect::<Vec<_>>();

        if tokens.len() % row_width != 0 {
            return Err(BoardConfigurationError::RaggedBoard {
                tokens: tokens.len(),
                row_width,
            });
        }

        let tiles = tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                Tile::parse(token).ok_or_else(|| BoardConfigurationError::InvalidToken {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = tiles.len() / row_width;
        let tiles = Array2::from_shape_vec((rows, row_width), tiles).map_err(|_| {
            BoardConfigurationError::RaggedBoard {
                tokens: tokens.len(),
                row_width,
            }
        })?;
        Ok(Self { tiles })
    }

    /// Builds a board directly from rows of tiles
    pub fn from_tiles(tiles: Array2<Tile>) -> Self {
        Self { tiles }
    }

    pub fn rows(&self) -> usize {
        self.tiles.nrows()
    }

    pub fn cols(&self) -> usize {
        self.tiles.ncols()
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.tiles.dim()
    }

    /// Number of wildcard tiles. Every wildcard multiplies the branching of a
    /// search by up to the alphabet size, so callers cap it before searching.
    pub fn count_wildcards(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_wildcard()).count()
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (rows, cols) = self.shape();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Position { row, col }))
    }

    /// Canonical comma separated form, accepted by `Board::parse`
    pub fn to_raw(&self) -> String {
        self.tiles
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::ops::Index<Position> for Board {
    type Output = Tile;

    fn index(&self, index: Position) -> &Self::Output {
        &self.tiles[index.as_tuple()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.tiles.rows() {
            let line = row.iter().map(|t| t.to_string()).collect::<Vec<_>>();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Generates a raw board string with every tile drawn uniformly and
/// independently from `alphabet`. Tiles are separated by ", ".
pub fn generate_random<R: Rng + ?Sized>(tile_count: usize, alphabet: &[char], rng: &mut R) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let picks = Array1::random_using(tile_count, Uniform::new(0, alphabet.len()), rng);
    picks
        .iter()
        .map(|&i| alphabet[i].to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
