use std::slice::Iter;

use serde::{Deserialize, Serialize};

/// King-move offsets from a tile. The order of `Direction::iter` is the order
/// neighbours are visited in during a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownRight,
    DownLeft,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn iter() -> Iter<'static, Direction> {
        static DIRS: [Direction; 8] = [
            Direction::UpLeft,
            Direction::UpRight,
            Direction::DownRight,
            Direction::DownLeft,
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        DIRS.iter()
    }

    /// Row and column deltas for the direction
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::UpRight => (-1, 1),
            Self::DownRight => (1, 1),
            Self::DownLeft => (1, -1),
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the position one step away in the given direction, or None if it
    /// falls off a grid of `shape` (rows, cols). There is no wraparound.
    pub fn step(&self, dir: Direction, shape: (usize, usize)) -> Option<Position> {
        let (dr, dc) = dir.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row < shape.0 && col < shape.1 {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Returns every in-bounds adjacent position (all 8 directions)
    pub fn neighbors(&self, shape: (usize, usize)) -> Vec<Position> {
        let mut result = Vec::with_capacity(8);
        for d in Direction::iter() {
            if let Some(pos) = self.step(*d, shape) {
                result.push(pos);
            }
        }
        result
    }

    /// Converts the row/col to a 1d index
    pub fn as_index(&self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// Index form used by ndarray
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
