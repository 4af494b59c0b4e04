//! Core value types shared across the crate

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the maze grid
///
/// Positions are plain values compared by equality; whether a position is
/// valid depends on the grid it is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift one cell in the direction of `action`.
    ///
    /// Returns `None` when the move would leave a `size`x`size` grid.
    pub fn step(self, action: Action, size: usize) -> Option<Position> {
        let (row, col) = match action {
            Action::North => (self.row.checked_sub(1)?, self.col),
            Action::East => (self.row, self.col + 1),
            Action::South => (self.row + 1, self.col),
            Action::West => (self.row, self.col.checked_sub(1)?),
        };
        (row < size && col < size).then_some(Position { row, col })
    }

    /// Manhattan distance to another position
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four moves available in every state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    North,
    East,
    South,
    West,
}

impl Action {
    pub const COUNT: usize = 4;

    /// All actions in index order
    pub const ALL: [Action; Action::COUNT] =
        [Action::North, Action::East, Action::South, Action::West];

    pub fn index(self) -> usize {
        match self {
            Action::North => 0,
            Action::East => 1,
            Action::South => 2,
            Action::West => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::North => "north",
            Action::East => "east",
            Action::South => "south",
            Action::West => "west",
        };
        f.write_str(name)
    }
}
