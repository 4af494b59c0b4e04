//! Grid representation, maze file parsing and serialization

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::Position};

/// A cell on the maze grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Free,
    Wall,
    Start,
    Goal,
    /// Marks a cell visited while replaying a learned policy
    Trace,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Free => '0',
            Cell::Wall => 'W',
            Cell::Start => 'S',
            Cell::Goal => 'G',
            Cell::Trace => 'X',
        }
    }

    /// Parse a cell from the maze file alphabet.
    ///
    /// `Trace` is output-only and is not accepted here.
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '0' => Some(Cell::Free),
            'W' => Some(Cell::Wall),
            'S' => Some(Cell::Start),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }
}

/// Square maze grid stored row-major in a flat vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    start: Position,
    goal: Position,
}

impl Grid {
    /// Create an obstacle-free grid with Start in the top-left corner and
    /// Goal in the bottom-right corner.
    ///
    /// # Errors
    ///
    /// Returns an error if `size < 2` (Start and Goal would coincide).
    pub fn open(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid size must be at least 2, got {size}"),
            });
        }
        let start = Position::new(0, 0);
        let goal = Position::new(size - 1, size - 1);
        let mut cells = vec![Cell::Free; size * size];
        cells[0] = Cell::Start;
        cells[size * size - 1] = Cell::Goal;
        Ok(Self {
            size,
            cells,
            start,
            goal,
        })
    }

    /// Parse a maze from its text form.
    ///
    /// The text must hold exactly `size` lines of exactly `size` characters
    /// drawn from `0`, `W`, `S`, `G`, with one `S` and one `G`. No grid is
    /// returned unless the whole input validates.
    pub fn parse(text: &str, size: usize) -> Result<Self> {
        if size < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid size must be at least 2, got {size}"),
            });
        }

        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != size {
            return Err(Error::InvalidLineCount {
                expected: size,
                got: lines.len(),
            });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (line_idx, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != size {
                return Err(Error::InvalidLineLength {
                    line: line_idx + 1,
                    expected: size,
                    got: width,
                });
            }
            for (col, c) in line.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                    character: c,
                    line: line_idx + 1,
                    column: col + 1,
                })?;
                cells.push(cell);
            }
        }

        let start = Self::find_unique(&cells, size, Cell::Start)?;
        let goal = Self::find_unique(&cells, size, Cell::Goal)?;

        Ok(Self {
            size,
            cells,
            start,
            goal,
        })
    }

    /// Load a maze file with the configured dimensions.
    pub fn load<P: AsRef<Path>>(path: P, size: usize) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read maze file {}", path.display()), e))?;
        Self::parse(&text, size)
    }

    /// Write the maze in file format.
    ///
    /// Trace marks are written back as free cells so the output always
    /// parses again.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_maze_string())
            .map_err(|e| Error::io(format!("write maze file {}", path.display()), e))
    }

    /// Maze file text, one newline-terminated line per row
    pub fn to_maze_string(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size) {
            for &cell in row {
                let cell = if cell == Cell::Trace { Cell::Free } else { cell };
                out.push(cell.to_char());
            }
            out.push('\n');
        }
        out
    }

    fn find_unique(cells: &[Cell], size: usize, wanted: Cell) -> Result<Position> {
        let mut found = cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == wanted)
            .map(|(i, _)| Position::new(i / size, i % size));
        match (found.next(), found.count()) {
            (Some(position), 0) => Ok(position),
            (first, rest) => Err(Error::InvalidMarkerCount {
                cell: wanted.to_char(),
                count: usize::from(first.is_some()) + rest,
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.size && position.col < self.size
    }

    fn index(&self, position: Position) -> Result<usize> {
        if self.contains(position) {
            Ok(position.row * self.size + position.col)
        } else {
            Err(Error::OutOfRange {
                position,
                size: self.size,
            })
        }
    }

    /// Look up the cell at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the position is outside the grid.
    pub fn cell_at(&self, position: Position) -> Result<Cell> {
        self.index(position).map(|i| self.cells[i])
    }

    /// Overwrite a cell.
    ///
    /// Start and Goal are fixed once the grid is built; writes to them are
    /// rejected.
    pub fn set(&mut self, position: Position, cell: Cell) -> Result<()> {
        let idx = self.index(position)?;
        if position == self.start || position == self.goal {
            return Err(Error::InvalidConfiguration {
                message: format!("cannot overwrite Start/Goal cell at {position}"),
            });
        }
        if matches!(cell, Cell::Start | Cell::Goal) {
            return Err(Error::InvalidConfiguration {
                message: format!("cannot place a second {cell:?} at {position}"),
            });
        }
        self.cells[idx] = cell;
        Ok(())
    }

    /// Every position on the grid in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size * self.size).map(move |i| Position::new(i / self.size, i % self.size))
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
