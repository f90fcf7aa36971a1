//! The 5×5 grid shared by marks and concealed boat layouts.
//!
//! A [`Grid`] is a flat array of [`GRID_CELLS`] cells addressed by
//! [`Position`], so the 5×5 shape holds by construction. Nested row data
//! coming from outside goes through [`Grid::from_rows`] (or
//! [`is_valid_grid`]) before anything else looks at it.

use crate::bitboard::CellSet;
use crate::common::GridError;
use crate::config::{GRID_CELLS, GRID_SIZE};
use core::fmt;

const N: usize = GRID_SIZE as usize;

/// A player's mark symbol. `X` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The symbol of the other player.
    pub fn other(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// The cell value this symbol writes.
    pub fn mark(self) -> Cell {
        match self {
            Symbol::X => Cell::PlayerX,
            Symbol::O => Cell::PlayerO,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => f.write_str("x"),
            Symbol::O => f.write_str("o"),
        }
    }
}

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    PlayerX,
    PlayerO,
    /// Only valid in a concealed boat layout.
    Boat,
}

impl Cell {
    /// The symbol whose mark this is, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::PlayerX => Some(Symbol::X),
            Cell::PlayerO => Some(Symbol::O),
            Cell::Empty | Cell::Boat => None,
        }
    }

    fn as_char(self) -> Option<char> {
        match self {
            Cell::Empty => None,
            Cell::PlayerX => Some('x'),
            Cell::PlayerO => Some('o'),
            Cell::Boat => Some('b'),
        }
    }
}

/// Which cell values a grid may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    /// A marks grid: `Empty`, `PlayerX`, `PlayerO`.
    Marks,
    /// A concealed boat layout: `Empty`, `Boat`.
    Boats,
}

impl GridKind {
    pub fn allows(self, cell: Cell) -> bool {
        match self {
            GridKind::Marks => matches!(cell, Cell::Empty | Cell::PlayerX | Cell::PlayerO),
            GridKind::Boats => matches!(cell, Cell::Empty | Cell::Boat),
        }
    }
}

/// A bounds-checked cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Result<Self, GridError> {
        if row >= N || col >= N {
            return Err(GridError::OutOfBounds { row, col });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Row-major index into a flat grid.
    pub fn index(&self) -> usize {
        self.row() * N + self.col()
    }

    fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / N) as u8,
            col: (idx % N) as u8,
        }
    }

    /// Every position in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_CELLS).map(Self::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A fixed 5×5 grid of cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Cell; GRID_CELLS],
}

impl Grid {
    /// A grid with every cell `Empty`.
    pub const fn empty() -> Self {
        Self {
            cells: [Cell::Empty; GRID_CELLS],
        }
    }

    /// Build a grid from nested rows, checking the 5×5 shape.
    ///
    /// Cell values are not checked against a [`GridKind`]; use
    /// [`Grid::check_kind`] or [`Grid::from_rows_of_kind`] for that.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, GridError> {
        if rows.len() != N {
            return Err(GridError::WrongRowCount(rows.len()));
        }
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != N {
                return Err(GridError::WrongRowLength {
                    row: r,
                    len: row.len(),
                });
            }
            grid.cells[r * N..(r + 1) * N].copy_from_slice(row);
        }
        Ok(grid)
    }

    /// Build a grid from nested rows, checking both shape and cell values.
    pub fn from_rows_of_kind<R: AsRef<[Cell]>>(
        rows: &[R],
        kind: GridKind,
    ) -> Result<Self, GridError> {
        let grid = Self::from_rows(rows)?;
        grid.check_kind(kind)?;
        Ok(grid)
    }

    /// Reports the first cell not allowed in a grid of `kind`.
    pub fn check_kind(&self, kind: GridKind) -> Result<(), GridError> {
        match Position::all().find(|p| !kind.allows(self.get(*p))) {
            Some(p) => Err(GridError::DisallowedCell {
                row: p.row(),
                col: p.col(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.index()] = cell;
    }

    /// Copy of this grid with one cell replaced.
    pub fn with(mut self, pos: Position, cell: Cell) -> Self {
        self.set(pos, cell);
        self
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(N)
    }

    /// Positions holding `cell`.
    pub fn cells_where(&self, cell: Cell) -> CellSet {
        let mut set = CellSet::new();
        for p in Position::all().filter(|p| self.get(*p) == cell) {
            // positions are always in range
            let _ = set.set(p.row(), p.col());
        }
        set
    }

    /// True when no cell is `Empty`.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Positions where `self` and `other` differ, in row-major order.
    pub fn diff<'a>(&'a self, other: &'a Grid) -> impl Iterator<Item = Position> + 'a {
        Position::all().filter(move |p| self.get(*p) != other.get(*p))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{")?;
        for row in self.rows() {
            f.write_str("  ")?;
            for cell in row {
                write!(f, "{} ", cell.as_char().unwrap_or('.'))?;
            }
            writeln!(f)?;
        }
        f.write_str("}")
    }
}

/// True iff `rows` is exactly 5 rows of 5 cells, each allowed in `kind`.
pub fn is_valid_grid<R: AsRef<[Cell]>>(rows: &[R], kind: GridKind) -> bool {
    Grid::from_rows_of_kind(rows, kind).is_ok()
}

#[cfg(feature = "std")]
mod wire {
    //! Boards travel as 5 rows of `null | "x" | "o" | "b"`.

    use super::{Cell, Grid, Position};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::vec::Vec;

    impl Serialize for Cell {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.as_char() {
                None => serializer.serialize_none(),
                Some(c) => serializer.serialize_some(&c),
            }
        }
    }

    impl<'de> Deserialize<'de> for Cell {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            match Option::<char>::deserialize(deserializer)? {
                None => Ok(Cell::Empty),
                Some('x') => Ok(Cell::PlayerX),
                Some('o') => Ok(Cell::PlayerO),
                Some('b') => Ok(Cell::Boat),
                Some(other) => Err(de::Error::invalid_value(
                    de::Unexpected::Char(other),
                    &"null, \"x\", \"o\" or \"b\"",
                )),
            }
        }
    }

    impl Serialize for Grid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.rows())
        }
    }

    impl<'de> Deserialize<'de> for Grid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
            Grid::from_rows(&rows).map_err(de::Error::custom)
        }
    }

    #[derive(Deserialize)]
    #[serde(rename = "Position")]
    struct RawPosition {
        row: u8,
        col: u8,
    }

    /// Positions from the wire go through the same bounds check as
    /// [`Position::new`].
    impl<'de> Deserialize<'de> for Position {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = RawPosition::deserialize(deserializer)?;
            Position::new(raw.row as usize, raw.col as usize).map_err(de::Error::custom)
        }
    }
}
