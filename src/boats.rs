//! Concealed boat layouts.

use crate::bitboard::CellSet;
use crate::common::GridError;
use crate::config::{BOAT_COUNT, GRID_SIZE};
use crate::grid::{Cell, Grid, GridKind, Position};
use rand::Rng;

const N: usize = GRID_SIZE as usize;

/// The placements a layout may take: a single column or a full diagonal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BoatShape {
    /// Every boat in this column, taken modulo 5.
    Column(usize),
    MainDiagonal,
    AntiDiagonal,
}

impl BoatShape {
    /// Five columns plus two diagonals.
    pub const COUNT: usize = N + 2;

    /// Columns left to right, then the main and anti diagonals.
    pub fn all() -> impl Iterator<Item = BoatShape> {
        (0..Self::COUNT).map(Self::from_index)
    }

    fn from_index(i: usize) -> Self {
        match i {
            i if i < N => BoatShape::Column(i),
            i if i == N => BoatShape::MainDiagonal,
            _ => BoatShape::AntiDiagonal,
        }
    }

    pub fn cells(self) -> CellSet {
        match self {
            BoatShape::Column(c) => CellSet::column(c % N),
            BoatShape::MainDiagonal => CellSet::main_diagonal(),
            BoatShape::AntiDiagonal => CellSet::anti_diagonal(),
        }
    }
}

/// Five boats, one per row, along one [`BoatShape`]. Immutable once built.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoatLayout {
    shape: BoatShape,
    boats: CellSet,
}

impl BoatLayout {
    pub fn from_shape(shape: BoatShape) -> Self {
        let shape = match shape {
            BoatShape::Column(c) => BoatShape::Column(c % N),
            other => other,
        };
        Self {
            shape,
            boats: shape.cells(),
        }
    }

    /// Draw one of the seven shapes uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_shape(BoatShape::from_index(rng.random_range(0..BoatShape::COUNT)))
    }

    /// Read a layout from a boat grid. The `Boat` cells must form exactly
    /// one column or one full diagonal.
    pub fn from_grid(grid: &Grid) -> Result<Self, GridError> {
        grid.check_kind(GridKind::Boats)?;
        let boats = grid.cells_where(Cell::Boat);
        if boats.count_ones() != BOAT_COUNT {
            return Err(GridError::BadBoatLayout);
        }
        BoatShape::all()
            .find(|shape| shape.cells() == boats)
            .map(Self::from_shape)
            .ok_or(GridError::BadBoatLayout)
    }

    /// The shape these boats lie along.
    pub fn shape(&self) -> BoatShape {
        self.shape
    }

    pub fn has_boat(&self, pos: Position) -> bool {
        self.boats.get(pos.row(), pos.col()).unwrap_or(false)
    }

    /// Boat cells as a bit set.
    pub fn cells(&self) -> CellSet {
        self.boats
    }

    /// The layout as a `Boats` grid.
    pub fn to_grid(&self) -> Grid {
        let mut grid = Grid::empty();
        for (r, c) in self.boats.iter_set_bits() {
            if let Ok(p) = Position::new(r, c) {
                grid.set(p, Cell::Boat);
            }
        }
        grid
    }
}

#[cfg(feature = "std")]
impl serde::Serialize for BoatLayout {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_grid(), serializer)
    }
}

#[cfg(feature = "std")]
impl<'de> serde::Deserialize<'de> for BoatLayout {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let grid = <Grid as serde::Deserialize>::deserialize(deserializer)?;
        BoatLayout::from_grid(&grid).map_err(serde::de::Error::custom)
    }
}
