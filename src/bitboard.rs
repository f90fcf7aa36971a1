//! A fixed-size bitboard implementation using const generics.
//!
//! The type is `no_std` friendly and avoids heap allocations. Boards are
//! represented as an `N×N` grid packed into an unsigned integer `T`, with
//! bit `row * N + col` standing for the cell at `(row, col)`. Besides the
//! per-cell accessors, the type can build the masks of the lines the win
//! evaluator scans: every row, every column and both full diagonals.

use core::fmt;
use core::ops::BitAnd;
use num_traits::{PrimInt, Unsigned, Zero};

use crate::config::GRID_SIZE;

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BitBoardError {
    /// Row or column index is out of bounds [0..N).
    #[error("IndexOutOfBounds: row={row}, col={col}")]
    IndexOutOfBounds { row: usize, col: usize },
}

/// A fixed-size N×N bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

/// The 5×5 cell set used for boats, marks and hits.
pub type CellSet = BitBoard<u32, { GRID_SIZE as usize }>;

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Number of usable bits in the board (`N * N`).
    const BOARD_BITS: usize = N * N;

    #[inline]
    fn mask() -> T {
        if Self::BOARD_BITS == core::mem::size_of::<T>() * 8 {
            !T::zero()
        } else {
            (T::one() << Self::BOARD_BITS) - T::one()
        }
    }

    #[inline]
    fn bit(row: usize, col: usize) -> T {
        T::one() << (row * N + col)
    }

    /// Create a new empty bitboard (all bits cleared).
    #[inline]
    pub fn new() -> Self {
        BitBoard { bits: T::zero() }
    }

    /// Cells of row `row`. Out-of-range rows give an empty board.
    pub fn row(row: usize) -> Self {
        (0..N).fold(Self::new(), |acc, col| acc.with(row, col))
    }

    /// Cells of column `col`. Out-of-range columns give an empty board.
    pub fn column(col: usize) -> Self {
        (0..N).fold(Self::new(), |acc, row| acc.with(row, col))
    }

    /// Top-left to bottom-right diagonal.
    pub fn main_diagonal() -> Self {
        (0..N).fold(Self::new(), |acc, i| acc.with(i, i))
    }

    /// Top-right to bottom-left diagonal.
    pub fn anti_diagonal() -> Self {
        (0..N).fold(Self::new(), |acc, i| acc.with(i, N - 1 - i))
    }

    fn with(mut self, row: usize, col: usize) -> Self {
        if row < N && col < N {
            self.bits = self.bits | Self::bit(row, col);
        }
        self
    }

    /// Returns the number of set bits (occupied cells).
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// Returns true if every cell set in `other` is also set here.
    pub fn contains_all(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        self.check_bounds(row, col)?;
        Ok((self.bits & Self::bit(row, col)) != T::zero())
    }

    /// Sets the bit at (row, col) to 1.
    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        self.check_bounds(row, col)?;
        self.bits = self.bits | Self::bit(row, col);
        Ok(())
    }

    #[inline]
    fn check_bounds(&self, row: usize, col: usize) -> Result<(), BitBoardError> {
        if row >= N || col >= N {
            Err(BitBoardError::IndexOutOfBounds { row, col })
        } else {
            Ok(())
        }
    }

    /// Creates a bitboard from the raw integer, masking out upper bits.
    #[inline]
    pub fn from_raw(raw: T) -> Self {
        BitBoard {
            bits: raw & Self::mask(),
        }
    }

    /// Iterator over the set bits of the board, in row-major order.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T, N> {
        SetBits {
            board: self,
            idx: 0,
        }
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BitBoard [")?;
        for (i, (r, c)) in self.iter_set_bits().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({}, {})", r, c)?;
        }
        f.write_str("]")
    }
}

/// Iterator over the set bits of a bitboard.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T, N>,
    idx: usize,
}

impl<'a, T, const N: usize> Iterator for SetBits<'a, T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < N * N {
            let idx = self.idx;
            self.idx += 1;
            if ((self.board.bits >> idx) & T::one()) != T::zero() {
                return Some((idx / N, idx % N));
            }
        }
        None
    }
}

impl<T, const N: usize> BitAnd for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        BitBoard::from_raw(self.bits & rhs.bits)
    }
}
