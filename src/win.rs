//! Line-based win detection over the full 5×5 grid.

use crate::bitboard::CellSet;
use crate::common::Violation;
use crate::config::GRID_SIZE;
use crate::grid::{Grid, Symbol};

const N: usize = GRID_SIZE as usize;

/// Number of scanned lines: every row, every column, both diagonals.
pub const LINE_COUNT: usize = 2 * N + 2;

/// Masks of all scanned lines: rows top to bottom, columns left to right,
/// then the main and anti diagonals.
pub fn lines() -> [CellSet; LINE_COUNT] {
    core::array::from_fn(|i| match i {
        i if i < N => CellSet::row(i),
        i if i < 2 * N => CellSet::column(i - N),
        i if i == 2 * N => CellSet::main_diagonal(),
        _ => CellSet::anti_diagonal(),
    })
}

/// True if `cells` covers at least one complete line.
pub fn completes_line(cells: CellSet) -> bool {
    lines().iter().any(|line| cells.contains_all(*line))
}

/// The symbol owning a complete line, if any.
///
/// Lines completed by both symbols at once cannot arise from legal play and
/// are reported as [`Violation::MultipleWinners`].
pub fn evaluate_winner(grid: &Grid) -> Result<Option<Symbol>, Violation> {
    let x = completes_line(grid.cells_where(Symbol::X.mark()));
    let o = completes_line(grid.cells_where(Symbol::O.mark()));
    match (x, o) {
        (true, true) => Err(Violation::MultipleWinners),
        (true, false) => Ok(Some(Symbol::X)),
        (false, true) => Ok(Some(Symbol::O)),
        (false, false) => Ok(None),
    }
}

/// A full grid with no winner.
pub fn is_draw(grid: &Grid) -> Result<bool, Violation> {
    Ok(grid.is_full() && evaluate_winner(grid)?.is_none())
}
