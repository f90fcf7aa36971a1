//! Move validation: a proposed grid must differ from the current one by a
//! single new mark of the mover's symbol.

use crate::common::InvalidMove;
use crate::grid::{Cell, Grid, Position, Symbol};

/// Check that `to` is `from` plus exactly one `symbol` mark on an empty cell.
///
/// Returns the changed position on success. Turn order and game status are
/// not considered here.
pub fn validate_transition(
    symbol: Symbol,
    from: &Grid,
    to: &Grid,
) -> Result<Position, InvalidMove> {
    let mut changes = from.diff(to);
    let pos = changes.next().ok_or(InvalidMove::NoChange)?;
    if changes.next().is_some() {
        return Err(InvalidMove::MultipleChanges);
    }
    if from.get(pos) != Cell::Empty {
        return Err(InvalidMove::OverwriteNonEmpty);
    }
    if to.get(pos) != symbol.mark() {
        return Err(InvalidMove::WrongSymbol);
    }
    Ok(pos)
}
