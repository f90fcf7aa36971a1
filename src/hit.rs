//! Hit detection against an opponent's concealed boats.

use crate::bitboard::CellSet;
use crate::boats::BoatLayout;
use crate::grid::Position;

/// True iff the opponent has a boat at `pos`.
pub fn evaluate_hit(pos: Position, opponent: &BoatLayout) -> bool {
    opponent.has_boat(pos)
}

/// True once `hits` covers every boat in `opponent`.
pub fn all_boats_hit(hits: CellSet, opponent: &BoatLayout) -> bool {
    hits.contains_all(opponent.cells())
}
