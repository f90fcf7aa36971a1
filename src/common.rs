//! Error taxonomy shared by the grid model and the game state machine.

use crate::bitboard::BitBoardError;

/// Malformed grid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("grid must have 5 rows, got {0}")]
    WrongRowCount(usize),
    #[error("row {row} must have 5 cells, got {len}")]
    WrongRowLength { row: usize, len: usize },
    #[error("cell ({row}, {col}) holds a value not allowed in this grid")]
    DisallowedCell { row: usize, col: usize },
    #[error("position ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("boat layout must hold exactly one boat per row")]
    BadBoatLayout,
}

impl From<BitBoardError> for GridError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { row, col } => GridError::OutOfBounds { row, col },
        }
    }
}

/// Why a proposed grid is not a single legal mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidMove {
    #[error("the proposed grid is unchanged")]
    NoChange,
    #[error("the proposed grid changes more than one cell")]
    MultipleChanges,
    #[error("the changed cell is already marked")]
    OverwriteNonEmpty,
    #[error("the changed cell does not hold the mover's symbol")]
    WrongSymbol,
}

/// A state the rules say cannot happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Violation {
    #[error("both symbols complete a line")]
    MultipleWinners,
    #[error("{0}")]
    MalformedGrid(GridError),
}

/// Errors returned by game operations. None of them changes game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameError {
    #[error("game does not exist")]
    GameNotFound,
    #[error("game cannot be joined")]
    GameNotJoinable,
    #[error("you are not part of this game")]
    NotAParticipant,
    #[error("the game is not started yet")]
    GameNotStarted,
    #[error("the game is already finished")]
    GameAlreadyFinished,
    #[error("it's not your turn")]
    NotYourTurn,
    #[error("invalid move: {0}")]
    InvalidMove(InvalidMove),
    #[error("invariant violation: {0}")]
    InvariantViolation(Violation),
}

impl From<InvalidMove> for GameError {
    fn from(err: InvalidMove) -> Self {
        GameError::InvalidMove(err)
    }
}

impl From<Violation> for GameError {
    fn from(err: Violation) -> Self {
        GameError::InvariantViolation(err)
    }
}

impl From<GridError> for GameError {
    fn from(err: GridError) -> Self {
        GameError::InvariantViolation(Violation::MalformedGrid(err))
    }
}
