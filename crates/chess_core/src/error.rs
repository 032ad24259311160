use thiserror::Error;

use crate::{Move, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("no piece at {0}")]
    NoPieceAt(Square),
    #[error("not your turn")]
    NotYourTurn,
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("no move to undo")]
    NothingToUndo,
    #[error("undo of {expected} requested but last move was {actual}")]
    UndoMismatch { expected: Move, actual: Move },
    #[error("invalid square {0:?}")]
    InvalidSquare(String),
}
