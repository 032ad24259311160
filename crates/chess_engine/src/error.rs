use chess_core::{GameStatus, RulesError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The root position has no legal moves to choose from.
    #[error("game is already over: {0:?}")]
    GameOver(GameStatus),
    #[error("rules engine rejected a search step: {0}")]
    Rules(#[from] RulesError),
}
