// Core chess game logic modules
mod attacks;
pub mod board;
pub mod error;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod square;

// Re-export main types for convenience
pub use attacks::{DIAGONALS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONALS};
pub use board::{Board, CastlingRights, GameStatus};
pub use error::RulesError;
pub use moves::{Move, MoveType};
pub use piece::{Color, Piece, PieceType};
pub use square::Square;
