use std::fmt;

use crate::{piece::PieceType, Board, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    Capture,
    EnPassant,
    Castle,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Normal,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
            move_type: MoveType::Normal,
        }
    }

    pub fn capture(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Capture,
        }
    }

    pub fn en_passant(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::EnPassant,
        }
    }

    pub fn castle(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Castle,
        }
    }

    /// Parses coordinate notation such as `e2e4` or `e7e8q`. The move type is
    /// left as `Normal`; [`Board::make_move`] resolves it against the legal moves.
    pub fn from_coordinates(notation: &str) -> Option<Self> {
        let from = Square::from_algebraic(notation.get(0..2)?)?;
        let to = Square::from_algebraic(notation.get(2..4)?)?;
        let promotion = match notation.get(4..) {
            None | Some("") => None,
            Some("q") => Some(PieceType::Queen),
            Some("r") => Some(PieceType::Rook),
            Some("b") => Some(PieceType::Bishop),
            Some("n") => Some(PieceType::Knight),
            Some(_) => return None,
        };
        Some(Self {
            from,
            to,
            promotion,
            move_type: MoveType::Normal,
        })
    }

    /// Same squares and promotion, ignoring the move type tag.
    pub fn matches(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.move_type, MoveType::Capture | MoveType::EnPassant)
    }

    /// The square of the pawn removed by an en passant capture.
    pub fn en_passant_victim(&self) -> Option<Square> {
        match self.move_type {
            MoveType::EnPassant => Square::new(self.to.file, self.from.rank),
            _ => None,
        }
    }

    /// Rook origin and destination for a castling move.
    pub fn castling_rook(&self) -> Option<(Square, Square)> {
        if self.move_type != MoveType::Castle {
            return None;
        }
        let rank = self.from.rank;
        if self.to.file == 7 {
            Some((Square::new(8, rank)?, Square::new(6, rank)?))
        } else {
            Some((Square::new(1, rank)?, Square::new(4, rank)?))
        }
    }

    /// Whether this move is legal on `board` for the side to move.
    pub fn is_valid(&self, board: &Board) -> bool {
        board.legal_moves().iter().any(|legal| legal.matches(self))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.symbol())?;
        }
        Ok(())
    }
}
