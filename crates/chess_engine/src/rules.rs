use chess_core::{Board, Color, GameStatus, Move, Piece, RulesError, Square};

/// The slice of a rules implementation the search consumes.
///
/// `apply` and `undo` must be strictly paired and `undo` must restore the
/// exact state that preceded the matching `apply`.
pub trait RulesEngine {
    fn legal_moves(&self) -> Vec<Move>;
    fn apply(&mut self, mv: Move) -> Result<(), RulesError>;
    fn undo(&mut self, mv: Move) -> Result<(), RulesError>;
    fn status(&self) -> GameStatus;
    fn side_to_move(&self) -> Color;
    /// Whether the side to move is in check.
    fn is_in_check(&self) -> bool;
    fn piece_at(&self, square: Square) -> Option<Piece>;
    /// Number of distinct squares attacked by `color`.
    fn control_count(&self, color: Color) -> u32;
}

impl RulesEngine for Board {
    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn apply(&mut self, mv: Move) -> Result<(), RulesError> {
        self.make_move_unchecked(mv)
    }

    fn undo(&mut self, mv: Move) -> Result<(), RulesError> {
        match self.last_move() {
            Some(last) if last == mv => self.unmake_move().map(|_| ()),
            Some(actual) => Err(RulesError::UndoMismatch {
                expected: mv,
                actual,
            }),
            None => Err(RulesError::NothingToUndo),
        }
    }

    fn status(&self) -> GameStatus {
        Board::status(self)
    }

    fn side_to_move(&self) -> Color {
        self.current_turn()
    }

    fn is_in_check(&self) -> bool {
        Board::is_in_check(self, self.current_turn())
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.get_piece(square)
    }

    fn control_count(&self, color: Color) -> u32 {
        Board::control_count(self, color)
    }
}
