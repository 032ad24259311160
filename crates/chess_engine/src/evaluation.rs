use chess_core::{Color, GameStatus, PieceType, Square};

use crate::rules::RulesEngine;

/// Scores are from White's perspective: positive favors White.
pub type Score = f64;

pub const MATE_SCORE: Score = 1000.0;
pub const DRAW_SCORE: Score = 0.0;

/// d4, e4, d5, e5
pub const CENTER_SQUARES: [Square; 4] = [
    Square { file: 4, rank: 4 },
    Square { file: 5, rank: 4 },
    Square { file: 4, rank: 5 },
    Square { file: 5, rank: 5 },
];

/// The four corners, where a king earns the safety bonus.
pub const KING_SAFETY_SQUARES: [Square; 4] = [
    Square { file: 1, rank: 1 },
    Square { file: 8, rank: 1 },
    Square { file: 1, rank: 8 },
    Square { file: 8, rank: 8 },
];

/// Positional bonus weights. A zero weight switches its term off entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationWeights {
    pub center_bonus: f64,
    pub control_bonus: f64,
    pub king_bonus: f64,
    pub check_bonus: f64,
}

impl EvaluationWeights {
    pub fn material_only() -> Self {
        Self {
            center_bonus: 0.0,
            control_bonus: 0.0,
            king_bonus: 0.0,
            check_bonus: 0.0,
        }
    }
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            center_bonus: 0.1,
            control_bonus: 0.05,
            king_bonus: 0.0,
            check_bonus: 0.5,
        }
    }
}

/// Returns the base material value of a piece, in pawns
pub fn piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => 1,
        PieceType::Knight => 3,
        PieceType::Bishop => 3,
        PieceType::Rook => 5,
        PieceType::Queen => 9,
        PieceType::King => 0,
    }
}

pub(crate) fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Unweighted evaluation inputs, each counted as White minus Black.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionTerms {
    pub material: i32,
    pub center: i32,
    pub king_corners: i32,
    pub control: i32,
    /// Whether the side to move is in check.
    pub in_check: bool,
}

impl PositionTerms {
    /// Combines the terms with `weights`.
    ///
    /// Every evaluator scores through here, so equal terms always give
    /// bit-identical scores whatever order they were counted in.
    pub fn weigh(&self, weights: &EvaluationWeights) -> Score {
        let mut score = self.material as Score + weights.center_bonus * self.center as Score;
        if weights.king_bonus != 0.0 {
            score += weights.king_bonus * self.king_corners as Score;
        }
        if weights.control_bonus != 0.0 {
            score += weights.control_bonus * self.control as Score;
        }
        if weights.check_bonus != 0.0 && self.in_check {
            score += weights.check_bonus;
        }
        score
    }
}

/// The fixed score of a finished game, or `None` while it is still going.
///
/// Checkmate is scored against the side that has to move.
pub fn terminal_score<B: RulesEngine + ?Sized>(board: &B) -> Option<Score> {
    match board.status() {
        GameStatus::Ongoing => None,
        GameStatus::Checkmate => Some(match board.side_to_move() {
            Color::Black => MATE_SCORE,
            Color::White => -MATE_SCORE,
        }),
        GameStatus::Stalemate | GameStatus::InsufficientMaterial | GameStatus::ClaimableDraw => {
            Some(DRAW_SCORE)
        }
    }
}

/// Evaluates a position by scanning every square.
pub fn evaluate_position<B: RulesEngine + ?Sized>(board: &B, weights: &EvaluationWeights) -> Score {
    let mut terms = PositionTerms::default();

    // Material, center occupancy and king corners in one pass
    for square in Square::all() {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };
        let side = sign(piece.color);

        terms.material += side * piece_value(piece.piece_type);
        if CENTER_SQUARES.contains(&square) {
            terms.center += side;
        }
        if piece.piece_type == PieceType::King && KING_SAFETY_SQUARES.contains(&square) {
            terms.king_corners += side;
        }
    }

    // A finished game replaces everything above
    if let Some(terminal) = terminal_score(board) {
        return terminal;
    }

    if weights.control_bonus != 0.0 {
        terms.control =
            board.control_count(Color::White) as i32 - board.control_count(Color::Black) as i32;
    }

    // Not mirrored: whichever side is to move, being in check adds the bonus
    terms.in_check = weights.check_bonus != 0.0 && board.is_in_check();

    terms.weigh(weights)
}
