//! Incrementally maintained bitboard evaluator.
//!
//! Keeps one 64-bit occupancy mask per color and piece kind. After every
//! apply or undo only the squares the move touched are re-read from the
//! rules engine, so scoring never has to scan the board piece by piece.

use chess_core::{
    Color, Move, PieceType, Square, DIAGONALS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONALS,
};
use once_cell::sync::Lazy;

use crate::{
    evaluation::{piece_value, sign, terminal_score, EvaluationWeights, PositionTerms, Score},
    rules::RulesEngine,
};

// d4, e4, d5, e5
const CENTER_MASK: u64 = (1 << 27) | (1 << 28) | (1 << 35) | (1 << 36);
// a1, h1, a8, h8
const KING_SAFETY_MASK: u64 = (1 << 0) | (1 << 7) | (1 << 56) | (1 << 63);

static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| step_table(&KNIGHT_OFFSETS));
static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| step_table(&KING_OFFSETS));
static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    [
        step_table(&[(-1, 1), (1, 1)]),
        step_table(&[(-1, -1), (1, -1)]),
    ]
});

fn step_table(offsets: &[(i8, i8)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    for square in Square::all() {
        table[square.index()] = offsets
            .iter()
            .filter_map(|&(df, dr)| square.offset(df, dr))
            .fold(0, |acc, target| acc | target.bit());
    }
    table
}

fn sliding_attacks(from: Square, occupied: u64, directions: &[(i8, i8)]) -> u64 {
    let mut attacks = 0;
    for &(df, dr) in directions {
        let mut current = from.offset(df, dr);
        while let Some(square) = current {
            attacks |= square.bit();
            if occupied & square.bit() != 0 {
                break;
            }
            current = square.offset(df, dr);
        }
    }
    attacks
}

fn squares_of(mut bits: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if bits == 0 {
            return None;
        }
        let index = bits.trailing_zeros() as usize;
        bits &= bits - 1;
        Square::from_index(index)
    })
}

/// Squares a move can change: origin, destination, an en passant victim and a castling rook.
fn touched_squares(mv: Move) -> impl Iterator<Item = Square> {
    let rook = mv.castling_rook();
    [mv.from, mv.to]
        .into_iter()
        .chain(mv.en_passant_victim())
        .chain(rook.map(|(from, _)| from))
        .chain(rook.map(|(_, to)| to))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitboardEvaluator {
    weights: EvaluationWeights,
    // Indexed by Color::index, then PieceType::index
    pieces: [[u64; 6]; 2],
}

impl BitboardEvaluator {
    /// Builds the bitboards from a full scan, once per search.
    pub fn new<B: RulesEngine + ?Sized>(board: &B, weights: EvaluationWeights) -> Self {
        let mut evaluator = Self {
            weights,
            pieces: [[0; 6]; 2],
        };
        for square in Square::all() {
            evaluator.sync_square(board, square);
        }
        evaluator
    }

    /// Resynchronize after `mv` has been applied to `board`.
    pub fn after_apply<B: RulesEngine + ?Sized>(&mut self, board: &B, mv: Move) {
        for square in touched_squares(mv) {
            self.sync_square(board, square);
        }
    }

    /// Resynchronize after `mv` has been undone on `board`.
    pub fn after_undo<B: RulesEngine + ?Sized>(&mut self, board: &B, mv: Move) {
        self.after_apply(board, mv);
    }

    fn sync_square<B: RulesEngine + ?Sized>(&mut self, board: &B, square: Square) {
        let bit = square.bit();
        for boards in self.pieces.iter_mut() {
            for mask in boards.iter_mut() {
                *mask &= !bit;
            }
        }
        if let Some(piece) = board.piece_at(square) {
            self.pieces[piece.color.index()][piece.piece_type.index()] |= bit;
        }
    }

    pub fn pieces(&self, color: Color, piece_type: PieceType) -> u64 {
        self.pieces[color.index()][piece_type.index()]
    }

    pub fn occupancy(&self, color: Color) -> u64 {
        self.pieces[color.index()].iter().fold(0, |acc, mask| acc | mask)
    }

    pub fn attacks(&self, color: Color) -> u64 {
        let occupied = self.occupancy(Color::White) | self.occupancy(Color::Black);
        let mut attacks = 0;
        for piece_type in PieceType::ALL {
            for from in squares_of(self.pieces(color, piece_type)) {
                attacks |= match piece_type {
                    PieceType::Pawn => PAWN_ATTACKS[color.index()][from.index()],
                    PieceType::Knight => KNIGHT_ATTACKS[from.index()],
                    PieceType::King => KING_ATTACKS[from.index()],
                    PieceType::Bishop => sliding_attacks(from, occupied, &DIAGONALS),
                    PieceType::Rook => sliding_attacks(from, occupied, &ORTHOGONALS),
                    PieceType::Queen => {
                        sliding_attacks(from, occupied, &DIAGONALS)
                            | sliding_attacks(from, occupied, &ORTHOGONALS)
                    }
                };
            }
        }
        attacks
    }

    /// Same terms as [`evaluate_position`](crate::evaluation::evaluate_position),
    /// counted from the maintained bitboards.
    pub fn evaluate<B: RulesEngine + ?Sized>(&self, board: &B) -> Score {
        let mut terms = PositionTerms::default();

        for color in [Color::White, Color::Black] {
            let side = sign(color);
            for piece_type in PieceType::ALL {
                let count = self.pieces(color, piece_type).count_ones() as i32;
                terms.material += side * piece_value(piece_type) * count;
            }
            terms.center += side * (self.occupancy(color) & CENTER_MASK).count_ones() as i32;
            terms.king_corners +=
                side * (self.pieces(color, PieceType::King) & KING_SAFETY_MASK).count_ones() as i32;
        }

        if let Some(terminal) = terminal_score(board) {
            return terminal;
        }

        if self.weights.control_bonus != 0.0 {
            terms.control = self.attacks(Color::White).count_ones() as i32
                - self.attacks(Color::Black).count_ones() as i32;
        }
        terms.in_check = self.weights.check_bonus != 0.0 && board.is_in_check();

        terms.weigh(&self.weights)
    }
}
