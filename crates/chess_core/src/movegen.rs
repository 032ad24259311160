//! Legal move generation.
//!
//! Moves are produced pseudo-legally per piece and then filtered by replaying
//! them on a scratch copy of the square array and checking the mover's king.

use crate::{
    attacks::{self, Squares, DIAGONALS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONALS},
    piece::{Color, PieceType},
    Board, Move, Piece, Square,
};

impl Board {
    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for (from, piece) in self.pieces() {
            if piece.color == self.current_turn() {
                self.push_legal_moves_from(from, piece, &mut moves);
            }
        }
        moves
    }

    /// Stops at the first legal move found.
    pub fn has_legal_moves(&self) -> bool {
        let mut moves = Vec::new();
        for (from, piece) in self.pieces() {
            if piece.color == self.current_turn() {
                self.push_legal_moves_from(from, piece, &mut moves);
                if !moves.is_empty() {
                    return true;
                }
            }
        }
        false
    }

    /// Legal moves of the piece on `pos`, empty if it does not belong to the side to move.
    pub fn get_valid_moves(&self, pos: Square) -> Vec<Move> {
        let mut valid_moves = Vec::new();
        if let Some(piece) = self.get_piece(pos) {
            if piece.color == self.current_turn() {
                self.push_legal_moves_from(pos, piece, &mut valid_moves);
            }
        }
        valid_moves
    }

    fn push_legal_moves_from(&self, from: Square, piece: Piece, out: &mut Vec<Move>) {
        let mut pseudo = Vec::new();
        match piece.piece_type {
            PieceType::Pawn => self.pawn_moves(from, piece.color, &mut pseudo),
            PieceType::Knight => self.step_moves(from, piece.color, &KNIGHT_OFFSETS, &mut pseudo),
            PieceType::Bishop => self.slide_moves(from, piece.color, &DIAGONALS, &mut pseudo),
            PieceType::Rook => self.slide_moves(from, piece.color, &ORTHOGONALS, &mut pseudo),
            PieceType::Queen => {
                self.slide_moves(from, piece.color, &DIAGONALS, &mut pseudo);
                self.slide_moves(from, piece.color, &ORTHOGONALS, &mut pseudo);
            }
            PieceType::King => {
                self.step_moves(from, piece.color, &KING_OFFSETS, &mut pseudo);
                self.castling_moves(from, piece.color, &mut pseudo);
            }
        }

        out.extend(
            pseudo
                .into_iter()
                .filter(|&mv| !self.leaves_king_in_check(mv, piece.color)),
        );
    }

    fn leaves_king_in_check(&self, mv: Move, color: Color) -> bool {
        let mut scratch: Squares = *self.squares();
        let moved = scratch[mv.from.index()].take();
        if let Some(victim) = mv.en_passant_victim() {
            scratch[victim.index()] = None;
        }
        if let Some((rook_from, rook_to)) = mv.castling_rook() {
            let rook = scratch[rook_from.index()].take();
            scratch[rook_to.index()] = rook;
        }
        scratch[mv.to.index()] = moved;

        let king = scratch
            .iter()
            .enumerate()
            .find(|(_, p)| **p == Some(Piece::new(PieceType::King, color)))
            .and_then(|(index, _)| Square::from_index(index));
        match king {
            Some(king) => attacks::is_attacked(&scratch, king, color.opposite()),
            None => false,
        }
    }

    fn pawn_moves(&self, from: Square, color: Color, out: &mut Vec<Move>) {
        let direction = color.pawn_direction();
        let start_rank = if color == Color::White { 2 } else { 7 };
        let promotion_rank = color.opposite().back_rank();

        // Basic forward movement
        if let Some(one) = from.offset(0, direction) {
            if self.get_piece(one).is_none() {
                push_pawn_move(out, Move::new(from, one), promotion_rank);

                // Initial two-square move
                if from.rank == start_rank {
                    if let Some(two) = one.offset(0, direction) {
                        if self.get_piece(two).is_none() {
                            out.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for file_step in [-1, 1] {
            let Some(to) = from.offset(file_step, direction) else {
                continue;
            };
            match self.get_piece(to) {
                Some(target) if target.color != color => {
                    push_pawn_move(out, Move::capture(from, to), promotion_rank)
                }
                None if self.en_passant() == Some(to) => out.push(Move::en_passant(from, to)),
                _ => {}
            }
        }
    }

    fn step_moves(&self, from: Square, color: Color, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
        for &(df, dr) in offsets {
            let Some(to) = from.offset(df, dr) else {
                continue;
            };
            match self.get_piece(to) {
                None => out.push(Move::new(from, to)),
                Some(target) if target.color != color => out.push(Move::capture(from, to)),
                Some(_) => {}
            }
        }
    }

    fn slide_moves(
        &self,
        from: Square,
        color: Color,
        directions: &[(i8, i8)],
        out: &mut Vec<Move>,
    ) {
        for &(df, dr) in directions {
            let mut current = from.offset(df, dr);
            while let Some(to) = current {
                match self.get_piece(to) {
                    None => out.push(Move::new(from, to)),
                    Some(target) => {
                        if target.color != color {
                            out.push(Move::capture(from, to));
                        }
                        break;
                    }
                }
                current = to.offset(df, dr);
            }
        }
    }

    fn castling_moves(&self, from: Square, color: Color, out: &mut Vec<Move>) {
        let rank = color.back_rank();
        let Some(king_home) = Square::new(5, rank) else {
            return;
        };
        if from != king_home || self.is_in_check(color) {
            return;
        }

        let rights = self.castling_rights();
        // (allowed, rook file, files that must be empty, files the king crosses, king target file)
        let sides: [(bool, u8, &[u8], [u8; 2], u8); 2] = [
            (rights.kingside(color), 8, &[6, 7], [6, 7], 7),
            (rights.queenside(color), 1, &[2, 3, 4], [4, 3], 3),
        ];

        for (allowed, rook_file, empty_files, crossed_files, target_file) in sides {
            if !allowed {
                continue;
            }
            let rook_home = Square::new(rook_file, rank);
            if rook_home.and_then(|sq| self.get_piece(sq)) != Some(Piece::new(PieceType::Rook, color)) {
                continue;
            }
            let path_clear = empty_files
                .iter()
                .filter_map(|&file| Square::new(file, rank))
                .all(|sq| self.get_piece(sq).is_none());
            if !path_clear {
                continue;
            }
            let path_safe = crossed_files
                .iter()
                .filter_map(|&file| Square::new(file, rank))
                .all(|sq| !self.is_position_under_attack(sq, color));
            if !path_safe {
                continue;
            }
            if let Some(to) = Square::new(target_file, rank) {
                out.push(Move::castle(from, to));
            }
        }
    }
}

fn push_pawn_move(out: &mut Vec<Move>, mv: Move, promotion_rank: u8) {
    if mv.to.rank == promotion_rank {
        for promotion in PieceType::PROMOTIONS {
            out.push(Move {
                promotion: Some(promotion),
                ..mv
            });
        }
    } else {
        out.push(mv);
    }
}

#[cfg(test)]
mod tests {
    use crate::{moves::MoveType, CastlingRights};

    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    /// Counts leaf nodes of the legal move tree, the standard move generator check.
    fn perft(board: &mut Board, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut nodes = 0;
        for mv in board.legal_moves() {
            board.make_move_unchecked(mv).unwrap();
            nodes += perft(board, depth - 1);
            board.unmake_move().unwrap();
        }
        nodes
    }

    #[test]
    fn twenty_opening_moves() {
        let board = Board::new();
        let moves = board.legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(board.has_legal_moves());
        assert_eq!(board.get_valid_moves(sq("g1")).len(), 2);
        assert!(board.get_valid_moves(sq("g8")).is_empty());
    }

    #[test]
    fn perft_from_start() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(perft(&mut board, 3), 8_902);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn promotions_generate_four_choices() {
        let mut board = Board::empty(Color::White);
        board.place_piece(sq("a7"), Piece::new(PieceType::Pawn, Color::White));
        board.place_piece(sq("b8"), Piece::new(PieceType::Rook, Color::Black));
        board.place_piece(sq("h1"), Piece::new(PieceType::King, Color::White));
        board.place_piece(sq("h8"), Piece::new(PieceType::King, Color::Black));

        let pawn_moves = board.get_valid_moves(sq("a7"));
        // a8 push and b8 capture, each with four promotion pieces
        assert_eq!(pawn_moves.len(), 8);
        assert!(pawn_moves.iter().all(|mv| mv.promotion.is_some()));
        assert_eq!(
            pawn_moves
                .iter()
                .filter(|mv| mv.move_type == MoveType::Capture)
                .count(),
            4
        );
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut board = Board::empty(Color::White);
        board.place_piece(sq("e1"), Piece::new(PieceType::King, Color::White));
        board.place_piece(sq("e2"), Piece::new(PieceType::Knight, Color::White));
        board.place_piece(sq("e8"), Piece::new(PieceType::Rook, Color::Black));
        board.place_piece(sq("a8"), Piece::new(PieceType::King, Color::Black));

        assert!(board.get_valid_moves(sq("e2")).is_empty());
    }

    #[test]
    fn castling_blocked_through_check() {
        let mut board = Board::empty(Color::White);
        board.place_piece(sq("e1"), Piece::new(PieceType::King, Color::White));
        board.place_piece(sq("a1"), Piece::new(PieceType::Rook, Color::White));
        board.place_piece(sq("h1"), Piece::new(PieceType::Rook, Color::White));
        board.place_piece(sq("f8"), Piece::new(PieceType::Rook, Color::Black));
        board.place_piece(sq("a8"), Piece::new(PieceType::King, Color::Black));
        board.set_castling_rights(CastlingRights {
            white_kingside: true,
            white_queenside: true,
            ..CastlingRights::none()
        });

        let castles: Vec<Move> = board
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.move_type == MoveType::Castle)
            .collect();
        assert_eq!(castles, vec![Move::castle(sq("e1"), sq("c1"))]);
    }

    #[test]
    fn en_passant_only_on_target_square() {
        let mut board = Board::empty(Color::White);
        board.place_piece(sq("e5"), Piece::new(PieceType::Pawn, Color::White));
        board.place_piece(sq("d5"), Piece::new(PieceType::Pawn, Color::Black));
        board.place_piece(sq("f5"), Piece::new(PieceType::Pawn, Color::Black));
        board.place_piece(sq("a1"), Piece::new(PieceType::King, Color::White));
        board.place_piece(sq("h8"), Piece::new(PieceType::King, Color::Black));
        board.set_en_passant(Some(sq("d6")));

        let moves = board.get_valid_moves(sq("e5"));
        assert!(moves.contains(&Move::en_passant(sq("e5"), sq("d6"))));
        assert!(!moves.iter().any(|mv| mv.to == sq("f6")));
        assert!(Move::from_coordinates("e5d6").unwrap().is_valid(&board));
    }
}
