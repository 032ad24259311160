use log::trace;

use crate::{
    attacks::{self, Squares},
    error::RulesError,
    piece::{Color, PieceType},
    Move, Piece, Square,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Drops the right tied to a rook corner once anything leaves or lands on it.
    fn touch(&mut self, square: Square) {
        match (square.file, square.rank) {
            (1, 1) => self.white_queenside = false,
            (8, 1) => self.white_kingside = false,
            (1, 8) => self.black_queenside = false,
            (8, 8) => self.black_kingside = false,
            _ => {}
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

/// Terminal state of a position, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    /// Fifty-move rule or threefold repetition.
    ClaimableDraw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate | GameStatus::InsufficientMaterial | GameStatus::ClaimableDraw
        )
    }
}

// Everything that decides whether two positions repeat
#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionKey {
    squares: Squares,
    turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UndoRecord {
    mv: Move,
    moved: Piece,
    captured: Option<Piece>,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    key: PositionKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Squares,
    current_turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<UndoRecord>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty(Color::White);
        board.castling_rights = CastlingRights::default();
        board.setup_initial_position();
        board
    }

    /// A board with no pieces and no castling rights, for building positions piece by piece.
    pub fn empty(turn: Color) -> Self {
        Self {
            squares: [None; 64],
            current_turn: turn,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    fn setup_initial_position(&mut self) {
        // Setup pawns
        for file in 1..=8 {
            self.squares[Square { file, rank: 2 }.index()] =
                Some(Piece::new(PieceType::Pawn, Color::White));
            self.squares[Square { file, rank: 7 }.index()] =
                Some(Piece::new(PieceType::Pawn, Color::Black));
        }

        // Setup other pieces
        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in (1..=8).zip(piece_order.iter()) {
            self.squares[Square { file, rank: 1 }.index()] =
                Some(Piece::new(piece_type, Color::White));
            self.squares[Square { file, rank: 8 }.index()] =
                Some(Piece::new(piece_type, Color::Black));
        }
    }

    /// Puts `piece` on `square`, returning whatever stood there before.
    pub fn place_piece(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.squares[square.index()].replace(piece)
    }

    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.current_turn = turn;
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights;
    }

    pub fn set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant = square;
    }

    pub fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    pub fn get_piece(&self, pos: Square) -> Option<Piece> {
        self.squares[pos.index()]
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mv)
    }

    /// Number of moves that can currently be taken back.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, piece)| Some((Square::from_index(index)?, (*piece)?)))
    }

    pub(crate) fn squares(&self) -> &Squares {
        &self.squares
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
            .map(|(pos, _)| pos)
    }

    /// Plays `chess_move` if it is legal for the side to move.
    ///
    /// Only `from`, `to` and `promotion` are compared; the move type of the
    /// matching generated move is what gets played.
    pub fn make_move(&mut self, chess_move: Move) -> Result<(), RulesError> {
        let piece = self
            .get_piece(chess_move.from)
            .ok_or(RulesError::NoPieceAt(chess_move.from))?;

        if piece.color != self.current_turn {
            return Err(RulesError::NotYourTurn);
        }

        let legal = self
            .legal_moves()
            .into_iter()
            .find(|candidate| candidate.matches(&chess_move))
            .ok_or(RulesError::IllegalMove(chess_move))?;

        self.make_move_unchecked(legal)
    }

    /// Plays a move taken from [`Board::legal_moves`] without validating it again.
    pub fn make_move_unchecked(&mut self, chess_move: Move) -> Result<(), RulesError> {
        let moved = self
            .get_piece(chess_move.from)
            .ok_or(RulesError::NoPieceAt(chess_move.from))?;
        let key = self.position_key();

        let captured = match chess_move.en_passant_victim() {
            Some(victim) => self.squares[victim.index()].take(),
            None => self.squares[chess_move.to.index()],
        };

        self.history.push(UndoRecord {
            mv: chess_move,
            moved,
            captured,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            key,
        });

        let final_piece = match chess_move.promotion {
            Some(promotion_type) => Piece::new(promotion_type, moved.color),
            None => moved,
        };
        self.squares[chess_move.from.index()] = None;
        self.squares[chess_move.to.index()] = Some(final_piece);

        if let Some((rook_from, rook_to)) = chess_move.castling_rook() {
            let rook = self.squares[rook_from.index()].take();
            self.squares[rook_to.index()] = rook;
        }

        if moved.piece_type == PieceType::King {
            self.castling_rights.revoke(moved.color);
        }
        self.castling_rights.touch(chess_move.from);
        self.castling_rights.touch(chess_move.to);

        let rank_diff = chess_move.to.rank as i8 - chess_move.from.rank as i8;
        self.en_passant = if moved.piece_type == PieceType::Pawn && rank_diff.abs() == 2 {
            Square::new(chess_move.from.file, (chess_move.from.rank as i8 + rank_diff / 2) as u8)
        } else {
            None
        };

        if moved.piece_type == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if moved.color == Color::Black {
            self.fullmove_number += 1;
        }
        self.current_turn = self.current_turn.opposite();

        trace!("made move {}", chess_move);
        Ok(())
    }

    /// Takes back the most recent move, restoring the exact prior state.
    pub fn unmake_move(&mut self) -> Result<Move, RulesError> {
        let record = self.history.pop().ok_or(RulesError::NothingToUndo)?;
        let chess_move = record.mv;

        self.current_turn = self.current_turn.opposite();
        if record.moved.color == Color::Black {
            self.fullmove_number -= 1;
        }

        self.squares[chess_move.to.index()] = None;
        self.squares[chess_move.from.index()] = Some(record.moved);
        match chess_move.en_passant_victim() {
            Some(victim) => self.squares[victim.index()] = record.captured,
            None => self.squares[chess_move.to.index()] = record.captured,
        }

        if let Some((rook_from, rook_to)) = chess_move.castling_rook() {
            let rook = self.squares[rook_to.index()].take();
            self.squares[rook_from.index()] = rook;
        }

        self.castling_rights = record.castling_rights;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;

        trace!("unmade move {}", chess_move);
        Ok(chess_move)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king_pos) => self.is_position_under_attack(king_pos, color),
            None => false,
        }
    }

    /// Whether the opponent of `defending_color` attacks `pos`.
    pub fn is_position_under_attack(&self, pos: Square, defending_color: Color) -> bool {
        attacks::is_attacked(&self.squares, pos, defending_color.opposite())
    }

    /// Union of every square attacked by `color`, one bit per [`Square::index`].
    pub fn attacked_squares(&self, color: Color) -> u64 {
        self.pieces()
            .filter(|(_, piece)| piece.color == color)
            .fold(0, |acc, (pos, piece)| {
                acc | attacks::attacks_from(&self.squares, pos, piece)
            })
    }

    /// Number of distinct squares `color` attacks.
    pub fn control_count(&self, color: Color) -> u32 {
        self.attacked_squares(color).count_ones()
    }

    pub fn status(&self) -> GameStatus {
        if !self.has_legal_moves() {
            if self.is_in_check(self.current_turn) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            }
        } else if self.has_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if self.can_claim_draw() {
            GameStatus::ClaimableDraw
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.current_turn) && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.current_turn) && !self.has_legal_moves()
    }

    pub fn has_insufficient_material(&self) -> bool {
        let mut white_pieces = Vec::new();
        let mut black_pieces = Vec::new();

        for (pos, piece) in self.pieces() {
            if piece.piece_type == PieceType::King {
                continue;
            }
            match piece.color {
                Color::White => white_pieces.push((pos, piece)),
                Color::Black => black_pieces.push((pos, piece)),
            }
        }

        match (white_pieces.as_slice(), black_pieces.as_slice()) {
            // King vs King
            ([], []) => true,
            // King and Bishop/Knight vs King
            ([(_, minor)], []) | ([], [(_, minor)]) => {
                matches!(minor.piece_type, PieceType::Bishop | PieceType::Knight)
            }
            // King and Bishop vs King and Bishop (same color bishops)
            ([(white_pos, white)], [(black_pos, black)]) => {
                white.piece_type == PieceType::Bishop
                    && black.piece_type == PieceType::Bishop
                    && white_pos.is_light() == black_pos.is_light()
            }
            _ => false,
        }
    }

    pub fn can_claim_draw(&self) -> bool {
        self.halfmove_clock >= 100 || self.repetition_count() >= 3
    }

    /// How many times the current position has occurred since the last
    /// capture or pawn move, counting the current occurrence.
    pub fn repetition_count(&self) -> usize {
        let key = self.position_key();
        let reversible = (self.halfmove_clock as usize).min(self.history.len());
        1 + self
            .history
            .iter()
            .rev()
            .take(reversible)
            .filter(|record| record.key == key)
            .count()
    }

    fn position_key(&self) -> PositionKey {
        PositionKey {
            squares: self.squares,
            turn: self.current_turn,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
        }
    }
}
