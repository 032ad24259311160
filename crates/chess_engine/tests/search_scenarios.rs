use std::collections::HashSet;
use std::time::Duration;

use chess_core::{Board, Color, GameStatus, Move, Piece, PieceType, RulesError, Square};
use chess_engine::{
    find_best_move, ChessAI, EvaluationWeights, RulesEngine, SearchConfig, SearchError,
    MATE_SCORE,
};
use rand::{rngs::StdRng, SeedableRng};

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn mv(notation: &str) -> Move {
    Move::from_coordinates(notation).unwrap()
}

fn put(board: &mut Board, square: &str, piece_type: PieceType, color: Color) {
    board.place_piece(sq(square), Piece::new(piece_type, color));
}

fn seeded(config: SearchConfig, seed: u64) -> ChessAI {
    ChessAI::with_rng(config.with_max_thinking_time(None), StdRng::seed_from_u64(seed))
}

fn back_rank_mate_for_white() -> Board {
    let mut board = Board::empty(Color::White);
    put(&mut board, "g8", PieceType::King, Color::Black);
    for square in ["f7", "g7", "h7"] {
        put(&mut board, square, PieceType::Pawn, Color::Black);
    }
    put(&mut board, "e1", PieceType::Rook, Color::White);
    put(&mut board, "g1", PieceType::King, Color::White);
    for square in ["f2", "g2", "h2"] {
        put(&mut board, square, PieceType::Pawn, Color::White);
    }
    board
}

fn back_rank_mate_for_black() -> Board {
    let mut board = Board::empty(Color::Black);
    put(&mut board, "g8", PieceType::King, Color::Black);
    put(&mut board, "e8", PieceType::Rook, Color::Black);
    put(&mut board, "g1", PieceType::King, Color::White);
    for square in ["f2", "g2", "h2"] {
        put(&mut board, square, PieceType::Pawn, Color::White);
    }
    board
}

#[test]
fn opening_move_is_legal() {
    let mut board = Board::new();
    let best = find_best_move(&mut board, 1, None, EvaluationWeights::default()).unwrap();
    let legal = RulesEngine::legal_moves(&board);
    assert_eq!(legal.len(), 20);
    assert!(legal.contains(&best));
    assert_eq!(board, Board::new());
}

#[test]
fn white_finds_back_rank_mate() {
    for config in [SearchConfig::new(2), SearchConfig::bitboard(2)] {
        let mut board = back_rank_mate_for_white();
        let outcome = seeded(config, 11).search(&mut board).unwrap();
        assert_eq!(outcome.best_move, mv("e1e8"));
        assert_eq!(outcome.score, MATE_SCORE);
        assert!(outcome.completed);
        assert_eq!(board, back_rank_mate_for_white());
    }
}

#[test]
fn black_finds_back_rank_mate() {
    for config in [SearchConfig::new(2), SearchConfig::bitboard(2)] {
        let mut board = back_rank_mate_for_black();
        let outcome = seeded(config, 5).search(&mut board).unwrap();
        assert_eq!(outcome.best_move, mv("e8e1"));
        assert_eq!(outcome.score, -MATE_SCORE);
    }
}

#[test]
fn single_legal_move_is_played() {
    let mut board = Board::empty(Color::White);
    put(&mut board, "a8", PieceType::King, Color::Black);
    put(&mut board, "g8", PieceType::Rook, Color::Black);
    put(&mut board, "a1", PieceType::Rook, Color::Black);
    put(&mut board, "h1", PieceType::King, Color::White);
    assert_eq!(RulesEngine::legal_moves(&board), vec![mv("h1h2")]);

    let best = seeded(SearchConfig::new(3), 2)
        .find_best_move(&mut board)
        .unwrap();
    assert_eq!(best, mv("h1h2"));
}

#[test]
fn zero_budget_still_returns_a_legal_move() {
    for config in [SearchConfig::new(4), SearchConfig::bitboard(4)] {
        let mut board = Board::new();
        let mut ai = ChessAI::with_rng(
            config.with_max_thinking_time(Some(Duration::ZERO)),
            StdRng::seed_from_u64(9),
        );
        let outcome = ai.search(&mut board).unwrap();
        assert!(!outcome.completed);
        assert!(RulesEngine::legal_moves(&board).contains(&outcome.best_move));
        assert_eq!(board, Board::new());
    }
}

#[test]
fn same_seed_same_choice() {
    let mut board = Board::new();
    let first = seeded(SearchConfig::new(2), 42).search(&mut board).unwrap();
    let second = seeded(SearchConfig::new(2), 42).search(&mut board).unwrap();
    assert_eq!(first, second);
}

#[test]
fn ties_are_broken_randomly() {
    let config = SearchConfig::new(1).with_weights(EvaluationWeights::material_only());
    let mut board = Board::new();
    let chosen: HashSet<Move> = (0..20)
        .map(|seed| {
            let outcome = seeded(config.clone(), seed).search(&mut board).unwrap();
            assert_eq!(outcome.score, 0.0);
            outcome.best_move
        })
        .collect();
    assert!(chosen.len() > 1);
}

#[test]
fn both_variants_agree_on_the_root_value() {
    let mut board = Board::new();
    for notation in ["e2e4", "d7d5", "g1f3"] {
        board.make_move(mv(notation)).unwrap();
    }

    for weights in [EvaluationWeights::default(), EvaluationWeights::material_only()] {
        for depth in 1..=3 {
            let standard = seeded(SearchConfig::new(depth).with_weights(weights), 1)
                .search(&mut board)
                .unwrap();
            let bitboard = seeded(SearchConfig::bitboard(depth).with_weights(weights), 1)
                .search(&mut board)
                .unwrap();
            assert_eq!(standard.score, bitboard.score, "depth {}", depth);
            assert_eq!(standard.best_move, bitboard.best_move, "depth {}", depth);
        }
    }
}

#[test]
fn finished_games_are_rejected() {
    let mut board = Board::empty(Color::Black);
    put(&mut board, "a8", PieceType::King, Color::Black);
    put(&mut board, "b6", PieceType::Queen, Color::White);
    put(&mut board, "c1", PieceType::King, Color::White);

    let result = seeded(SearchConfig::new(2), 0).find_best_move(&mut board);
    assert_eq!(result, Err(SearchError::GameOver(GameStatus::Stalemate)));
}

/// Records every apply and undo made against a real board.
struct Recorder {
    board: Board,
    stack: Vec<Move>,
    applies: usize,
    deepest: usize,
}

impl RulesEngine for Recorder {
    fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves()
    }

    fn apply(&mut self, mv: Move) -> Result<(), RulesError> {
        self.board.apply(mv)?;
        self.stack.push(mv);
        self.applies += 1;
        self.deepest = self.deepest.max(self.stack.len());
        Ok(())
    }

    fn undo(&mut self, mv: Move) -> Result<(), RulesError> {
        assert_eq!(self.stack.pop(), Some(mv));
        self.board.undo(mv)
    }

    fn status(&self) -> GameStatus {
        self.board.status()
    }

    fn side_to_move(&self) -> Color {
        self.board.current_turn()
    }

    fn is_in_check(&self) -> bool {
        RulesEngine::is_in_check(&self.board)
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get_piece(square)
    }

    fn control_count(&self, color: Color) -> u32 {
        self.board.control_count(color)
    }
}

#[test]
fn every_apply_is_undone_in_reverse_order() {
    for config in [SearchConfig::new(3), SearchConfig::bitboard(3)] {
        let mut recorder = Recorder {
            board: back_rank_mate_for_white(),
            stack: Vec::new(),
            applies: 0,
            deepest: 0,
        };
        seeded(config, 8).search(&mut recorder).unwrap();

        assert!(recorder.applies > 0);
        assert_eq!(recorder.deepest, 3);
        assert!(recorder.stack.is_empty());
        assert_eq!(recorder.board, back_rank_mate_for_white());
    }
}
