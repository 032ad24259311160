use chess_core::{Board, Color, GameStatus, Move, RulesError, Square};

fn play(board: &mut Board, moves: &[&str]) {
    for notation in moves {
        let mv = Move::from_coordinates(notation).unwrap();
        board
            .make_move(mv)
            .unwrap_or_else(|err| panic!("{} rejected: {}", notation, err));
    }
}

#[test]
fn scholars_mate() {
    let mut board = Board::new();
    play(
        &mut board,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );
    assert_eq!(board.current_turn(), Color::Black);
    assert!(board.is_in_check(Color::Black));
    assert_eq!(board.status(), GameStatus::Checkmate);
    assert!(board.legal_moves().is_empty());
}

#[test]
fn unwinding_a_game_restores_the_start() {
    let mut board = Board::new();
    let game = [
        "e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6", "b1c3", "a7a6",
        "f1e2", "e7e5", "e1g1",
    ];
    play(&mut board, &game);
    assert!(!board.castling_rights().kingside(Color::White));
    assert_eq!(board.ply_count(), game.len());

    for _ in 0..game.len() {
        board.unmake_move().unwrap();
    }
    assert_eq!(board, Board::new());
    assert_eq!(board.unmake_move(), Err(RulesError::NothingToUndo));
}

#[test]
fn moves_for_the_wrong_side_are_rejected() {
    let mut board = Board::new();
    let black_move = Move::new(
        Square::from_algebraic("e7").unwrap(),
        Square::from_algebraic("e5").unwrap(),
    );
    assert_eq!(board.make_move(black_move), Err(RulesError::NotYourTurn));
    assert_eq!(board, Board::new());
}
