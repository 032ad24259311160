//! Attack detection over a raw 64-square piece array.
//!
//! These helpers take the array rather than a [`Board`](crate::Board) so move
//! legality can be tested on a scratch copy without touching the board history.

use crate::{Color, Piece, PieceType, Square};

pub(crate) type Squares = [Option<Piece>; 64];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

fn step_attacks(from: Square, offsets: &[(i8, i8)]) -> u64 {
    offsets
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .fold(0, |acc, sq| acc | sq.bit())
}

fn ray_attacks(squares: &Squares, from: Square, directions: &[(i8, i8)]) -> u64 {
    let mut attacks = 0;
    for &(df, dr) in directions {
        let mut current = from.offset(df, dr);
        while let Some(sq) = current {
            attacks |= sq.bit();
            // The first occupied square blocks the ray but is still attacked
            if squares[sq.index()].is_some() {
                break;
            }
            current = sq.offset(df, dr);
        }
    }
    attacks
}

/// Squares attacked by `piece` standing on `from`, as a bitboard.
pub(crate) fn attacks_from(squares: &Squares, from: Square, piece: Piece) -> u64 {
    match piece.piece_type {
        PieceType::Pawn => {
            let dir = piece.color.pawn_direction();
            step_attacks(from, &[(-1, dir), (1, dir)])
        }
        PieceType::Knight => step_attacks(from, &KNIGHT_OFFSETS),
        PieceType::King => step_attacks(from, &KING_OFFSETS),
        PieceType::Bishop => ray_attacks(squares, from, &DIAGONALS),
        PieceType::Rook => ray_attacks(squares, from, &ORTHOGONALS),
        PieceType::Queen => {
            ray_attacks(squares, from, &DIAGONALS) | ray_attacks(squares, from, &ORTHOGONALS)
        }
    }
}

/// Whether any piece of color `by` attacks `target`.
pub(crate) fn is_attacked(squares: &Squares, target: Square, by: Color) -> bool {
    let holds = |sq: Square, kinds: &[PieceType]| {
        squares[sq.index()]
            .map(|p| p.color == by && kinds.contains(&p.piece_type))
            .unwrap_or(false)
    };

    // An attacking pawn stands one rank behind the target from its own point of view
    let behind = -by.pawn_direction();
    if [(-1, behind), (1, behind)]
        .iter()
        .filter_map(|&(df, dr)| target.offset(df, dr))
        .any(|sq| holds(sq, &[PieceType::Pawn]))
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| target.offset(df, dr))
        .any(|sq| holds(sq, &[PieceType::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .filter_map(|&(df, dr)| target.offset(df, dr))
        .any(|sq| holds(sq, &[PieceType::King]))
    {
        return true;
    }

    let sliders: [(&[(i8, i8)], [PieceType; 2]); 2] = [
        (&DIAGONALS, [PieceType::Bishop, PieceType::Queen]),
        (&ORTHOGONALS, [PieceType::Rook, PieceType::Queen]),
    ];
    for (directions, kinds) in sliders {
        for &(df, dr) in directions {
            let mut current = target.offset(df, dr);
            while let Some(sq) = current {
                if squares[sq.index()].is_some() {
                    if holds(sq, &kinds) {
                        return true;
                    }
                    break;
                }
                current = sq.offset(df, dr);
            }
        }
    }

    false
}
