use std::{fmt, str::FromStr};

use crate::RulesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub rank: u8, // 1-8
    pub file: u8, // a-h (1-8)
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return None,
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }

        Some(Self {
            file: (file as u8) - b'a' + 1,
            rank: (rank as u8) - b'0',
        })
    }

    /// Index into a 64-entry board or bit position in a bitboard, a1 = 0, h8 = 63.
    pub fn index(self) -> usize {
        (self.rank as usize - 1) * 8 + (self.file as usize - 1)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 64 {
            return None;
        }
        Some(Self {
            file: (index % 8) as u8 + 1,
            rank: (index / 8) as u8 + 1,
        })
    }

    pub fn bit(self) -> u64 {
        1u64 << self.index()
    }

    /// The square `file_step` files and `rank_step` ranks away, if still on the board.
    pub fn offset(self, file_step: i8, rank_step: i8) -> Option<Self> {
        let file = self.file as i8 + file_step;
        let rank = self.rank as i8 + rank_step;
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    pub fn is_light(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file - 1) as char, self.rank)
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| RulesError::InvalidSquare(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_parsing() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4, Square { file: 5, rank: 4 });
        assert_eq!(e4.to_string(), "e4");
        assert!(Square::from_algebraic("i1").is_none());
        assert!(Square::from_algebraic("a9").is_none());
        assert!(Square::from_algebraic("a10").is_none());
        assert!(Square::from_algebraic("").is_none());
        assert_eq!("h8".parse::<Square>(), Ok(Square { file: 8, rank: 8 }));
        assert_eq!(
            "z0".parse::<Square>(),
            Err(RulesError::InvalidSquare("z0".to_string()))
        );
    }

    #[test]
    fn index_matches_bit_layout() {
        assert_eq!(Square::from_algebraic("a1").unwrap().index(), 0);
        assert_eq!(Square::from_algebraic("h1").unwrap().index(), 7);
        assert_eq!(Square::from_algebraic("h8").unwrap().index(), 63);
        for index in 0..64 {
            assert_eq!(Square::from_index(index).unwrap().index(), index);
        }
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn offsets_stay_on_board() {
        let a1 = Square::new(1, 1).unwrap();
        assert!(a1.offset(-1, 0).is_none());
        assert_eq!(a1.offset(1, 2), Square::new(2, 3));
        assert!(Square::new(0, 1).is_none());
    }

    #[test]
    fn square_colors() {
        assert!(!Square::from_algebraic("a1").unwrap().is_light());
        assert!(Square::from_algebraic("h1").unwrap().is_light());
    }
}
