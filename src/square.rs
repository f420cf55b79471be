// File/Rank are 0-based internally; all user-visible notation (FEN, UCI, SAN)
// goes through the algebraic conversions.

use std::{fmt, ops};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::ChessError;


pub const NUM_FILES: u8 = 8;
pub const NUM_RANKS: u8 = 8;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct File {
    idx: u8, // 0-based
}

impl File {
    pub const fn from_zero_based(idx: u8) -> Option<Self> {
        if idx < NUM_FILES { Some(Self { idx }) } else { None }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        (ch as u8).checked_sub(b'a').and_then(Self::from_zero_based)
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_FILES).map(|v| Self::from_zero_based(v).unwrap())
    }
}

impl ops::Add<i8> for File {
    type Output = Option<Self>;
    fn add(self, other: i8) -> Self::Output {
        Self::from_zero_based((self.to_zero_based() as i8 + other) as u8)
    }
}

impl ops::Sub for File {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Rank {
    idx: u8, // 0-based; rank 0 is white's back rank
}

impl Rank {
    pub const fn from_zero_based(idx: u8) -> Option<Self> {
        if idx < NUM_RANKS { Some(Self { idx }) } else { None }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        (ch as u8).checked_sub(b'1').and_then(Self::from_zero_based)
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_RANKS).map(|v| Self::from_zero_based(v).unwrap())
    }
}

impl ops::Add<i8> for Rank {
    type Output = Option<Self>;
    fn add(self, other: i8) -> Self::Output {
        Self::from_zero_based((self.to_zero_based() as i8 + other) as u8)
    }
}

impl ops::Sub for Rank {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


// No `Ord`: there is no single obvious order. Sort by `to_index` when one is needed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    pub const fn new(file: File, rank: Rank) -> Self { Self { file, rank } }

    pub fn from_algebraic(s: &str) -> Result<Self, ChessError> {
        let err = || ChessError::InvalidSquare(s.to_owned());
        let (file, rank) = s.chars().collect_tuple().ok_or_else(err)?;
        Ok(Square {
            file: File::from_algebraic(file).ok_or_else(err)?,
            rank: Rank::from_algebraic(rank).ok_or_else(err)?,
        })
    }
    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file.to_algebraic(), self.rank.to_algebraic())
    }

    pub fn from_index(idx: u8) -> Option<Self> {
        if idx < NUM_RANKS * NUM_FILES {
            Some(Square {
                file: File::from_zero_based(idx % NUM_FILES).unwrap(),
                rank: Rank::from_zero_based(idx / NUM_FILES).unwrap(),
            })
        } else {
            None
        }
    }
    pub fn to_index(self) -> u8 { self.rank.to_zero_based() * NUM_FILES + self.file.to_zero_based() }

    pub fn all() -> impl Iterator<Item = Square> {
        Rank::all().cartesian_product(File::all()).map(|(rank, file)| Square { file, rank })
    }
}

// Offsets are (d_file, d_rank).
impl ops::Add<(i8, i8)> for Square {
    type Output = Option<Self>;
    fn add(self, other: (i8, i8)) -> Self::Output {
        Some(Self {
            file: (self.file + other.0)?,
            rank: (self.rank + other.1)?,
        })
    }
}

impl ops::Sub for Square {
    type Output = (i8, i8);
    fn sub(self, other: Self) -> Self::Output { (self.file - other.file, self.rank - other.rank) }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}


impl File {
    #![allow(dead_code)]
    pub const A: File = File { idx: 0 };
    pub const B: File = File { idx: 1 };
    pub const C: File = File { idx: 2 };
    pub const D: File = File { idx: 3 };
    pub const E: File = File { idx: 4 };
    pub const F: File = File { idx: 5 };
    pub const G: File = File { idx: 6 };
    pub const H: File = File { idx: 7 };
}

impl Rank {
    #![allow(dead_code)]
    pub const _1: Rank = Rank { idx: 0 };
    pub const _2: Rank = Rank { idx: 1 };
    pub const _3: Rank = Rank { idx: 2 };
    pub const _4: Rank = Rank { idx: 3 };
    pub const _5: Rank = Rank { idx: 4 };
    pub const _6: Rank = Rank { idx: 5 };
    pub const _7: Rank = Rank { idx: 6 };
    pub const _8: Rank = Rank { idx: 7 };
}

impl Square {
    #![allow(dead_code)]
    pub const A1: Square = Square::new(File::A, Rank::_1);
    pub const B1: Square = Square::new(File::B, Rank::_1);
    pub const C1: Square = Square::new(File::C, Rank::_1);
    pub const D1: Square = Square::new(File::D, Rank::_1);
    pub const E1: Square = Square::new(File::E, Rank::_1);
    pub const F1: Square = Square::new(File::F, Rank::_1);
    pub const G1: Square = Square::new(File::G, Rank::_1);
    pub const H1: Square = Square::new(File::H, Rank::_1);
    pub const A8: Square = Square::new(File::A, Rank::_8);
    pub const B8: Square = Square::new(File::B, Rank::_8);
    pub const C8: Square = Square::new(File::C, Rank::_8);
    pub const D8: Square = Square::new(File::D, Rank::_8);
    pub const E8: Square = Square::new(File::E, Rank::_8);
    pub const F8: Square = Square::new(File::F, Rank::_8);
    pub const G8: Square = Square::new(File::G, Rank::_8);
    pub const H8: Square = Square::new(File::H, Rank::_8);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()).unwrap(), sq);
        }
        assert_eq!(Square::from_algebraic("e4").unwrap(), Square::new(File::E, Rank::_4));
    }

    #[test]
    fn index_round_trip() {
        for idx in 0..64 {
            assert_eq!(Square::from_index(idx).unwrap().to_index(), idx);
        }
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn rejects_malformed_notation() {
        for bad in ["", "e", "e44", "i4", "e9", "4e"] {
            assert_eq!(
                Square::from_algebraic(bad).unwrap_err(),
                ChessError::InvalidSquare(bad.to_owned())
            );
        }
    }
}
