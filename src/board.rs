use std::ops;

use enum_map::{Enum, EnumMap, enum_map};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::{NUM_FILES, NUM_RANKS, Rank, Square};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

// Iteration order (White, Black) x (Kingside, Queenside) matches FEN "KQkq".
// Rights are only ever cleared during a game, never re-granted.
pub type CastlingRights = EnumMap<Color, EnumMap<CastleSide, bool>>;

pub fn no_castling_rights() -> CastlingRights {
    enum_map! { _ => enum_map! { _ => false } }
}


// Improvement potential: benchmark a Box'ed grid (inline storage makes the
// state expensive to move, and apply clones it on every turn).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardGrid {
    data: [[Option<Piece>; NUM_FILES as usize]; NUM_RANKS as usize],
}

impl BoardGrid {
    pub fn empty() -> Self {
        BoardGrid { data: Default::default() }
    }
}

impl ops::Index<Square> for BoardGrid {
    type Output = Option<Piece>;
    fn index(&self, sq: Square) -> &Self::Output {
        &self.data[sq.rank.to_zero_based() as usize][sq.file.to_zero_based() as usize]
    }
}

impl ops::IndexMut<Square> for BoardGrid {
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.data[sq.rank.to_zero_based() as usize][sq.file.to_zero_based() as usize]
    }
}


// A full position snapshot. Mutated only through `set_piece` and the rule
// module's apply; everything else reads.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardState {
    pub(crate) grid: BoardGrid,
    pub(crate) turn: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl BoardState {
    pub fn empty() -> Self {
        BoardState {
            grid: BoardGrid::empty(),
            turn: Color::White,
            castling_rights: no_castling_rights(),
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn starting_position() -> Self {
        crate::fen::starting_position()
    }

    pub fn piece(&self, sq: Square) -> Option<Piece> { self.grid[sq] }
    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) { self.grid[sq] = piece; }

    pub fn grid(&self) -> &BoardGrid { &self.grid }
    pub fn turn(&self) -> Color { self.turn }
    pub fn castling_rights(&self) -> &CastlingRights { &self.castling_rights }
    pub fn en_passant_square(&self) -> Option<Square> { self.en_passant_square }
    pub fn halfmove_clock(&self) -> u32 { self.halfmove_clock }
    pub fn fullmove_number(&self) -> u32 { self.fullmove_number }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.grid[sq] == Some(Piece::new(color, PieceKind::King)))
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| {
            self.grid[sq].filter(|piece| piece.color == color).map(|piece| (sq, piece))
        })
    }

    pub fn piece_counts(&self) -> EnumMap<Color, EnumMap<PieceKind, u8>> {
        let mut counts = enum_map! { _ => enum_map! { _ => 0 } };
        for sq in Square::all() {
            if let Some(piece) = self.grid[sq] {
                counts[piece.color][piece.kind] += 1;
            }
        }
        counts
    }

    pub fn back_rank(color: Color) -> Rank {
        match color {
            Color::White => Rank::_1,
            Color::Black => Rank::_8,
        }
    }
    pub fn promotion_rank(color: Color) -> Rank {
        Self::back_rank(color.opponent())
    }
    pub fn pawn_start_rank(color: Color) -> Rank {
        match color {
            Color::White => Rank::_2,
            Color::Black => Rank::_7,
        }
    }
}
