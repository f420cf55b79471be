// Terminal-state detection and game results. Threefold repetition,
// resignation and flag falls are external terminations: the reasons exist,
// but nothing here detects them.

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::attacks::is_attacked_by;
use crate::board::BoardState;
use crate::color::Color;
use crate::moves::Move;
use crate::piece::PieceKind;
use crate::rules::{apply_move_unchecked, has_legal_move};
use crate::square::Square;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameResult {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    // The PGN result token.
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::InProgress => "*",
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "*" => Some(GameResult::InProgress),
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
    Resignation,
    Timeout,
    Agreement,
}


pub fn is_in_check(state: &BoardState, color: Color) -> bool {
    match state.find_king(color) {
        // Reduced test positions may have no king; treat as not in check.
        None => false,
        Some(king_square) => is_attacked_by(state, king_square, color.opponent()),
    }
}

pub fn is_check(state: &BoardState) -> bool {
    is_in_check(state, state.turn())
}

pub fn is_checkmate(state: &BoardState) -> bool {
    is_check(state) && !has_legal_move(state)
}

pub fn is_stalemate(state: &BoardState) -> bool {
    !is_check(state) && !has_legal_move(state)
}

// True iff a move gives check to the opponent.
pub fn gives_check(state: &BoardState, mv: Move) -> bool {
    let next = apply_move_unchecked(state, mv);
    is_check(&next)
}

fn bishop_square_parity(state: &BoardState, color: Color) -> Option<u8> {
    Square::all()
        .find(|&sq| {
            state.piece(sq).is_some_and(|p| p.color == color && p.kind == PieceKind::Bishop)
        })
        .map(|sq| (sq.file.to_zero_based() + sq.rank.to_zero_based()) % 2)
}

// Draws by bare material: K vs K, K+minor vs K, and K+B vs K+B with both
// bishops on the same square color.
pub fn has_insufficient_material(state: &BoardState) -> bool {
    let counts = state.piece_counts();
    let minor_only = |side: &EnumMap<PieceKind, u8>| {
        side[PieceKind::Pawn] == 0
            && side[PieceKind::Rook] == 0
            && side[PieceKind::Queen] == 0
            && side[PieceKind::Knight] + side[PieceKind::Bishop] <= 1
    };
    if !minor_only(&counts[Color::White]) || !minor_only(&counts[Color::Black]) {
        return false;
    }
    let white_minors = counts[Color::White][PieceKind::Knight] + counts[Color::White][PieceKind::Bishop];
    let black_minors = counts[Color::Black][PieceKind::Knight] + counts[Color::Black][PieceKind::Bishop];
    match white_minors + black_minors {
        0 | 1 => true,
        2 => {
            // Two knights, or knight vs bishop, can still construct a mate.
            if counts[Color::White][PieceKind::Bishop] == 1
                && counts[Color::Black][PieceKind::Bishop] == 1
            {
                bishop_square_parity(state, Color::White) == bishop_square_parity(state, Color::Black)
            } else {
                false
            }
        }
        _ => unreachable!(),
    }
}

pub fn is_fifty_move_draw(state: &BoardState) -> bool {
    state.halfmove_clock() >= 100
}

pub fn is_game_over(state: &BoardState) -> bool {
    is_fifty_move_draw(state)
        || has_insufficient_material(state)
        || !has_legal_move(state)
}

pub fn game_result(state: &BoardState) -> (GameResult, Option<TerminationReason>) {
    if is_checkmate(state) {
        let result = match state.turn() {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        };
        return (result, Some(TerminationReason::Checkmate));
    }
    if is_stalemate(state) {
        return (GameResult::Draw, Some(TerminationReason::Stalemate));
    }
    if has_insufficient_material(state) {
        return (GameResult::Draw, Some(TerminationReason::InsufficientMaterial));
    }
    if is_fifty_move_draw(state) {
        return (GameResult::Draw, Some(TerminationReason::FiftyMoveRule));
    }
    (GameResult::InProgress, None)
}
