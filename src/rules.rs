// Legality filter and move application. `apply_move` is the checked entry
// point; the facade always validates before applying.

use crate::attacks::is_attacked_by;
use crate::board::{BoardState, CastleSide};
use crate::color::Color;
use crate::error::ChessError;
use crate::movegen::generate_pseudo_legal_moves;
use crate::moves::Move;
use crate::piece::{Piece, PieceKind};
use crate::square::{File, Rank, Square};


pub fn is_legal_move(state: &BoardState, mv: Move) -> bool {
    generate_pseudo_legal_moves(state).contains(&mv) && leaves_king_safe(state, mv)
}

// A pseudo-legal check is assumed to have happened already; this only rules
// out moves that expose the mover's own king (discovered checks included).
pub(crate) fn leaves_king_safe(state: &BoardState, mv: Move) -> bool {
    let mover = state.turn();
    let next = apply_move_unchecked(state, mv);
    match next.find_king(mover) {
        // Positions without a king occur in reduced test setups; nothing to expose.
        None => true,
        Some(king_square) => !is_attacked_by(&next, king_square, mover.opponent()),
    }
}

pub fn generate_legal_moves(state: &BoardState) -> Vec<Move> {
    generate_pseudo_legal_moves(state)
        .into_iter()
        .filter(|&mv| leaves_king_safe(state, mv))
        .collect()
}

pub fn has_legal_move(state: &BoardState) -> bool {
    generate_pseudo_legal_moves(state).into_iter().any(|mv| leaves_king_safe(state, mv))
}

pub fn apply_move(state: &BoardState, mv: Move) -> Result<BoardState, ChessError> {
    if !generate_pseudo_legal_moves(state).contains(&mv) {
        return Err(ChessError::illegal_move(mv.to_uci(), "not a legal move in this position"));
    }
    if !leaves_king_safe(state, mv) {
        return Err(ChessError::KingInCheck(mv.to_uci()));
    }
    Ok(apply_move_unchecked(state, mv))
}

// Produces the successor state without any legality checks. Callers outside
// this module must go through `apply_move`.
pub fn apply_move_unchecked(state: &BoardState, mv: Move) -> BoardState {
    let mut next = state.clone();
    let Some(piece) = next.piece(mv.from) else {
        return next;
    };
    let mover = piece.color;

    // Castling is detected by the king moving two files.
    if piece.kind == PieceKind::King && (mv.to.file - mv.from.file).abs() == 2 {
        apply_castling(&mut next, mv);
        clear_castling_rights(&mut next, mover);
        next.en_passant_square = None;
        finish_move(&mut next, false, false);
        return next;
    }

    let mut is_capture = next.piece(mv.to).is_some();
    let is_pawn_move = piece.kind == PieceKind::Pawn;

    // En passant removes the bypassed pawn from the capturing pawn's own rank.
    if is_pawn_move && state.en_passant_square() == Some(mv.to) {
        next.set_piece(Square::new(mv.to.file, mv.from.rank), None);
        is_capture = true;
    }

    next.set_piece(mv.from, None);
    let placed = match mv.promotion {
        Some(kind) => Piece::new(mover, kind),
        None => piece,
    };
    next.set_piece(mv.to, Some(placed));

    update_castling_rights(&mut next, mv, piece);

    next.en_passant_square = if is_pawn_move && (mv.to.rank - mv.from.rank).abs() == 2 {
        let middle = Rank::from_zero_based(
            (mv.from.rank.to_zero_based() + mv.to.rank.to_zero_based()) / 2,
        )
        .unwrap();
        Some(Square::new(mv.from.file, middle))
    } else {
        None
    };

    finish_move(&mut next, is_capture, is_pawn_move);
    next
}

fn apply_castling(state: &mut BoardState, king_move: Move) {
    let king = state.piece(king_move.from);
    state.set_piece(king_move.from, None);
    state.set_piece(king_move.to, king);

    let kingside = king_move.to.file - king_move.from.file > 0;
    let (rook_from, rook_to) =
        if kingside { (File::H, File::F) } else { (File::A, File::D) };
    let rank = king_move.from.rank;
    let rook = state.piece(Square::new(rook_from, rank));
    state.set_piece(Square::new(rook_from, rank), None);
    state.set_piece(Square::new(rook_to, rank), rook);
}

fn clear_castling_rights(state: &mut BoardState, color: Color) {
    state.castling_rights[color][CastleSide::Kingside] = false;
    state.castling_rights[color][CastleSide::Queenside] = false;
}

// Rook home squares and the right they guard. Clearing on arrival covers
// captured rooks.
const ROOK_HOME_SQUARES: [(Square, Color, CastleSide); 4] = [
    (Square::A1, Color::White, CastleSide::Queenside),
    (Square::H1, Color::White, CastleSide::Kingside),
    (Square::A8, Color::Black, CastleSide::Queenside),
    (Square::H8, Color::Black, CastleSide::Kingside),
];

fn update_castling_rights(state: &mut BoardState, mv: Move, piece: Piece) {
    if piece.kind == PieceKind::King {
        clear_castling_rights(state, piece.color);
    }
    for (square, color, side) in ROOK_HOME_SQUARES {
        if mv.from == square || mv.to == square {
            state.castling_rights[color][side] = false;
        }
    }
}

fn finish_move(state: &mut BoardState, is_capture: bool, is_pawn_move: bool) {
    if is_capture || is_pawn_move {
        state.halfmove_clock = 0;
    } else {
        state.halfmove_clock += 1;
    }
    if state.turn == Color::Black {
        state.fullmove_number += 1;
    }
    state.turn = state.turn.opponent();
}
