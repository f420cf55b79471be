// Pseudo-legal move enumeration: own-king safety is not considered here.
// Output order is a pure function of the input state, which keeps perft runs
// reproducible.

use crate::attacks::{DIAGONAL_DIRS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL_DIRS, is_attacked_by};
use crate::board::{BoardState, CastleSide};
use crate::color::Color;
use crate::moves::Move;
use crate::piece::{PROMOTION_KINDS, Piece, PieceKind};
use crate::square::{File, Square};


pub fn generate_pseudo_legal_moves(state: &BoardState) -> Vec<Move> {
    let mut moves = Vec::new();
    for (square, piece) in state.pieces(state.turn()) {
        piece_moves(state, square, piece, &mut moves);
    }
    moves
}

fn piece_moves(state: &BoardState, square: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(state, square, piece.color, moves),
        PieceKind::Knight => offset_moves(state, square, piece.color, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => sliding_moves(state, square, piece.color, &DIAGONAL_DIRS, moves),
        PieceKind::Rook => sliding_moves(state, square, piece.color, &ORTHOGONAL_DIRS, moves),
        PieceKind::Queen => {
            sliding_moves(state, square, piece.color, &DIAGONAL_DIRS, moves);
            sliding_moves(state, square, piece.color, &ORTHOGONAL_DIRS, moves);
        }
        PieceKind::King => {
            offset_moves(state, square, piece.color, &KING_OFFSETS, moves);
            castling_moves(state, square, piece.color, moves);
        }
    }
}

// A pawn arriving at the last rank yields the four promotion moves instead of
// the plain one.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.rank == BoardState::promotion_rank(color) {
        for kind in PROMOTION_KINDS {
            moves.push(Move::promoting(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

fn pawn_moves(state: &BoardState, square: Square, color: Color, moves: &mut Vec<Move>) {
    let forward = color.forward();

    if let Some(one_ahead) = square + (0, forward) {
        if state.piece(one_ahead).is_none() {
            push_pawn_move(square, one_ahead, color, moves);
            if square.rank == BoardState::pawn_start_rank(color) {
                let two_ahead = (square + (0, forward * 2)).unwrap();
                if state.piece(two_ahead).is_none() {
                    moves.push(Move::new(square, two_ahead));
                }
            }
        }
    }

    for d_file in [-1, 1] {
        if let Some(target) = square + (d_file, forward) {
            let occupied_by_opponent =
                state.piece(target).is_some_and(|piece| piece.color != color);
            if occupied_by_opponent {
                push_pawn_move(square, target, color, moves);
            } else if state.en_passant_square() == Some(target) {
                moves.push(Move::new(square, target));
            }
        }
    }
}

fn offset_moves(
    state: &BoardState, square: Square, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Move>,
) {
    for &offset in offsets {
        if let Some(target) = square + offset {
            if state.piece(target).is_none_or(|piece| piece.color != color) {
                moves.push(Move::new(square, target));
            }
        }
    }
}

fn sliding_moves(
    state: &BoardState, square: Square, color: Color, dirs: &[(i8, i8)], moves: &mut Vec<Move>,
) {
    for &dir in dirs {
        let mut pos = square + dir;
        while let Some(target) = pos {
            match state.piece(target) {
                None => moves.push(Move::new(square, target)),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(Move::new(square, target));
                    }
                    break;
                }
            }
            pos = target + dir;
        }
    }
}

fn castling_moves(state: &BoardState, king_square: Square, color: Color, moves: &mut Vec<Move>) {
    let rank = BoardState::back_rank(color);
    if king_square != Square::new(File::E, rank) {
        return;
    }
    if is_attacked_by(state, king_square, color.opponent()) {
        return;
    }
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if !state.castling_rights()[color][side] {
            continue;
        }
        let (rook_file, king_target, between, king_path): (File, File, &[File], &[File]) =
            match side {
                CastleSide::Kingside => {
                    (File::H, File::G, &[File::F, File::G], &[File::F, File::G])
                }
                // The b-file square must be empty too, but the king never
                // crosses it, so it carries no attack condition.
                CastleSide::Queenside => {
                    (File::A, File::C, &[File::B, File::C, File::D], &[File::D, File::C])
                }
            };
        let rook_square = Square::new(rook_file, rank);
        if state.piece(rook_square) != Some(Piece::new(color, PieceKind::Rook)) {
            continue;
        }
        if between.iter().any(|&file| state.piece(Square::new(file, rank)).is_some()) {
            continue;
        }
        if king_path
            .iter()
            .any(|&file| is_attacked_by(state, Square::new(file, rank), color.opponent()))
        {
            continue;
        }
        moves.push(Move::new(king_square, Square::new(king_target, rank)));
    }
}
