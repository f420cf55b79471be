use crate::board::BoardState;
use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;


pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] =
    [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

pub(crate) const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub(crate) const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];


// True iff any `by_color` piece could capture to `square` under normal move
// rules. Pins on the attacker are deliberately ignored.
pub fn is_attacked_by(state: &BoardState, square: Square, by_color: Color) -> bool {
    // Pawns attack diagonally forward, so an attacking pawn sits one rank
    // behind `square` from the attacker's point of view.
    let forward = by_color.forward();
    for d_file in [-1, 1] {
        if let Some(from) = square + (d_file, -forward) {
            if let Some(piece) = state.piece(from) {
                if piece.color == by_color && piece.kind == PieceKind::Pawn {
                    return true;
                }
            }
        }
    }

    for (offsets, kind) in [(KNIGHT_OFFSETS, PieceKind::Knight), (KING_OFFSETS, PieceKind::King)] {
        for offset in offsets {
            if let Some(from) = square + offset {
                if let Some(piece) = state.piece(from) {
                    if piece.color == by_color && piece.kind == kind {
                        return true;
                    }
                }
            }
        }
    }

    let slider_attack = |dirs: [(i8, i8); 4], slider: PieceKind| {
        dirs.into_iter().any(|dir| {
            let mut pos = square + dir;
            while let Some(sq) = pos {
                if let Some(piece) = state.piece(sq) {
                    return piece.color == by_color
                        && (piece.kind == slider || piece.kind == PieceKind::Queen);
                }
                pos = sq + dir;
            }
            false
        })
    };
    slider_attack(DIAGONAL_DIRS, PieceKind::Bishop)
        || slider_attack(ORTHOGONAL_DIRS, PieceKind::Rook)
}
