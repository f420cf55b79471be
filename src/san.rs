// SAN formatting. The formatter performs no legality checks: callers hand in
// a move they already validated plus the capture/check/mate facts.

use crate::board::BoardState;
use crate::moves::Move;
use crate::piece::PieceKind;
use crate::rules::generate_legal_moves;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SanFlags {
    pub is_capture: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
}

// Minimal disambiguation: file letter if unique, else rank digit, else the
// full square. A single pass over the legal moves is enough.
pub fn disambiguation(state: &BoardState, mv: Move) -> Option<String> {
    let piece = state.piece(mv.from)?;
    if piece.kind == PieceKind::Pawn {
        // Pawn captures always carry the origin file; nothing more is needed.
        return None;
    }
    let rivals: Vec<_> = generate_legal_moves(state)
        .into_iter()
        .filter(|other| {
            other.to == mv.to
                && other.from != mv.from
                && state.piece(other.from).is_some_and(|p| p.kind == piece.kind)
        })
        .collect();
    if rivals.is_empty() {
        return None;
    }
    if rivals.iter().all(|other| other.from.file != mv.from.file) {
        return Some(mv.from.file.to_algebraic().to_string());
    }
    if rivals.iter().all(|other| other.from.rank != mv.from.rank) {
        return Some(mv.from.rank.to_algebraic().to_string());
    }
    Some(mv.from.to_algebraic())
}

pub fn move_to_san(
    state: &BoardState, mv: Move, flags: SanFlags, disambiguation: Option<&str>,
) -> String {
    let Some(piece) = state.piece(mv.from) else {
        // Defensive fallback only; the session never passes an empty from-square.
        return mv.to_uci();
    };

    if piece.kind == PieceKind::King && (mv.to.file - mv.from.file).abs() == 2 {
        let castle = if mv.to.file - mv.from.file > 0 { "O-O" } else { "O-O-O" };
        return format!("{}{}", castle, check_suffix(flags));
    }

    let mut san = String::new();
    match piece.kind.to_algebraic() {
        Some(letter) => {
            san.push(letter);
            if let Some(d) = disambiguation {
                san.push_str(d);
            }
        }
        None => {
            if flags.is_capture {
                san.push(mv.from.file.to_algebraic());
            }
        }
    }
    if flags.is_capture {
        san.push('x');
    }
    san.push_str(&mv.to.to_algebraic());
    if let Some(kind) = mv.promotion {
        san.push('=');
        san.push(kind.to_ascii().to_ascii_uppercase());
    }
    san.push_str(check_suffix(flags));
    san
}

fn check_suffix(flags: SanFlags) -> &'static str {
    if flags.is_checkmate {
        "#"
    } else if flags.is_check {
        "+"
    } else {
        ""
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_fen;
    use crate::piece::PieceKind;
    use crate::square::Square;

    fn san_of(fen: &str, uci: &str, flags: SanFlags) -> String {
        let state = parse_fen(fen).unwrap();
        let mv = Move::from_uci(uci).unwrap();
        let d = disambiguation(&state, mv);
        move_to_san(&state, mv, flags, d.as_deref())
    }

    #[test]
    fn plain_moves() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san_of(start, "e2e4", SanFlags::default()), "e4");
        assert_eq!(san_of(start, "g1f3", SanFlags::default()), "Nf3");
    }

    #[test]
    fn captures_checks_and_promotions() {
        let capture = SanFlags { is_capture: true, ..SanFlags::default() };
        assert_eq!(
            san_of("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2", "e4d5", capture),
            "exd5"
        );
        let mate = SanFlags { is_check: true, is_checkmate: true, ..SanFlags::default() };
        assert_eq!(san_of("6k1/8/5KQ1/8/8/8/8/8 w - - 0 1", "g6g7", mate), "Qg7#");
        assert_eq!(
            san_of("8/4P2k/8/8/8/8/8/4K3 w - - 0 1", "e7e8q", SanFlags::default()),
            "e8=Q"
        );
    }

    #[test]
    fn castles() {
        assert_eq!(
            san_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1", SanFlags::default()),
            "O-O"
        );
        assert_eq!(
            san_of("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8c8", SanFlags::default()),
            "O-O-O"
        );
    }

    #[test]
    fn file_rank_and_square_disambiguation() {
        // Two knights a file apart: file disambiguation suffices.
        assert_eq!(
            san_of("k7/8/8/8/8/8/8/K4N1N w - - 0 1", "h1g3", SanFlags::default()),
            "Nhg3"
        );
        // Same file, different ranks: rank digit.
        assert_eq!(
            san_of("k7/8/8/8/7N/8/8/K6N w - - 0 1", "h4f3", SanFlags::default()),
            "N4f3"
        );
        // Rivals on the same file and the same rank: full square needed.
        assert_eq!(
            san_of("7k/8/8/8/8/1N6/8/KN3N2 w - - 0 1", "b1d2", SanFlags::default()),
            "Nb1d2"
        );
    }

    #[test]
    fn falls_back_to_uci_on_empty_from_square() {
        let state = parse_fen("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let mv = Move::new(Square::from_algebraic("e4").unwrap(), Square::from_algebraic("e5").unwrap());
        assert_eq!(move_to_san(&state, mv, SanFlags::default(), None), "e4e5");
    }

    #[test]
    fn pawn_capture_keeps_origin_file_without_disambiguation() {
        let state =
            parse_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2").unwrap();
        let mv = Move::from_uci("e4d5").unwrap();
        assert_eq!(disambiguation(&state, mv), None);
        assert_eq!(state.piece(mv.from).unwrap().kind, PieceKind::Pawn);
    }
}
