use studychess::fen::{board_to_fen, starting_position};
use studychess::test_util::{replay_uci_log, state_from_fen};
use studychess::{
    CastleSide, ChessError, Color, GameResult, Move, Piece, PieceKind, Square, TerminationReason,
    apply_move, game_result, generate_legal_moves, gives_check, has_insufficient_material,
    is_check, is_checkmate, is_in_check, is_legal_move, is_stalemate,
};


fn uci(s: &str) -> Move {
    Move::from_uci(s).unwrap()
}


#[test]
fn opening_moves() {
    let state = starting_position();
    assert!(is_legal_move(&state, uci("e2e4")));
    assert!(is_legal_move(&state, uci("e2e3")));
    assert!(is_legal_move(&state, uci("g1f3")));
    // Blocked, wrong-side and no-piece moves are all rejected.
    assert!(!is_legal_move(&state, uci("e1e2")));
    assert!(!is_legal_move(&state, uci("e7e5")));
    assert!(!is_legal_move(&state, uci("e4e5")));
    assert!(!is_legal_move(&state, uci("e2e5")));
}

#[test]
fn apply_is_deterministic_and_pure() {
    let state = starting_position();
    let a = apply_move(&state, uci("e2e4")).unwrap();
    let b = apply_move(&state, uci("e2e4")).unwrap();
    assert_eq!(a, b);
    // The input state is untouched.
    assert_eq!(board_to_fen(&state), studychess::fen::STARTING_FEN);
}

#[test]
fn scholars_mate_flow() {
    let mut state = starting_position();
    replay_uci_log(&mut state, "e2e4 e7e5 f1c4 b8c6 d1h5 g8f6");
    assert!(gives_check(&state, uci("h5f7")));
    let state = apply_move(&state, uci("h5f7")).unwrap();
    assert!(is_checkmate(&state));
    assert_eq!(game_result(&state), (GameResult::WhiteWins, Some(TerminationReason::Checkmate)));
}

#[test]
fn fools_mate_is_black_win() {
    let mut state = starting_position();
    replay_uci_log(&mut state, "f2f3 e7e5 g2g4 d8h4");
    assert!(is_check(&state));
    assert!(is_checkmate(&state));
    assert_eq!(game_result(&state), (GameResult::BlackWins, Some(TerminationReason::Checkmate)));
}

#[test]
fn kingside_castling_moves_the_rook() {
    let state = state_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1");
    assert!(is_legal_move(&state, uci("e1g1")));
    let state = apply_move(&state, uci("e1g1")).unwrap();
    assert_eq!(state.piece(Square::G1), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(state.piece(Square::F1), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert_eq!(state.piece(Square::H1), None);
    assert!(!state.castling_rights()[Color::White][CastleSide::Kingside]);
    assert!(!state.castling_rights()[Color::White][CastleSide::Queenside]);
}

#[test]
fn castling_is_rejected_through_check() {
    // The black rook on f8 covers f1, which the king must cross.
    let state = state_from_fen("r1b1kr2/8/8/8/8/8/PPPP4/4K2R w Kq - 0 1");
    assert!(!is_legal_move(&state, uci("e1g1")));
    // And while in check.
    let state = state_from_fen("4r3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(is_in_check(&state, Color::White));
    assert!(!is_legal_move(&state, uci("e1g1")));
    assert!(!is_legal_move(&state, uci("e1c1")));
}

#[test]
fn queenside_castling_requires_empty_b_file() {
    let blocked = state_from_fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1");
    assert!(!is_legal_move(&blocked, uci("e1c1")));
    let open = state_from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
    assert!(is_legal_move(&open, uci("e1c1")));
    let after = apply_move(&open, uci("e1c1")).unwrap();
    assert_eq!(after.piece(Square::C1), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(after.piece(Square::D1), Some(Piece::new(Color::White, PieceKind::Rook)));
}

#[test]
fn en_passant_removes_the_bypassed_pawn() {
    let state = state_from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2");
    assert!(is_legal_move(&state, uci("e5d6")));
    let state = apply_move(&state, uci("e5d6")).unwrap();
    let fen = board_to_fen(&state);
    assert_eq!(fen, "rnbqkbnr/ppp1pppp/3P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2");
    assert_eq!(state.piece(Square::from_algebraic("d5").unwrap()), None);
}

#[test]
fn en_passant_window_lasts_one_halfmove() {
    let mut state = starting_position();
    replay_uci_log(&mut state, "e2e4 g8f6 e4e5 d7d5");
    assert!(is_legal_move(&state, uci("e5d6")));
    replay_uci_log(&mut state, "g1f3 f6g8");
    assert!(!is_legal_move(&state, uci("e5d6")));
}

#[test]
fn promotion_requires_a_choice() {
    let state = state_from_fen("8/4P2k/8/8/8/8/8/4K3 w - - 0 1");
    assert!(!is_legal_move(&state, uci("e7e8")));
    assert!(is_legal_move(&state, uci("e7e8q")));
    assert!(is_legal_move(&state, uci("e7e8n")));
    let state = apply_move(&state, uci("e7e8r")).unwrap();
    assert_eq!(state.piece(Square::E8), Some(Piece::new(Color::White, PieceKind::Rook)));
}

#[test]
fn pinned_piece_cannot_expose_the_king() {
    // The e-file knight is pinned by the rook on e8.
    let state = state_from_fen("4r3/8/8/8/8/4N3/8/4K3 w - - 0 1");
    assert!(!is_legal_move(&state, uci("e3c4")));
    assert!(is_legal_move(&state, uci("e1d1")));
}

#[test]
fn legality_soundness_on_sampled_positions() {
    let fens = [
        studychess::fen::STARTING_FEN,
        "r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R3K2R w KQkq - 6 8",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
    ];
    for fen in fens {
        let state = state_from_fen(fen);
        let mover = state.turn();
        for mv in generate_legal_moves(&state) {
            let next = apply_move(&state, mv).unwrap();
            assert!(!is_in_check(&next, mover), "{fen} then {}", mv.to_uci());
        }
    }
}

#[test]
fn no_legal_moves_means_mate_or_stalemate() {
    let cases = [
        ("4Q1k1/5ppp/8/8/8/8/8/7K b - - 0 1", true, false),  // back-rank mate
        ("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", false, true),     // stalemate
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", false, false),
    ];
    for (fen, mate, stalemate) in cases {
        let state = state_from_fen(fen);
        let no_moves = generate_legal_moves(&state).is_empty();
        assert_eq!(no_moves, mate || stalemate, "{fen}");
        assert_eq!(is_checkmate(&state), mate, "{fen}");
        assert_eq!(is_stalemate(&state), stalemate, "{fen}");
    }
}

#[test]
fn castling_rights_are_monotonically_lost() {
    let mut state = starting_position();
    let mut seen_rights = Vec::new();
    let record = |state: &studychess::BoardState, seen: &mut Vec<[bool; 4]>| {
        let rights = state.castling_rights();
        seen.push([
            rights[Color::White][CastleSide::Kingside],
            rights[Color::White][CastleSide::Queenside],
            rights[Color::Black][CastleSide::Kingside],
            rights[Color::Black][CastleSide::Queenside],
        ]);
    };
    record(&state, &mut seen_rights);
    for mv in ["g1f3", "b8c6", "h1g1", "a8b8", "g1h1", "e7e5", "e2e4", "e8e7"] {
        state = apply_move(&state, uci(mv)).unwrap();
        record(&state, &mut seen_rights);
    }
    for pair in seen_rights.windows(2) {
        for i in 0..4 {
            assert!(pair[1][i] <= pair[0][i], "castling right regained");
        }
    }
    // Both rook moves and the king move took their tolls.
    let last = seen_rights.last().unwrap();
    assert_eq!(*last, [false, true, false, false]);
}

#[test]
fn rook_capture_on_home_square_clears_the_right() {
    let state = state_from_fen("r3k3/8/8/8/8/8/8/R3K2R b KQq - 0 1");
    let state = apply_move(&state, uci("a8a1")).unwrap();
    assert!(!state.castling_rights()[Color::White][CastleSide::Queenside]);
    assert!(state.castling_rights()[Color::White][CastleSide::Kingside]);
}

#[test]
fn insufficient_material_cases() {
    assert!(has_insufficient_material(&state_from_fen("8/8/8/8/8/8/8/K6k w - - 0 1")));
    assert!(has_insufficient_material(&state_from_fen("8/8/8/8/8/2B5/8/K6k w - - 0 1")));
    assert!(has_insufficient_material(&state_from_fen("8/8/8/8/8/2n5/8/K6k w - - 0 1")));
    // Bishops on the same square color cannot force progress.
    assert!(has_insufficient_material(&state_from_fen("8/8/8/8/1b6/2B5/8/K6k w - - 0 1")));
    // Opposite-colored bishops can still mate in the corner.
    assert!(!has_insufficient_material(&state_from_fen("8/8/8/8/2b5/2B5/8/K6k w - - 0 1")));
    assert!(!has_insufficient_material(&state_from_fen("8/8/8/8/8/2R5/8/K6k w - - 0 1")));
    assert!(!has_insufficient_material(&state_from_fen("8/8/8/8/8/2P5/8/K6k w - - 0 1")));
    assert!(!has_insufficient_material(&starting_position()));
}

#[test]
fn fifty_move_rule_draw() {
    let in_progress = state_from_fen("8/8/8/8/8/2R5/8/K6k w - - 99 120");
    assert_eq!(game_result(&in_progress), (GameResult::InProgress, None));
    let drawn = apply_move(&in_progress, uci("c3c4")).unwrap();
    assert_eq!(drawn.halfmove_clock(), 100);
    assert_eq!(game_result(&drawn), (GameResult::Draw, Some(TerminationReason::FiftyMoveRule)));
}

#[test]
fn checked_apply_surfaces_error_kinds() {
    let state = starting_position();
    assert!(matches!(
        apply_move(&state, uci("e2e5")),
        Err(ChessError::IllegalMove { .. })
    ));
    // The pinned knight move is pseudo-legal but exposes the king.
    let pinned = state_from_fen("4r3/8/8/8/8/4N3/8/4K3 w - - 0 1");
    assert!(matches!(apply_move(&pinned, uci("e3c4")), Err(ChessError::KingInCheck(_))));
}
