// A session owns one live board and is the only path by which moves reach
// the PGN recorder. The submit protocol is strict: validate, apply, record.
// Illegal moves leave both the board and the writer untouched.

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::error::ChessError;
use crate::fen::{board_to_fen, parse_fen, starting_position};
use crate::movegen::generate_pseudo_legal_moves;
use crate::moves::Move;
use crate::outcome::{GameResult, TerminationReason, game_result, is_check, is_checkmate};
use crate::piece::PieceKind;
use crate::rules::{apply_move_unchecked, generate_legal_moves, leaves_king_safe};
use crate::san::{SanFlags, disambiguation, move_to_san};
use crate::writer::PgnWriter;


// Capabilities are a fixed set of booleans, not a type hierarchy; the session
// asks the policy and never branches on the mode itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionPolicy {
    pub allows_variations: bool,
    pub allows_takebacks: bool,
    pub enforces_time_control: bool,
    pub auto_ends_on_checkmate: bool,
    pub records_pgn: bool,
}

impl SessionPolicy {
    pub const STANDARD_GAME: SessionPolicy = SessionPolicy {
        allows_variations: false,
        allows_takebacks: false,
        enforces_time_control: true,
        auto_ends_on_checkmate: true,
        records_pgn: true,
    };
    pub const ANALYSIS: SessionPolicy = SessionPolicy {
        allows_variations: true,
        allows_takebacks: true,
        enforces_time_control: false,
        auto_ends_on_checkmate: false,
        records_pgn: true,
    };
    pub const PUZZLE: SessionPolicy = SessionPolicy {
        allows_variations: false,
        allows_takebacks: true,
        enforces_time_control: false,
        auto_ends_on_checkmate: false,
        records_pgn: false,
    };
    pub const STUDY: SessionPolicy = SessionPolicy {
        allows_variations: true,
        allows_takebacks: true,
        enforces_time_control: false,
        auto_ends_on_checkmate: false,
        records_pgn: true,
    };
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    StandardGame,
    Analysis,
    Puzzle,
    Study,
}

impl SessionMode {
    pub fn policy(self) -> SessionPolicy {
        match self {
            SessionMode::StandardGame => SessionPolicy::STANDARD_GAME,
            SessionMode::Analysis => SessionPolicy::ANALYSIS,
            SessionMode::Puzzle => SessionPolicy::PUZZLE,
            SessionMode::Study => SessionPolicy::STUDY,
        }
    }
}


#[derive(Clone, Debug)]
pub struct Session {
    policy: SessionPolicy,
    state: BoardState,
    starting_fen: String,
    writer: Option<PgnWriter>,
    // Pre-move snapshots, newest last; drives takebacks.
    history: Vec<(Move, BoardState)>,
    game_over: bool,
    result: GameResult,
    termination: Option<TerminationReason>,
}

impl Session {
    pub fn new(policy: SessionPolicy, starting_fen: Option<&str>) -> Result<Session, ChessError> {
        let state = match starting_fen {
            Some(fen) => parse_fen(fen)?,
            None => starting_position(),
        };
        let writer = match (policy.records_pgn, policy.allows_variations) {
            (false, _) => None,
            (true, false) => Some(PgnWriter::mainline()),
            (true, true) => Some(PgnWriter::with_variations()),
        };
        Ok(Session {
            policy,
            starting_fen: board_to_fen(&state),
            state,
            writer,
            history: Vec::new(),
            game_over: false,
            result: GameResult::InProgress,
            termination: None,
        })
    }

    pub fn policy(&self) -> SessionPolicy { self.policy }
    pub fn board_state(&self) -> &BoardState { &self.state }
    pub fn fen(&self) -> String { board_to_fen(&self.state) }
    pub fn legal_moves(&self) -> Vec<Move> { generate_legal_moves(&self.state) }
    pub fn is_game_over(&self) -> bool { self.game_over }
    pub fn result(&self) -> (GameResult, Option<TerminationReason>) {
        (self.result, self.termination)
    }
    pub fn pgn(&self) -> Option<String> {
        self.writer.as_ref().map(|writer| writer.to_pgn_string())
    }

    // Validate, apply, record. The writer only ever sees moves that passed
    // validation, and a rejected move changes nothing.
    pub fn submit_move(&mut self, mv: Move) -> Result<(), ChessError> {
        if self.game_over && self.policy.auto_ends_on_checkmate {
            return Err(ChessError::illegal_move(mv.to_uci(), "game is over"));
        }
        if !generate_pseudo_legal_moves(&self.state).contains(&mv) {
            return Err(ChessError::illegal_move(mv.to_uci(), "not legal in this position"));
        }
        if !leaves_king_safe(&self.state, mv) {
            return Err(ChessError::KingInCheck(mv.to_uci()));
        }

        let state_before = self.state.clone();
        self.state = apply_move_unchecked(&self.state, mv);

        if let Some(writer) = &mut self.writer {
            let san = compute_san(&state_before, &self.state, mv);
            writer.add_move(mv, &state_before, &san);
        }
        self.history.push((mv, state_before));

        let (result, termination) = game_result(&self.state);
        if result != GameResult::InProgress {
            self.game_over = true;
            self.result = result;
            self.termination = termination;
            if let Some(writer) = &mut self.writer {
                writer.tags_mut().set_result(result.as_str());
            }
        }
        Ok(())
    }

    // Restores the pre-move snapshot. The recorded PGN is not rewound; in
    // variation-recording modes the continuation is the caller's to shape.
    pub fn takeback(&mut self) -> bool {
        if !self.policy.allows_takebacks {
            return false;
        }
        let Some((_, state_before)) = self.history.pop() else {
            return false;
        };
        self.state = state_before;
        self.game_over = false;
        self.result = GameResult::InProgress;
        self.termination = None;
        true
    }

    pub fn start_variation(&mut self) -> Result<(), ChessError> {
        if !self.policy.allows_variations {
            return Err(ChessError::PgnWrite("this session does not allow variations".to_owned()));
        }
        match &mut self.writer {
            Some(writer) => writer.start_variation(),
            None => Err(ChessError::PgnWrite("this session does not record PGN".to_owned())),
        }
    }

    pub fn end_variation(&mut self) -> Result<(), ChessError> {
        if !self.policy.allows_variations {
            return Err(ChessError::PgnWrite("this session does not allow variations".to_owned()));
        }
        match &mut self.writer {
            Some(writer) => writer.end_variation(),
            None => Err(ChessError::PgnWrite("this session does not record PGN".to_owned())),
        }
    }

    pub fn add_comment(&mut self, comment: &str) {
        if let Some(writer) = &mut self.writer {
            writer.add_comment(comment);
        }
    }

    pub fn add_nag(&mut self, nag: u8) {
        if let Some(writer) = &mut self.writer {
            writer.add_nag(nag);
        }
    }

    pub fn set_tag(&mut self, key: &str, value: &str) {
        if let Some(writer) = &mut self.writer {
            writer.tags_mut().set(key, value);
        }
    }

    pub fn reset(&mut self, starting_fen: Option<&str>) -> Result<(), ChessError> {
        if let Some(fen) = starting_fen {
            self.state = parse_fen(fen)?;
            self.starting_fen = fen.to_owned();
        } else {
            self.state = parse_fen(&self.starting_fen)?;
        }
        self.history.clear();
        self.game_over = false;
        self.result = GameResult::InProgress;
        self.termination = None;
        if let Some(writer) = &mut self.writer {
            writer.reset();
        }
        Ok(())
    }
}

// Check and mate flags come from the post-move state; capture and
// disambiguation come from the pre-move state.
fn compute_san(state_before: &BoardState, state_after: &BoardState, mv: Move) -> String {
    let moved = state_before.piece(mv.from);
    let en_passant = moved.is_some_and(|piece| piece.kind == PieceKind::Pawn)
        && state_before.en_passant_square() == Some(mv.to);
    let flags = SanFlags {
        is_capture: state_before.piece(mv.to).is_some() || en_passant,
        is_check: is_check(state_after),
        is_checkmate: is_checkmate(state_after),
    };
    let d = disambiguation(state_before, mv);
    move_to_san(state_before, mv, flags, d.as_deref())
}
