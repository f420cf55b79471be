// The single entry point for everything outside the core: HTTP routers,
// socket workers and importers all go through here. Nothing outside the core
// may drive the rule engine or a PGN writer directly.

use std::collections::HashMap;

use log::info;

use crate::board::BoardState;
use crate::error::ChessError;
use crate::moves::Move;
use crate::outcome::{GameResult, TerminationReason};
use crate::session::{Session, SessionMode, SessionPolicy};


#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(s: impl Into<String>) -> Self { Self(s.into()) }
}


// Sessions progress independently; each one is single-writer.
pub struct CoreFacade {
    sessions: HashMap<SessionId, Session>,
}

impl CoreFacade {
    pub fn new() -> Self {
        CoreFacade { sessions: HashMap::new() }
    }

    pub fn create_session(
        &mut self,
        id: SessionId,
        mode: SessionMode,
        starting_fen: Option<&str>,
        custom_policy: Option<SessionPolicy>,
    ) -> Result<(), ChessError> {
        if self.sessions.contains_key(&id) {
            return Err(ChessError::SessionExists(id.0));
        }
        let policy = custom_policy.unwrap_or_else(|| mode.policy());
        let session = Session::new(policy, starting_fen)?;
        info!("created session {} ({mode:?})", id.0);
        self.sessions.insert(id, session);
        Ok(())
    }

    pub fn close_session(&mut self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!("closed session {}", id.0);
        }
        removed
    }

    pub fn list_sessions(&self) -> Vec<&SessionId> {
        self.sessions.keys().collect()
    }

    pub fn session(&self, id: &SessionId) -> Result<&Session, ChessError> {
        self.sessions.get(id).ok_or_else(|| ChessError::SessionNotFound(id.0.clone()))
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Result<&mut Session, ChessError> {
        self.sessions.get_mut(id).ok_or_else(|| ChessError::SessionNotFound(id.0.clone()))
    }

    pub fn submit_move(&mut self, id: &SessionId, mv: Move) -> Result<(), ChessError> {
        self.session_mut(id)?.submit_move(mv)
    }

    pub fn submit_move_uci(&mut self, id: &SessionId, uci: &str) -> Result<(), ChessError> {
        let mv = Move::from_uci(uci)?;
        self.submit_move(id, mv)
    }

    pub fn legal_moves_uci(&self, id: &SessionId) -> Result<Vec<String>, ChessError> {
        Ok(self.session(id)?.legal_moves().iter().map(Move::to_uci).collect())
    }

    pub fn board_state(&self, id: &SessionId) -> Result<BoardState, ChessError> {
        Ok(self.session(id)?.board_state().clone())
    }

    pub fn fen(&self, id: &SessionId) -> Result<String, ChessError> {
        Ok(self.session(id)?.fen())
    }

    pub fn pgn(&self, id: &SessionId) -> Result<Option<String>, ChessError> {
        Ok(self.session(id)?.pgn())
    }

    pub fn is_game_over(&self, id: &SessionId) -> Result<bool, ChessError> {
        Ok(self.session(id)?.is_game_over())
    }

    pub fn result(
        &self, id: &SessionId,
    ) -> Result<(GameResult, Option<TerminationReason>), ChessError> {
        Ok(self.session(id)?.result())
    }

    pub fn takeback(&mut self, id: &SessionId) -> Result<bool, ChessError> {
        Ok(self.session_mut(id)?.takeback())
    }

    pub fn set_players(
        &mut self, id: &SessionId, white: &str, black: &str,
    ) -> Result<(), ChessError> {
        let session = self.session_mut(id)?;
        session.set_tag("White", white);
        session.set_tag("Black", black);
        Ok(())
    }

    pub fn set_event(&mut self, id: &SessionId, event: &str, site: &str) -> Result<(), ChessError> {
        let session = self.session_mut(id)?;
        session.set_tag("Event", event);
        session.set_tag("Site", site);
        Ok(())
    }

    pub fn reset_session(
        &mut self, id: &SessionId, starting_fen: Option<&str>,
    ) -> Result<(), ChessError> {
        self.session_mut(id)?.reset(starting_fen)
    }
}
