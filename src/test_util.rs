// Test utilities that cannot live in the "tests" folder because unit tests
// use them too.

use crate::board::BoardState;
use crate::fen::parse_fen;
use crate::moves::Move;
use crate::rules::apply_move;
use crate::session::Session;


pub fn state_from_fen(fen: &str) -> BoardState {
    parse_fen(fen).unwrap()
}

// Applies a whitespace-separated UCI move list, panicking on the first
// illegal move.
pub fn replay_uci_log(state: &mut BoardState, log: &str) {
    for uci in log.split_whitespace() {
        let mv = Move::from_uci(uci).unwrap();
        *state = apply_move(state, mv).unwrap_or_else(|e| panic!("{uci}: {e}"));
    }
}

pub fn submit_uci_log(session: &mut Session, log: &str) {
    for uci in log.split_whitespace() {
        let mv = Move::from_uci(uci).unwrap();
        session.submit_move(mv).unwrap_or_else(|e| panic!("{uci}: {e}"));
    }
}
