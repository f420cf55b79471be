// Leaf-counting correctness oracle for the rule engine.

use std::collections::BTreeMap;

use crate::board::BoardState;
use crate::rules::{apply_move_unchecked, generate_legal_moves};


// Known-good leaf counts from the starting position, indexed by depth.
pub const STARTING_POSITION_PERFT: [u64; 7] =
    [1, 20, 400, 8_902, 197_281, 4_865_609, 119_060_324];

pub fn perft(state: &BoardState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut count = 0;
    for mv in generate_legal_moves(state) {
        let next = apply_move_unchecked(state, mv);
        count += perft(&next, depth - 1);
    }
    count
}

// Per-root-move counts keyed by UCI, for pinpointing generator bugs.
pub fn perft_divide(state: &BoardState, depth: u32) -> BTreeMap<String, u64> {
    let mut results = BTreeMap::new();
    for mv in generate_legal_moves(state) {
        let next = apply_move_unchecked(state, mv);
        let count = if depth <= 1 { 1 } else { perft(&next, depth - 1) };
        results.insert(mv.to_uci(), count);
    }
    results
}
