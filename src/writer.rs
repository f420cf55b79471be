// PGN writers. Writers record what they are given and never validate: the
// session layer guarantees only legal moves reach them.

use crate::board::BoardState;
use crate::color::Color;
use crate::error::ChessError;
use crate::moves::Move;
use crate::pgn::{PgnGame, PgnMove, PgnNode, TagPairs, render_movetext};


#[derive(Clone, Debug)]
pub struct MainlineWriter {
    tags: TagPairs,
    moves: Vec<PgnNode>,
    first_number: u32,
    first_is_white: bool,
}

impl MainlineWriter {
    pub fn new() -> Self {
        MainlineWriter {
            tags: TagPairs::new(),
            moves: Vec::new(),
            first_number: 1,
            first_is_white: true,
        }
    }

    pub fn tags(&self) -> &TagPairs { &self.tags }
    pub fn tags_mut(&mut self) -> &mut TagPairs { &mut self.tags }

    pub fn add_move(&mut self, _mv: Move, state_before: &BoardState, san: &str) {
        if self.moves.is_empty() {
            // Games recorded from a setup position number from where the
            // position left off.
            self.first_number = state_before.fullmove_number();
            self.first_is_white = state_before.turn() == Color::White;
        }
        self.moves.push(PgnNode::new(PgnMove::new(san)));
    }

    pub fn add_comment(&mut self, comment: &str) {
        if let Some(node) = self.moves.last_mut() {
            node.mv.comment = Some(comment.to_owned());
        }
    }

    pub fn add_nag(&mut self, nag: u8) {
        if let Some(node) = self.moves.last_mut() {
            node.mv.nags.push(nag);
        }
    }

    pub fn move_count(&self) -> usize { self.moves.len() }
    pub fn last_san(&self) -> Option<&str> { self.moves.last().map(|node| node.mv.san.as_str()) }
    pub fn mainline_sans(&self) -> Vec<String> {
        self.moves.iter().map(|node| node.mv.san.clone()).collect()
    }

    pub fn to_game(&self) -> PgnGame {
        PgnGame {
            tags: self.tags.clone(),
            moves: self.moves.clone(),
            result: self.tags.result().to_owned(),
        }
    }

    pub fn to_pgn_string(&self) -> String {
        self.to_game().render_from(self.first_number, self.first_is_white)
    }

    pub fn reset(&mut self) {
        *self = MainlineWriter::new();
    }
}


// One frame per open "(" during recording.
#[derive(Clone, Debug)]
struct VariationFrame {
    nodes: Vec<PgnNode>,
}

#[derive(Clone, Debug)]
pub struct VariationWriter {
    tags: TagPairs,
    mainline: Vec<PgnNode>,
    stack: Vec<VariationFrame>,
    first_number: u32,
    first_is_white: bool,
}

impl VariationWriter {
    pub fn new() -> Self {
        VariationWriter {
            tags: TagPairs::new(),
            mainline: Vec::new(),
            stack: Vec::new(),
            first_number: 1,
            first_is_white: true,
        }
    }

    pub fn tags(&self) -> &TagPairs { &self.tags }
    pub fn tags_mut(&mut self) -> &mut TagPairs { &mut self.tags }

    fn current_level_mut(&mut self) -> &mut Vec<PgnNode> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.nodes,
            None => &mut self.mainline,
        }
    }

    pub fn add_move(&mut self, _mv: Move, state_before: &BoardState, san: &str) {
        if self.mainline.is_empty() && self.stack.is_empty() {
            self.first_number = state_before.fullmove_number();
            self.first_is_white = state_before.turn() == Color::White;
        }
        self.current_level_mut().push(PgnNode::new(PgnMove::new(san)));
    }

    pub fn add_comment(&mut self, comment: &str) {
        if let Some(node) = self.current_level_mut().last_mut() {
            node.mv.comment = Some(comment.to_owned());
        }
    }

    pub fn add_nag(&mut self, nag: u8) {
        if let Some(node) = self.current_level_mut().last_mut() {
            node.mv.nags.push(nag);
        }
    }

    // The new variation branches as an alternative to the last move of the
    // current level.
    pub fn start_variation(&mut self) -> Result<(), ChessError> {
        if self.current_level_mut().is_empty() {
            return Err(ChessError::PgnWrite(
                "cannot start a variation before any move".to_owned(),
            ));
        }
        self.stack.push(VariationFrame { nodes: Vec::new() });
        Ok(())
    }

    pub fn end_variation(&mut self) -> Result<(), ChessError> {
        let frame = self.stack.pop().ok_or_else(|| {
            ChessError::PgnWrite("end_variation without a matching start_variation".to_owned())
        })?;
        // An empty variation is dropped rather than serialized as "()".
        if !frame.nodes.is_empty() {
            let parent = self
                .current_level_mut()
                .last_mut()
                .expect("variation frames only open under a non-empty level");
            parent.variations.push(frame.nodes);
        }
        Ok(())
    }

    pub fn in_variation(&self) -> bool { !self.stack.is_empty() }
    pub fn variation_depth(&self) -> usize { self.stack.len() }

    pub fn move_count(&self) -> usize { self.mainline.len() }
    pub fn last_san(&self) -> Option<&str> {
        let level = match self.stack.last() {
            Some(frame) => &frame.nodes,
            None => &self.mainline,
        };
        level.last().map(|node| node.mv.san.as_str())
    }
    pub fn mainline_sans(&self) -> Vec<String> {
        self.mainline.iter().map(|node| node.mv.san.clone()).collect()
    }

    pub fn to_game(&self) -> PgnGame {
        PgnGame {
            tags: self.tags.clone(),
            moves: self.mainline.clone(),
            result: self.tags.result().to_owned(),
        }
    }

    // Unterminated variations are not rendered; callers should close every
    // `start_variation` before serializing.
    pub fn to_pgn_string(&self) -> String {
        format!(
            "{}\n{}",
            self.tags.render(),
            render_movetext(
                &self.mainline,
                self.first_number,
                self.first_is_white,
                self.tags.result(),
            ),
        )
    }

    pub fn reset(&mut self) {
        *self = VariationWriter::new();
    }
}


// The session picks a writer by policy and drives it through this enum; the
// mainline flavor rejects variation calls.
#[derive(Clone, Debug)]
pub enum PgnWriter {
    Mainline(MainlineWriter),
    Variations(VariationWriter),
}

impl PgnWriter {
    pub fn mainline() -> Self { PgnWriter::Mainline(MainlineWriter::new()) }
    pub fn with_variations() -> Self { PgnWriter::Variations(VariationWriter::new()) }

    pub fn add_move(&mut self, mv: Move, state_before: &BoardState, san: &str) {
        match self {
            PgnWriter::Mainline(w) => w.add_move(mv, state_before, san),
            PgnWriter::Variations(w) => w.add_move(mv, state_before, san),
        }
    }
    pub fn add_comment(&mut self, comment: &str) {
        match self {
            PgnWriter::Mainline(w) => w.add_comment(comment),
            PgnWriter::Variations(w) => w.add_comment(comment),
        }
    }
    pub fn add_nag(&mut self, nag: u8) {
        match self {
            PgnWriter::Mainline(w) => w.add_nag(nag),
            PgnWriter::Variations(w) => w.add_nag(nag),
        }
    }

    pub fn start_variation(&mut self) -> Result<(), ChessError> {
        match self {
            PgnWriter::Mainline(_) => Err(ChessError::PgnWrite(
                "this game mode records the mainline only".to_owned(),
            )),
            PgnWriter::Variations(w) => w.start_variation(),
        }
    }
    pub fn end_variation(&mut self) -> Result<(), ChessError> {
        match self {
            PgnWriter::Mainline(_) => Err(ChessError::PgnWrite(
                "this game mode records the mainline only".to_owned(),
            )),
            PgnWriter::Variations(w) => w.end_variation(),
        }
    }

    pub fn tags(&self) -> &TagPairs {
        match self {
            PgnWriter::Mainline(w) => w.tags(),
            PgnWriter::Variations(w) => w.tags(),
        }
    }
    pub fn tags_mut(&mut self) -> &mut TagPairs {
        match self {
            PgnWriter::Mainline(w) => w.tags_mut(),
            PgnWriter::Variations(w) => w.tags_mut(),
        }
    }

    pub fn to_pgn_string(&self) -> String {
        match self {
            PgnWriter::Mainline(w) => w.to_pgn_string(),
            PgnWriter::Variations(w) => w.to_pgn_string(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            PgnWriter::Mainline(w) => w.reset(),
            PgnWriter::Variations(w) => w.reset(),
        }
    }
}
