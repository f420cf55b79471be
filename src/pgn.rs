// PGN model and text rendering. Doc: the de-facto standard,
// http://www.saremba.de/chessgml/standards/pgn/pgn-complete.htm

use std::collections::BTreeMap;

use time::macros::format_description;


pub const NAG_GOOD_MOVE: u8 = 1;
pub const NAG_MISTAKE: u8 = 2;
pub const NAG_BRILLIANT_MOVE: u8 = 3;
pub const NAG_BLUNDER: u8 = 4;
pub const NAG_INTERESTING_MOVE: u8 = 5;
pub const NAG_DUBIOUS_MOVE: u8 = 6;

pub fn nag_symbol(nag: u8) -> Option<&'static str> {
    match nag {
        NAG_GOOD_MOVE => Some("!"),
        NAG_MISTAKE => Some("?"),
        NAG_BRILLIANT_MOVE => Some("!!"),
        NAG_BLUNDER => Some("??"),
        NAG_INTERESTING_MOVE => Some("!?"),
        NAG_DUBIOUS_MOVE => Some("?!"),
        _ => None,
    }
}

pub fn nag_from_symbol(symbol: &str) -> Option<u8> {
    match symbol {
        "!" => Some(NAG_GOOD_MOVE),
        "?" => Some(NAG_MISTAKE),
        "!!" => Some(NAG_BRILLIANT_MOVE),
        "??" => Some(NAG_BLUNDER),
        "!?" => Some(NAG_INTERESTING_MOVE),
        "?!" => Some(NAG_DUBIOUS_MOVE),
        _ => None,
    }
}

// Unknown glyphs keep the numeric "$N" form.
pub fn format_nag(nag: u8) -> String {
    match nag_symbol(nag) {
        Some(symbol) => symbol.to_owned(),
        None => format!("${nag}"),
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PgnMove {
    pub san: String,
    pub comment: Option<String>,
    pub nags: Vec<u8>,
}

impl PgnMove {
    pub fn new(san: impl Into<String>) -> Self {
        PgnMove { san: san.into(), comment: None, nags: Vec::new() }
    }
}

// A recorded move plus the alternative lines that could replace it. Each
// variation is the complete ordered line, so nested serialization can recurse
// the whole subtree.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PgnNode {
    pub mv: PgnMove,
    pub variations: Vec<Vec<PgnNode>>,
    pub comment_before: Option<String>,
}

impl PgnNode {
    pub fn new(mv: PgnMove) -> Self {
        PgnNode { mv, variations: Vec::new(), comment_before: None }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PgnGame {
    pub tags: TagPairs,
    pub moves: Vec<PgnNode>,
    pub result: String,
}

impl PgnGame {
    pub fn render(&self) -> String {
        self.render_from(1, true)
    }

    // Games recorded from a setup position may start mid-game or with black
    // to move.
    pub fn render_from(&self, first_number: u32, first_is_white: bool) -> String {
        format!(
            "{}\n{}",
            self.tags.render(),
            render_movetext(&self.moves, first_number, first_is_white, &self.result),
        )
    }
}


pub const SEVEN_TAG_ROSTER: [&str; 7] =
    ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

// The seven-tag roster is always present and rendered first in its fixed
// order; any other tags follow alphabetically.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TagPairs {
    tags: BTreeMap<String, String>,
}

impl TagPairs {
    pub fn new() -> Self {
        let mut tags = BTreeMap::new();
        for key in SEVEN_TAG_ROSTER {
            let default = match key {
                "Date" => "????.??.??",
                "Result" => "*",
                _ => "?",
            };
            tags.insert(key.to_owned(), default.to_owned());
        }
        TagPairs { tags }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }
    pub fn get(&self, key: &str) -> Option<&str> { self.tags.get(key).map(String::as_str) }
    pub fn remove(&mut self, key: &str) {
        self.tags.remove(key);
    }
    pub fn all(&self) -> &BTreeMap<String, String> { &self.tags }

    pub fn result(&self) -> &str {
        self.get("Result").unwrap_or("*")
    }

    pub fn set_players(&mut self, white: &str, black: &str) {
        self.set("White", white);
        self.set("Black", black);
    }
    pub fn set_event(&mut self, event: &str, site: &str, round: &str) {
        self.set("Event", event);
        self.set("Site", site);
        self.set("Round", round);
    }
    pub fn set_result(&mut self, result: &str) {
        let result = if RESULT_TOKENS.contains(&result) { result } else { "*" };
        self.set("Result", result);
    }
    pub fn set_date_today(&mut self) {
        let today = time::OffsetDateTime::now_utc()
            .format(format_description!("[year].[month].[day]"))
            .unwrap();
        self.set("Date", today);
    }
    pub fn set_elo(&mut self, white_elo: Option<u32>, black_elo: Option<u32>) {
        if let Some(elo) = white_elo {
            self.set("WhiteElo", elo.to_string());
        }
        if let Some(elo) = black_elo {
            self.set("BlackElo", elo.to_string());
        }
    }
    pub fn set_time_control(&mut self, time_control: &str) {
        self.set("TimeControl", time_control);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for key in SEVEN_TAG_ROSTER {
            if let Some(value) = self.tags.get(key) {
                out.push_str(&format!("[{key} \"{value}\"]\n"));
            }
        }
        for (key, value) in &self.tags {
            if !SEVEN_TAG_ROSTER.contains(&key.as_str()) {
                out.push_str(&format!("[{key} \"{value}\"]\n"));
            }
        }
        out
    }
}


pub fn serialize_comment(comment: &str) -> String {
    format!("{{ {} }}", comment.replace('}', "\\}"))
}


const LINE_WIDTH: usize = 80;

// Word-wraps movetext to roughly LINE_WIDTH columns.
pub(crate) struct TextDocument {
    text: String,
    last_line_len: usize,
}

impl TextDocument {
    pub fn new() -> Self {
        TextDocument { text: String::new(), last_line_len: 0 }
    }
    pub fn push_word(&mut self, word: &str) {
        const SPACE_WIDTH: usize = 1;
        if self.last_line_len == 0 {
            // no separators: first record
        } else if self.last_line_len + word.len() + SPACE_WIDTH <= LINE_WIDTH {
            self.text.push(' ');
            self.last_line_len += SPACE_WIDTH;
        } else {
            self.text.push('\n');
            self.last_line_len = 0;
        }
        self.text.push_str(word);
        self.last_line_len += word.len();
    }
    pub fn render(&self) -> String {
        let trailing_newline = if self.last_line_len > 0 { "\n" } else { "" };
        format!("{}{}", self.text, trailing_newline)
    }
}


// Serializes a move sequence with nested variations and appends the result
// token. Black moves re-emit "N..." at line starts and after interruptions
// (comments, variations).
pub(crate) fn render_movetext(
    nodes: &[PgnNode], first_number: u32, first_is_white: bool, result: &str,
) -> String {
    let mut tokens = Vec::new();
    emit_line(nodes, first_number, first_is_white, &mut tokens);
    tokens.push(result.to_owned());
    let mut doc = TextDocument::new();
    for word in glue_tokens(&tokens) {
        doc.push_word(&word);
    }
    doc.render()
}

fn emit_line(nodes: &[PgnNode], first_number: u32, first_is_white: bool, tokens: &mut Vec<String>) {
    let mut number = first_number;
    let mut is_white = first_is_white;
    let mut interrupted = true; // a line start always needs an indicator
    for node in nodes {
        if let Some(comment) = &node.comment_before {
            tokens.push(serialize_comment(comment));
            interrupted = true;
        }
        let mut word = if is_white {
            format!("{number}. {}", node.mv.san)
        } else if interrupted {
            format!("{number}... {}", node.mv.san)
        } else {
            node.mv.san.clone()
        };
        for &nag in &node.mv.nags {
            word.push_str(&format_nag(nag));
        }
        tokens.push(word);
        interrupted = false;
        if let Some(comment) = &node.mv.comment {
            tokens.push(serialize_comment(comment));
            interrupted = true;
        }
        for line in &node.variations {
            // A variation replaces this move, so it restarts from this move's
            // number and side-to-move indicator.
            tokens.push("(".to_owned());
            emit_line(line, number, is_white, tokens);
            tokens.push(")".to_owned());
            interrupted = true;
        }
        if !is_white {
            number += 1;
        }
        is_white = !is_white;
    }
}

// Folds "(" into the following word and ")" into the preceding one, so
// parentheses hug the variation text.
fn glue_tokens(tokens: &[String]) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut pending_open = String::new();
    for token in tokens {
        match token.as_str() {
            "(" => pending_open.push('('),
            ")" => match words.last_mut() {
                Some(last) => last.push(')'),
                None => words.push(")".to_owned()),
            },
            _ => {
                words.push(format!("{pending_open}{token}"));
                pending_open.clear();
            }
        }
    }
    words
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn roster_order_then_alphabetical() {
        let mut tags = TagPairs::new();
        tags.set_players("Alice", "Bob");
        tags.set("WhiteElo", "2400");
        tags.set("Annotator", "Carol");
        let rendered = tags.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "[Event \"?\"]");
        assert_eq!(lines[4], "[White \"Alice\"]");
        assert_eq!(lines[5], "[Black \"Bob\"]");
        assert_eq!(lines[6], "[Result \"*\"]");
        assert_eq!(lines[7], "[Annotator \"Carol\"]");
        assert_eq!(lines[8], "[WhiteElo \"2400\"]");
    }

    #[test]
    fn tag_conveniences() {
        let mut tags = TagPairs::new();
        tags.set_elo(Some(2400), None);
        tags.set_time_control("300+3");
        tags.set_result("2-0"); // not a legal token
        assert_eq!(tags.get("WhiteElo"), Some("2400"));
        assert_eq!(tags.get("BlackElo"), None);
        assert_eq!(tags.get("TimeControl"), Some("300+3"));
        assert_eq!(tags.result(), "*");
        tags.set_date_today();
        let date = tags.get("Date").unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], ".");
        tags.remove("TimeControl");
        assert!(!tags.all().contains_key("TimeControl"));
    }

    #[test]
    fn comment_escapes_closing_brace() {
        assert_eq!(serialize_comment("deep {theory} here"), "{ deep {theory\\} here }");
    }

    #[test]
    fn unknown_nag_uses_numeric_form() {
        assert_eq!(format_nag(NAG_BRILLIANT_MOVE), "!!");
        assert_eq!(format_nag(42), "$42");
    }

    #[test]
    fn movetext_wraps_long_lines() {
        let nodes: Vec<PgnNode> =
            (0..40).map(|_| PgnNode::new(PgnMove::new("Nf3"))).collect();
        let text = render_movetext(&nodes, 1, true, "*");
        assert!(text.lines().count() > 1);
        assert!(text.lines().all(|line| line.len() <= 80));
    }
}
