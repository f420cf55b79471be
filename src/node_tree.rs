// Canonical chapter representation: an arena of nodes keyed by opaque ids,
// rooted at a synthetic node that carries the setup FEN. The same shape
// round-trips between relational rows, the JSON blob artifact and PGN text.

use std::collections::{BTreeMap, HashMap, HashSet};

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::error::ChessError;
use crate::fen::{STARTING_FEN, board_to_fen, parse_fen};
use crate::moves::Move;
use crate::outcome::GameResult;
use crate::pgn::{PgnMove, PgnNode, TagPairs, nag_from_symbol, nag_symbol, render_movetext};
use crate::rules::apply_move;


pub type NodeId = String;

pub const VIRTUAL_ROOT_ID: &str = "virtual_root";
pub const VIRTUAL_ROOT_SAN: &str = "<root>";


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TreeNode {
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub san: String,
    pub uci: String,
    pub ply: u32,
    pub move_number: u32,
    pub fen: String,
    pub main_child: Option<NodeId>,
    // Alternative children ordered by rank; `main_child` is rank 0.
    pub variations: Vec<NodeId>,
    pub comment_before: Option<String>,
    pub comment_after: Option<String>,
    pub nags: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TreeMeta {
    pub headers: BTreeMap<String, String>,
    pub result: String,
    pub setup_fen: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NodeTree {
    pub root_id: NodeId,
    pub nodes: BTreeMap<NodeId, TreeNode>,
    pub meta: TreeMeta,
}

impl NodeTree {
    pub fn new(setup_fen: &str) -> Self {
        let root = TreeNode {
            node_id: VIRTUAL_ROOT_ID.to_owned(),
            parent_id: None,
            san: VIRTUAL_ROOT_SAN.to_owned(),
            uci: String::new(),
            ply: 0,
            move_number: 0,
            fen: setup_fen.to_owned(),
            main_child: None,
            variations: Vec::new(),
            comment_before: None,
            comment_after: None,
            nags: Vec::new(),
        };
        let mut nodes = BTreeMap::new();
        nodes.insert(root.node_id.clone(), root);
        NodeTree {
            root_id: VIRTUAL_ROOT_ID.to_owned(),
            nodes,
            meta: TreeMeta {
                headers: BTreeMap::new(),
                result: "*".to_owned(),
                setup_fen: setup_fen.to_owned(),
            },
        }
    }

    pub fn node(&self, id: &str) -> Result<&TreeNode, ChessError> {
        self.nodes
            .get(id)
            .ok_or_else(|| ChessError::InvalidVariation(format!("unknown node id {id}")))
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[&self.root_id]
    }

    // Number of real moves (everything except the virtual root).
    pub fn move_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn from_json(json: &str) -> Result<Self, ChessError> {
        serde_json::from_str(json)
            .map_err(|e| ChessError::InvalidVariation(format!("bad tree JSON: {e}")))
    }
}


// Row shapes shared with the relational store. `next_id` carries a foreign
// key onto the same table; when persisting added rows, insert with `next_id`
// nulled out first and link it in a second pass.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VariationRow {
    pub id: String,
    pub chapter_id: String,
    pub parent_id: Option<String>,
    pub next_id: Option<String>,
    pub move_number: u32,
    pub color: Color,
    pub san: String,
    pub uci: String,
    pub fen: String,
    pub rank: u32,
    pub priority: i32,
    pub visibility: String,
    pub pinned: bool,
    pub created_by: String,
    pub version: u32,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AnnotationRow {
    pub id: String,
    pub move_id: String,
    pub nag: Option<String>,
    pub text: Option<String>,
    pub author_id: String,
    pub version: u32,
}

// Chapter metadata is read-only for the core; it only feeds PGN headers.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ChapterRow {
    pub id: String,
    pub white: Option<String>,
    pub black: Option<String>,
    pub event: Option<String>,
    pub date: Option<String>,
    pub result: Option<String>,
}


pub fn db_to_tree(
    variations: &[VariationRow],
    annotations: &[AnnotationRow],
    chapter: Option<&ChapterRow>,
    setup_fen: Option<&str>,
) -> Result<NodeTree, ChessError> {
    let mut tree = NodeTree::new(setup_fen.unwrap_or(STARTING_FEN));

    let known_ids: HashSet<&str> = variations.iter().map(|row| row.id.as_str()).collect();
    let mut children: HashMap<&str, Vec<&VariationRow>> = HashMap::new();
    for row in variations {
        if row.san.is_empty() {
            return Err(ChessError::InvalidVariation(format!("node {} is missing SAN", row.id)));
        }
        if row.uci.is_empty() {
            return Err(ChessError::InvalidVariation(format!("node {} is missing UCI", row.id)));
        }
        // Rows without a parent hang off the virtual root.
        let parent = match &row.parent_id {
            None => VIRTUAL_ROOT_ID,
            Some(p) if p == VIRTUAL_ROOT_ID || known_ids.contains(p.as_str()) => p.as_str(),
            Some(p) => {
                return Err(ChessError::ParentNotFound {
                    node_id: row.id.clone(),
                    parent_id: p.clone(),
                });
            }
        };
        children.entry(parent).or_default().push(row);
    }

    let mut pending = vec![(VIRTUAL_ROOT_ID.to_owned(), 0u32)];
    while let Some((parent_id, parent_ply)) = pending.pop() {
        let Some(mut rows) = children.remove(parent_id.as_str()) else {
            continue;
        };
        // Ascending rank, ties broken by insertion order; the lowest rank is
        // the main continuation.
        rows.sort_by_key(|row| row.rank);
        for (idx, row) in rows.iter().enumerate() {
            let node = TreeNode {
                node_id: row.id.clone(),
                parent_id: Some(parent_id.clone()),
                san: row.san.clone(),
                uci: row.uci.clone(),
                ply: parent_ply + 1,
                move_number: row.move_number,
                fen: row.fen.clone(),
                main_child: None,
                variations: Vec::new(),
                comment_before: None,
                comment_after: None,
                nags: Vec::new(),
            };
            tree.nodes.insert(node.node_id.clone(), node);
            let parent = tree.nodes.get_mut(&parent_id).unwrap();
            if idx == 0 {
                parent.main_child = Some(row.id.clone());
            } else {
                parent.variations.push(row.id.clone());
            }
            pending.push((row.id.clone(), parent_ply + 1));
        }
    }
    if !children.is_empty() {
        let stray = children.values().flatten().map(|row| &row.id).join(", ");
        return Err(ChessError::InvalidVariation(format!(
            "unreachable nodes (parent cycle?): {stray}"
        )));
    }

    for annotation in annotations {
        let Some(node) = tree.nodes.get_mut(&annotation.move_id) else {
            warn!("dropping annotation {} for unknown move {}", annotation.id, annotation.move_id);
            continue;
        };
        if let Some(text) = annotation.text.as_deref().filter(|t| !t.is_empty()) {
            node.comment_after = match node.comment_after.take() {
                None => Some(text.to_owned()),
                Some(existing) => Some(format!("{existing} {text}")),
            };
        }
        if let Some(symbol) = annotation.nag.as_deref() {
            match nag_from_symbol(symbol) {
                Some(nag) => node.nags.push(nag),
                None => warn!("dropping unknown NAG {symbol:?} on move {}", annotation.move_id),
            }
        }
    }

    if let Some(chapter) = chapter {
        let headers = &mut tree.meta.headers;
        headers.insert("ChapterId".to_owned(), chapter.id.clone());
        if let Some(white) = &chapter.white {
            headers.insert("White".to_owned(), white.clone());
        }
        if let Some(black) = &chapter.black {
            headers.insert("Black".to_owned(), black.clone());
        }
        if let Some(event) = &chapter.event {
            headers.insert("Event".to_owned(), event.clone());
        }
        if let Some(date) = &chapter.date {
            headers.insert("Date".to_owned(), date.clone());
        }
        if let Some(result) = &chapter.result {
            // Unknown result strings degrade to "in progress" instead of
            // poisoning the PGN result token.
            match GameResult::from_str(result) {
                Some(_) => {
                    headers.insert("Result".to_owned(), result.clone());
                    tree.meta.result = result.clone();
                }
                None => warn!("chapter {} has unknown result {result:?}", chapter.id),
            }
        }
    }

    Ok(tree)
}


#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DbChanges {
    pub added_variations: Vec<VariationRow>,
    pub updated_variations: Vec<VariationRow>,
    pub deleted_variations: Vec<VariationRow>,
    pub added_annotations: Vec<AnnotationRow>,
    pub updated_annotations: Vec<AnnotationRow>,
    pub deleted_annotations: Vec<AnnotationRow>,
}

// The comparable part of a variation row. `next_id` is derived from
// `main_child` and deliberately excluded, so trees built from rows that never
// carried links still diff as unchanged.
fn row_fingerprint(row: &VariationRow) -> (Option<&str>, u32, Color, &str, &str, &str, u32) {
    (
        row.parent_id.as_deref(),
        row.move_number,
        row.color,
        &row.san,
        &row.uci,
        &row.fen,
        row.rank,
    )
}

pub fn tree_to_db_changes(
    target: &NodeTree,
    current_variations: &[VariationRow],
    current_annotations: &[AnnotationRow],
) -> DbChanges {
    let chapter_id = target
        .meta
        .headers
        .get("ChapterId")
        .cloned()
        .or_else(|| current_variations.first().map(|row| row.chapter_id.clone()))
        .unwrap_or_default();
    let current_by_id: HashMap<&str, &VariationRow> =
        current_variations.iter().map(|row| (row.id.as_str(), row)).collect();

    let mut changes = DbChanges::default();
    let mut desired_ids = HashSet::new();

    // Walk depth-first in rank order so emitted rows follow the tree shape.
    let mut pending: Vec<&NodeId> = Vec::new();
    let root = target.root();
    push_children(root, &mut pending);
    while let Some(node_id) = pending.pop() {
        let Ok(node) = target.node(node_id) else {
            warn!("tree references missing node {node_id}; skipping");
            continue;
        };
        desired_ids.insert(node.node_id.as_str());
        push_children(node, &mut pending);

        let parent_id = node.parent_id.as_ref().filter(|p| *p != VIRTUAL_ROOT_ID).cloned();
        let rank = parent_rank(target, node);
        let existing = current_by_id.get(node.node_id.as_str()).copied();
        let row = VariationRow {
            id: node.node_id.clone(),
            chapter_id: chapter_id.clone(),
            parent_id,
            next_id: node.main_child.clone(),
            move_number: node.move_number,
            color: if node.ply % 2 == 1 { Color::White } else { Color::Black },
            san: node.san.clone(),
            uci: node.uci.clone(),
            fen: node.fen.clone(),
            rank,
            priority: existing.map_or(0, |r| r.priority),
            visibility: existing.map_or_else(|| "public".to_owned(), |r| r.visibility.clone()),
            pinned: existing.is_some_and(|r| r.pinned),
            created_by: existing.map_or_else(String::new, |r| r.created_by.clone()),
            version: existing.map_or(1, |r| r.version),
        };
        match existing {
            None => changes.added_variations.push(row),
            Some(current) => {
                if row_fingerprint(current) != row_fingerprint(&row) {
                    changes.updated_variations.push(row);
                }
            }
        }
    }
    for row in current_variations {
        if !desired_ids.contains(row.id.as_str()) {
            changes.deleted_variations.push(row.clone());
        }
    }

    // Annotations diff as a set of (move_id, nag, text) triples; tree-side
    // annotations carry no row ids, so every delta is an add or a remove.
    let mut desired: Vec<(String, Option<String>, Option<String>)> = Vec::new();
    for node in target.nodes.values() {
        if node.node_id == VIRTUAL_ROOT_ID {
            continue;
        }
        if let Some(text) = &node.comment_after {
            desired.push((node.node_id.clone(), None, Some(text.clone())));
        }
        for &nag in &node.nags {
            if let Some(symbol) = nag_symbol(nag) {
                desired.push((node.node_id.clone(), Some(symbol.to_owned()), None));
            }
        }
    }
    let mut unmatched_current: Vec<&AnnotationRow> = current_annotations.iter().collect();
    for (move_id, nag, text) in desired {
        let found = unmatched_current
            .iter()
            .position(|row| row.move_id == move_id && row.nag == nag && row.text == text);
        match found {
            Some(idx) => {
                unmatched_current.swap_remove(idx);
            }
            None => changes.added_annotations.push(AnnotationRow {
                id: Uuid::new_v4().to_string(),
                move_id,
                nag,
                text,
                author_id: String::new(),
                version: 1,
            }),
        }
    }
    changes.deleted_annotations.extend(unmatched_current.into_iter().cloned());

    changes
}

fn push_children<'a>(node: &'a TreeNode, pending: &mut Vec<&'a NodeId>) {
    pending.extend(node.variations.iter().rev());
    if let Some(main) = &node.main_child {
        pending.push(main);
    }
}

fn parent_rank(tree: &NodeTree, node: &TreeNode) -> u32 {
    let Some(parent_id) = &node.parent_id else {
        return 0;
    };
    let Ok(parent) = tree.node(parent_id) else {
        return 0;
    };
    if parent.main_child.as_deref() == Some(node.node_id.as_str()) {
        return 0;
    }
    match parent.variations.iter().position(|id| id == &node.node_id) {
        Some(idx) => idx as u32 + 1,
        None => 0,
    }
}


// The definitive on-disk renderer: headers from chapter metadata, movetext
// from the tree.
pub fn build_pgn(tree: &NodeTree) -> Result<String, ChessError> {
    let mut tags = TagPairs::new();
    for (key, value) in &tree.meta.headers {
        tags.set(key.as_str(), value.as_str());
    }
    if !tree.meta.result.is_empty() {
        tags.set_result(&tree.meta.result);
    }
    if tree.meta.setup_fen != STARTING_FEN && !tree.meta.setup_fen.is_empty() {
        tags.set("SetUp", "1");
        tags.set("FEN", tree.meta.setup_fen.clone());
    }

    let (first_number, first_is_white) = match parse_fen(&tree.meta.setup_fen) {
        Ok(setup) => (setup.fullmove_number(), setup.turn() == Color::White),
        Err(_) => (1, true),
    };
    let moves = collect_line(tree, tree.root())?;
    let movetext = render_movetext(&moves, first_number, first_is_white, tags.result());
    Ok(format!("{}\n{movetext}", tags.render()))
}

// Converts the main chain under `parent` into renderable nodes; alternatives
// of each step hang off the step they replace.
fn collect_line(tree: &NodeTree, parent: &TreeNode) -> Result<Vec<PgnNode>, ChessError> {
    let mut line = Vec::new();
    let mut parent = parent;
    while let Some(main_id) = &parent.main_child {
        let main = tree.node(main_id)?;
        let mut pgn = to_pgn_node(main);
        for variation_id in &parent.variations {
            let variation = tree.node(variation_id)?;
            let mut variation_line = vec![to_pgn_node(variation)];
            variation_line.extend(collect_line(tree, variation)?);
            pgn.variations.push(variation_line);
        }
        line.push(pgn);
        parent = main;
    }
    Ok(line)
}

fn to_pgn_node(node: &TreeNode) -> PgnNode {
    PgnNode {
        mv: PgnMove {
            san: node.san.clone(),
            comment: node.comment_after.clone(),
            nags: node.nags.clone(),
        },
        variations: Vec::new(),
        comment_before: node.comment_before.clone(),
    }
}


// Replays every stored move through the rule engine and records the FEN per
// node. A stored FEN that disagrees with the replay is a corrupted tree.
pub fn build_fen_index(tree: &NodeTree) -> Result<BTreeMap<NodeId, String>, ChessError> {
    let root = tree.root();
    let setup = parse_fen(&root.fen)?;
    let mut index = BTreeMap::new();
    index.insert(root.node_id.clone(), root.fen.clone());
    replay_children(tree, root, &setup, &mut index)?;
    Ok(index)
}

fn replay_children(
    tree: &NodeTree,
    parent: &TreeNode,
    state: &crate::board::BoardState,
    index: &mut BTreeMap<NodeId, String>,
) -> Result<(), ChessError> {
    let child_ids = parent.main_child.iter().chain(parent.variations.iter());
    for child_id in child_ids {
        let child = tree.node(child_id)?;
        let mv = Move::from_uci(&child.uci)?;
        let next = apply_move(state, mv).map_err(|e| {
            ChessError::InvalidVariation(format!("node {}: {e}", child.node_id))
        })?;
        let fen = board_to_fen(&next);
        if !child.fen.is_empty() && child.fen != fen {
            return Err(ChessError::InvalidVariation(format!(
                "stored FEN for node {} does not match replay: {} vs {fen}",
                child.node_id, child.fen
            )));
        }
        index.insert(child.node_id.clone(), fen);
        replay_children(tree, child, &next, index)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn variation_row(
        id: &str, parent: Option<&str>, move_number: u32, color: Color, san: &str, uci: &str,
        rank: u32,
    ) -> VariationRow {
        VariationRow {
            id: id.to_owned(),
            chapter_id: "chapter-1".to_owned(),
            parent_id: parent.map(str::to_owned),
            next_id: None,
            move_number,
            color,
            san: san.to_owned(),
            uci: uci.to_owned(),
            fen: String::new(),
            rank,
            priority: 0,
            visibility: "public".to_owned(),
            pinned: false,
            created_by: "tester".to_owned(),
            version: 1,
        }
    }

    fn sample_rows() -> Vec<VariationRow> {
        vec![
            variation_row("m1", None, 1, Color::White, "e4", "e2e4", 0),
            variation_row("m2", Some("m1"), 1, Color::Black, "e5", "e7e5", 0),
            variation_row("m2a", Some("m1"), 1, Color::Black, "c5", "c7c5", 1),
            variation_row("m3", Some("m2"), 2, Color::White, "Nf3", "g1f3", 0),
        ]
    }

    #[test]
    fn empty_input_yields_only_the_virtual_root() {
        let tree = db_to_tree(&[], &[], None, None).unwrap();
        assert_eq!(tree.root_id, VIRTUAL_ROOT_ID);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.root().san, VIRTUAL_ROOT_SAN);
        assert_eq!(tree.meta.setup_fen, STARTING_FEN);
    }

    #[test]
    fn mainline_and_variation_structure() {
        let tree = db_to_tree(&sample_rows(), &[], None, None).unwrap();
        let root = tree.root();
        assert_eq!(root.main_child.as_deref(), Some("m1"));
        assert!(root.variations.is_empty());

        let m1 = tree.node("m1").unwrap();
        assert_eq!(m1.parent_id.as_deref(), Some(VIRTUAL_ROOT_ID));
        assert_eq!(m1.main_child.as_deref(), Some("m2"));
        assert_eq!(m1.variations, vec!["m2a".to_owned()]);
        assert_eq!(m1.ply, 1);

        let m2 = tree.node("m2").unwrap();
        assert_eq!(m2.main_child.as_deref(), Some("m3"));
        assert_eq!(m2.ply, 2);
        assert_eq!(tree.node("m3").unwrap().ply, 3);
    }

    #[test]
    fn annotations_attach_to_their_move() {
        let annotations = vec![
            AnnotationRow {
                id: "a1".to_owned(),
                move_id: "m1".to_owned(),
                nag: None,
                text: Some("Good start.".to_owned()),
                author_id: "tester".to_owned(),
                version: 1,
            },
            AnnotationRow {
                id: "a2".to_owned(),
                move_id: "m2".to_owned(),
                nag: Some("!".to_owned()),
                text: None,
                author_id: "tester".to_owned(),
                version: 1,
            },
        ];
        let tree = db_to_tree(&sample_rows(), &annotations, None, None).unwrap();
        assert_eq!(tree.node("m1").unwrap().comment_after.as_deref(), Some("Good start."));
        assert_eq!(tree.node("m2").unwrap().nags, vec![crate::pgn::NAG_GOOD_MOVE]);
    }

    #[test]
    fn chapter_metadata_populates_headers() {
        let chapter = ChapterRow {
            id: "chapter-1".to_owned(),
            white: Some("Alice".to_owned()),
            black: Some("Bob".to_owned()),
            event: Some("Club Championship".to_owned()),
            date: Some("2024.01.15".to_owned()),
            result: Some("1-0".to_owned()),
        };
        let tree = db_to_tree(&sample_rows(), &[], Some(&chapter), None).unwrap();
        assert_eq!(tree.meta.headers.get("White").map(String::as_str), Some("Alice"));
        assert_eq!(tree.meta.headers.get("ChapterId").map(String::as_str), Some("chapter-1"));
        assert_eq!(tree.meta.result, "1-0");
    }

    #[test]
    fn missing_parent_is_an_error() {
        let rows = vec![variation_row("m1", Some("ghost"), 1, Color::White, "e4", "e2e4", 0)];
        assert_eq!(
            db_to_tree(&rows, &[], None, None).unwrap_err(),
            ChessError::ParentNotFound { node_id: "m1".to_owned(), parent_id: "ghost".to_owned() }
        );
    }

    #[test]
    fn missing_san_or_uci_is_an_error() {
        let rows = vec![variation_row("m1", None, 1, Color::White, "", "e2e4", 0)];
        let err = db_to_tree(&rows, &[], None, None).unwrap_err();
        assert!(matches!(err, ChessError::InvalidVariation(ref msg) if msg.contains("SAN")));

        let rows = vec![variation_row("m1", None, 1, Color::White, "e4", "", 0)];
        let err = db_to_tree(&rows, &[], None, None).unwrap_err();
        assert!(matches!(err, ChessError::InvalidVariation(ref msg) if msg.contains("UCI")));
    }

    #[test]
    fn round_trip_produces_no_changes() {
        let rows = sample_rows();
        let annotations = vec![AnnotationRow {
            id: "a1".to_owned(),
            move_id: "m1".to_owned(),
            nag: None,
            text: Some("Good start.".to_owned()),
            author_id: "tester".to_owned(),
            version: 1,
        }];
        let tree = db_to_tree(&rows, &annotations, None, None).unwrap();
        let changes = tree_to_db_changes(&tree, &rows, &annotations);
        assert_eq!(changes, DbChanges::default());
    }

    #[test]
    fn new_node_shows_up_as_added() {
        let rows = vec![variation_row("m1", None, 1, Color::White, "e4", "e2e4", 0)];
        let mut tree = db_to_tree(&rows, &[], None, None).unwrap();
        let new_node = TreeNode {
            node_id: "m2".to_owned(),
            parent_id: Some("m1".to_owned()),
            san: "e5".to_owned(),
            uci: "e7e5".to_owned(),
            ply: 2,
            move_number: 1,
            fen: String::new(),
            main_child: None,
            variations: Vec::new(),
            comment_before: None,
            comment_after: None,
            nags: Vec::new(),
        };
        tree.nodes.insert(new_node.node_id.clone(), new_node);
        tree.nodes.get_mut("m1").unwrap().main_child = Some("m2".to_owned());

        let changes = tree_to_db_changes(&tree, &rows, &[]);
        assert_eq!(changes.added_variations.len(), 1);
        let added = &changes.added_variations[0];
        assert_eq!(added.id, "m2");
        assert_eq!(added.parent_id.as_deref(), Some("m1"));
        assert_eq!(added.rank, 0);
        assert_eq!(added.color, Color::Black);
        assert!(changes.updated_variations.is_empty());
        assert!(changes.deleted_variations.is_empty());
        // The m1 row gains a link to m2 only via `next_id`, which is not a
        // content change.
        assert!(changes.added_annotations.is_empty());
    }

    #[test]
    fn removed_nodes_show_up_as_deleted() {
        let rows = sample_rows();
        let empty_tree = NodeTree::new(STARTING_FEN);
        let changes = tree_to_db_changes(&empty_tree, &rows, &[]);
        assert_eq!(changes.deleted_variations.len(), rows.len());
    }

    #[test]
    fn edited_move_shows_up_as_updated_and_annotations_as_added() {
        let rows = vec![variation_row("m1", None, 1, Color::White, "e4", "e2e4", 0)];
        let mut tree = db_to_tree(&rows, &[], None, None).unwrap();
        {
            let m1 = tree.nodes.get_mut("m1").unwrap();
            m1.san = "d4".to_owned();
            m1.uci = "d2d4".to_owned();
            m1.comment_after = Some("A different opening".to_owned());
            m1.nags.push(crate::pgn::NAG_GOOD_MOVE);
        }
        let changes = tree_to_db_changes(&tree, &rows, &[]);
        assert_eq!(changes.updated_variations.len(), 1);
        assert_eq!(changes.updated_variations[0].san, "d4");
        assert_eq!(changes.added_annotations.len(), 2);
        assert!(changes.added_annotations.iter().any(|a| a.text.as_deref() == Some("A different opening")));
        assert!(changes.added_annotations.iter().any(|a| a.nag.as_deref() == Some("!")));
    }

    #[test]
    fn setup_fen_lands_on_the_virtual_root() {
        let custom = "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2";
        let tree = db_to_tree(&[], &[], None, Some(custom)).unwrap();
        assert_eq!(tree.meta.setup_fen, custom);
        assert_eq!(tree.root().fen, custom);
    }
}
