//! Game tree with nested variations.
//!
//! Every node is one played move; `children[0]` continues the line the node
//! belongs to and later children open variations at that point. A node is
//! addressed by its path, the sequence of child indices walked from the root.
//! The empty path is the root itself, which holds the starting position and
//! no move.

use serde::Serialize;
use shakmaty::{san::SanPlus, Chess, Position};

use crate::error::StudyError;
use crate::rules::{self, MoveInput, STARTING_FEN};

/// One move of the record, plus everything that hangs off it.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Stable within one tree, never reused after deletion.
    pub id: u64,
    /// Canonical SAN of the move leading here; `None` only at the root.
    pub san: Option<String>,
    pub comment: String,
    /// Position after the move, as produced by the rules engine.
    pub fen: String,
    /// Root is -1, so white's moves sit on even plies.
    pub ply: i32,
    pub children: Vec<Node>,
}

impl Node {
    pub(crate) fn new_root(id: u64, fen: String) -> Self {
        Self {
            id,
            san: None,
            comment: String::new(),
            fen,
            ply: -1,
            children: Vec::new(),
        }
    }

    pub(crate) fn new_move(id: u64, san: String, comment: String, fen: String, ply: i32) -> Self {
        Self {
            id,
            san: Some(san),
            comment,
            fen,
            ply,
            children: Vec::new(),
        }
    }
}

/// Frees the subtree iteratively; the automatic drop glue would recurse
/// once per ply and overflow the stack on very long lines.
impl Drop for Node {
    fn drop(&mut self) {
        let mut queue = std::mem::take(&mut self.children);
        while let Some(mut node) = queue.pop() {
            queue.append(&mut node.children);
        }
    }
}

/// The full record of a game: root position plus the move tree.
#[derive(Debug, Clone)]
pub struct GameTree {
    root: Node,
    next_id: u64,
}

impl GameTree {
    /// An empty record starting from the standard position.
    pub fn new() -> Self {
        Self {
            root: Node::new_root(0, STARTING_FEN.to_string()),
            next_id: 1,
        }
    }

    /// An empty record starting from `fen`, which must describe a legal
    /// position. The string is kept verbatim as the root's FEN.
    pub fn with_start(fen: &str) -> Result<Self, StudyError> {
        rules::position_from_fen(fen)?;
        Ok(Self {
            root: Node::new_root(0, fen.to_string()),
            next_id: 1,
        })
    }

    pub(crate) fn assemble(root: Node, next_id: u64) -> Self {
        Self { root, next_id }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Resolve a path to its node.
    pub fn node_at(&self, path: &[usize]) -> Result<&Node, StudyError> {
        let mut node = &self.root;
        for &idx in path {
            node = node
                .children
                .get(idx)
                .ok_or_else(|| StudyError::PathOutOfRange(path.to_vec()))?;
        }
        Ok(node)
    }

    pub(crate) fn node_at_mut(&mut self, path: &[usize]) -> Result<&mut Node, StudyError> {
        let mut node = &mut self.root;
        for &idx in path {
            node = node
                .children
                .get_mut(idx)
                .ok_or_else(|| StudyError::PathOutOfRange(path.to_vec()))?;
        }
        Ok(node)
    }

    /// Rebuild the position at `path` by replaying its moves from the root.
    ///
    /// The stored FEN on the node is the cheap answer; this replay is the
    /// authoritative one and doubles as a corruption check, since a SAN that
    /// no longer applies means the record and the moves have drifted apart.
    pub fn position_at(&self, path: &[usize]) -> Result<Chess, StudyError> {
        let mut pos = rules::position_from_fen(&self.root.fen)
            .map_err(|_| StudyError::IllegalReplay("unreadable root position".to_string()))?;
        let mut node = &self.root;
        for &idx in path {
            node = node
                .children
                .get(idx)
                .ok_or_else(|| StudyError::PathOutOfRange(path.to_vec()))?;
            let text = node.san.as_deref().unwrap_or_default();
            let san: SanPlus = text
                .parse()
                .map_err(|_| StudyError::IllegalReplay(text.to_string()))?;
            let mv = san
                .san
                .to_move(&pos)
                .map_err(|_| StudyError::IllegalReplay(text.to_string()))?;
            pos.play_unchecked(mv);
        }
        Ok(pos)
    }

    /// Play a move from the node at `path`.
    ///
    /// If the same SAN already exists among the node's children no new node
    /// is created; the existing child's path comes back with `false`.
    /// Otherwise the move is appended as the last child (a new variation if
    /// siblings exist) and the flag is `true`. An illegal move leaves the
    /// tree untouched.
    pub fn insert_move(
        &mut self,
        path: &[usize],
        input: &MoveInput,
    ) -> Result<(Vec<usize>, bool), StudyError> {
        let parent = self.node_at(path)?;
        let pos = rules::position_from_fen(&parent.fen)
            .map_err(|_| StudyError::IllegalReplay(format!("unreadable position at {path:?}")))?;
        let applied = rules::apply(&pos, input)?;

        if let Some(existing) = parent
            .children
            .iter()
            .position(|c| c.san.as_deref() == Some(applied.san.as_str()))
        {
            let mut found = path.to_vec();
            found.push(existing);
            return Ok((found, false));
        }
        let ply = parent.ply + 1;

        let id = self.next_id;
        self.next_id += 1;
        let parent = self.node_at_mut(path)?;
        parent
            .children
            .push(Node::new_move(id, applied.san, String::new(), applied.fen, ply));

        let mut new_path = path.to_vec();
        new_path.push(parent.children.len() - 1);
        Ok((new_path, true))
    }

    /// Remove the node at `path` along with everything after it.
    pub fn delete_at(&mut self, path: &[usize]) -> Result<(), StudyError> {
        let (last, parent_path) = match path.split_last() {
            Some(split) => split,
            None => return Err(StudyError::RootDeletion),
        };
        let parent = self.node_at_mut(parent_path)?;
        if *last >= parent.children.len() {
            return Err(StudyError::PathOutOfRange(path.to_vec()));
        }
        parent.children.remove(*last);
        Ok(())
    }

    /// Make the variation at `path` the main continuation of its parent.
    ///
    /// The promoted child moves to the front and the former siblings keep
    /// their relative order behind it. Returns the node's new path; promoting
    /// a node already on the main line is a no-op.
    pub fn promote_at(&mut self, path: &[usize]) -> Result<Vec<usize>, StudyError> {
        self.node_at(path)?;
        let (last, parent_path) = match path.split_last() {
            Some(split) => split,
            None => return Ok(Vec::new()),
        };
        if *last == 0 {
            return Ok(path.to_vec());
        }
        let parent = self.node_at_mut(parent_path)?;
        let node = parent.children.remove(*last);
        parent.children.insert(0, node);

        let mut new_path = parent_path.to_vec();
        new_path.push(0);
        Ok(new_path)
    }

    /// Replace the comment on the node at `path`. Brace characters are
    /// dropped so the text stays embeddable in PGN.
    pub fn set_comment_at(&mut self, path: &[usize], text: &str) -> Result<(), StudyError> {
        let node = self.node_at_mut(path)?;
        node.comment = text.replace(['{', '}'], "").trim().to_string();
        Ok(())
    }
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}
