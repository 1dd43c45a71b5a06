//! An editing session over one game tree.
//!
//! The session tracks where the user stands in the tree (the cursor), the
//! comment text they are editing, and a PGN rendering of the tree that is
//! refreshed after every edit so the embedding UI can display it directly.
//! Failed operations leave all of that untouched.

use shakmaty::Chess;

use crate::error::StudyError;
use crate::pgn;
use crate::rules::MoveInput;
use crate::tree::{GameTree, Node};

#[derive(Debug)]
pub struct Study {
    tree: GameTree,
    cursor: Vec<usize>,
    comment_draft: String,
    pgn: String,
}

impl Study {
    /// A fresh session from the standard starting position.
    pub fn new() -> Self {
        let mut study = Self {
            tree: GameTree::new(),
            cursor: Vec::new(),
            comment_draft: String::new(),
            pgn: String::new(),
        };
        study.refresh_pgn();
        study
    }

    /// A session from an optional starting FEN and optional PGN text.
    ///
    /// When both are given the FEN must agree with the PGN's own header, the
    /// same way [`pgn::decode`] checks it.
    pub fn setup(start_fen: Option<&str>, pgn_text: Option<&str>) -> Result<Self, StudyError> {
        let tree = match (pgn_text, start_fen) {
            (Some(text), fen) => pgn::decode(text, fen)?,
            (None, Some(fen)) => GameTree::with_start(fen)?,
            (None, None) => GameTree::new(),
        };
        let mut study = Self {
            tree,
            cursor: Vec::new(),
            comment_draft: String::new(),
            pgn: String::new(),
        };
        study.sync_draft();
        study.refresh_pgn();
        Ok(study)
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    /// The node the cursor stands on.
    pub fn current(&self) -> &Node {
        self.tree
            .node_at(&self.cursor)
            .unwrap_or_else(|_| self.tree.root())
    }

    pub fn cursor(&self) -> &[usize] {
        &self.cursor
    }

    pub fn current_fen(&self) -> &str {
        &self.current().fen
    }

    /// The current position, rebuilt by replaying the cursor's line.
    pub fn current_position(&self) -> Result<Chess, StudyError> {
        self.tree.position_at(&self.cursor)
    }

    /// PGN of the whole tree, kept in step with every edit.
    pub fn pgn(&self) -> &str {
        &self.pgn
    }

    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    /// Play a move from the current position and move the cursor onto it.
    ///
    /// Replaying a move that already exists just follows it; anything else
    /// grows the tree at the cursor. Returns the landed-on path and whether
    /// a node was created.
    pub fn play(&mut self, input: &MoveInput) -> Result<(Vec<usize>, bool), StudyError> {
        let (path, is_new) = self.tree.insert_move(&self.cursor, input)?;
        self.cursor = path.clone();
        self.sync_draft();
        self.refresh_pgn();
        if is_new {
            let san = self.current().san.as_deref().unwrap_or("");
            tracing::debug!("played {san} at {path:?}");
        }
        Ok((path, is_new))
    }

    /// Delete the node at `path` and its whole subtree. The deleted node
    /// cannot stay current, so the cursor moves to its parent.
    pub fn delete_at(&mut self, path: &[usize]) -> Result<(), StudyError> {
        self.tree.delete_at(path)?;
        self.cursor = path[..path.len() - 1].to_vec();
        self.sync_draft();
        self.refresh_pgn();
        Ok(())
    }

    /// Promote the variation at `path` to be its parent's main continuation.
    /// The cursor keeps pointing at the same node through the reordering.
    pub fn promote_at(&mut self, path: &[usize]) -> Result<Vec<usize>, StudyError> {
        let new_path = self.tree.promote_at(path)?;
        if new_path != path {
            if let Some((&promoted, parent)) = path.split_last() {
                if self.cursor.len() >= path.len() && self.cursor[..parent.len()] == *parent {
                    let at = parent.len();
                    let j = self.cursor[at];
                    self.cursor[at] = if j == promoted {
                        0
                    } else if j < promoted {
                        j + 1
                    } else {
                        j
                    };
                }
            }
        }
        self.sync_draft();
        self.refresh_pgn();
        Ok(new_path)
    }

    /// Write a comment onto the node at `path`.
    pub fn set_comment_at(&mut self, path: &[usize], text: &str) -> Result<(), StudyError> {
        self.tree.set_comment_at(path, text)?;
        if self.cursor == path {
            self.sync_draft();
        }
        self.refresh_pgn();
        Ok(())
    }

    /// Stage comment text without writing it to the tree.
    pub fn set_comment_draft(&mut self, text: &str) {
        self.comment_draft = text.to_string();
    }

    /// Write the staged comment onto the current node.
    pub fn commit_comment(&mut self) -> Result<(), StudyError> {
        let path = self.cursor.clone();
        let text = self.comment_draft.clone();
        self.set_comment_at(&path, &text)
    }

    /// Jump the cursor to `path`.
    pub fn navigate_to(&mut self, path: &[usize]) -> Result<(), StudyError> {
        self.tree.node_at(path)?;
        self.cursor = path.to_vec();
        self.sync_draft();
        Ok(())
    }

    /// Step back one move. Returns whether the cursor moved.
    pub fn back(&mut self) -> bool {
        if self.cursor.pop().is_none() {
            return false;
        }
        self.sync_draft();
        true
    }

    /// Follow the main continuation one move. Returns whether the cursor moved.
    pub fn forward(&mut self) -> bool {
        let has_child = self
            .tree
            .node_at(&self.cursor)
            .map(|node| !node.children.is_empty())
            .unwrap_or(false);
        if !has_child {
            return false;
        }
        self.cursor.push(0);
        self.sync_draft();
        true
    }

    pub fn to_root(&mut self) {
        self.cursor.clear();
        self.sync_draft();
    }

    /// Follow main continuations to the end of the current line.
    pub fn to_end(&mut self) {
        while self.forward() {}
    }

    /// Replace the whole tree with one decoded from `text`. On failure the
    /// session keeps its current tree, cursor and PGN.
    pub fn load_pgn(&mut self, text: &str) -> Result<(), StudyError> {
        match pgn::decode(text, None) {
            Ok(tree) => {
                self.install(tree);
                tracing::debug!("loaded pgn ({} bytes)", text.len());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("pgn rejected: {e}");
                Err(e)
            }
        }
    }

    /// Start over from `fen` with an empty tree.
    pub fn load_start_position(&mut self, fen: &str) -> Result<(), StudyError> {
        match GameTree::with_start(fen) {
            Ok(tree) => {
                self.install(tree);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("start position rejected: {e}");
                Err(e)
            }
        }
    }

    fn install(&mut self, tree: GameTree) {
        self.tree = tree;
        self.cursor.clear();
        self.sync_draft();
        self.refresh_pgn();
    }

    fn sync_draft(&mut self) {
        self.comment_draft = self.current().comment.clone();
    }

    fn refresh_pgn(&mut self) {
        self.pgn = pgn::encode(&self.tree);
    }
}

impl Default for Study {
    fn default() -> Self {
        Self::new()
    }
}
