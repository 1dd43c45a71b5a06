//! Syntax-level PGN reading.
//!
//! Turns PGN text into a nested move list with comments and variations kept
//! exactly where they were written. Nothing here consults the rules engine;
//! legality is judged later when the tree is built.

use pgn_reader::{RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use std::collections::HashMap;
use std::io::Cursor;
use std::ops::ControlFlow;

use crate::error::StudyError;

/// Variation nesting accepted before deeper brackets are dropped as
/// pathological.
pub const MAX_VARIATION_DEPTH: usize = 64;

/// One game as written, before any legality checking.
#[derive(Debug, Clone, Default)]
pub struct ParsedGame {
    pub tags: HashMap<String, String>,
    pub moves: Vec<ParsedMove>,
    /// Set when the text nested variations beyond [`MAX_VARIATION_DEPTH`];
    /// the deeper brackets were skipped, not parsed.
    pub depth_exceeded: bool,
}

/// A move token with everything the text attached to it.
#[derive(Debug, Clone)]
pub struct ParsedMove {
    pub san: SanPlus,
    /// Comments written before the move. Non-empty only for the first move
    /// of a line, since anything later belongs to the previous move.
    pub comments_before: Vec<String>,
    /// Comments written after the move.
    pub comments_after: Vec<String>,
    /// Parenthesized alternatives to this move, in writing order.
    pub variations: Vec<Vec<ParsedMove>>,
}

/// A line of moves being collected, plus comments waiting for the next move.
#[derive(Default)]
struct LineFrame {
    moves: Vec<ParsedMove>,
    pending_comments: Vec<String>,
}

/// Movetext state: a stack of open lines. The bottom frame is the main line,
/// everything above it is a variation that has not been closed yet.
struct GameLines {
    tags: HashMap<String, String>,
    stack: Vec<LineFrame>,
    /// Skipped variations whose closing bracket has not been seen yet.
    pending_skips: usize,
    depth_exceeded: bool,
}

/// Visitor that records moves, comments and variations as written.
struct GameCollector;

impl Visitor for GameCollector {
    type Tags = HashMap<String, String>;
    type Movetext = GameLines;
    type Output = ParsedGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(HashMap::new())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.insert(
            String::from_utf8_lossy(name).to_string(),
            value.decode_utf8_lossy().to_string(),
        );
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(GameLines {
            tags,
            stack: vec![LineFrame::default()],
            pending_skips: 0,
            depth_exceeded: false,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if let Some(frame) = movetext.stack.last_mut() {
            let comments_before = std::mem::take(&mut frame.pending_comments);
            frame.moves.push(ParsedMove {
                san: san_plus,
                comments_before,
                comments_after: Vec::new(),
                variations: Vec::new(),
            });
        }
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        movetext: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        let text = String::from_utf8_lossy(comment.as_bytes()).trim().to_string();
        if text.is_empty() {
            return ControlFlow::Continue(());
        }
        if let Some(frame) = movetext.stack.last_mut() {
            match frame.moves.last_mut() {
                Some(last) => last.comments_after.push(text),
                None => frame.pending_comments.push(text),
            }
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, movetext: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        let has_anchor = movetext
            .stack
            .last()
            .map(|frame| !frame.moves.is_empty())
            .unwrap_or(false);
        if !has_anchor {
            // A variation before any move has no move to replace.
            movetext.pending_skips += 1;
            return ControlFlow::Continue(Skip(true));
        }
        if movetext.stack.len() > MAX_VARIATION_DEPTH {
            // Past the cap: skip the whole bracket and flag the game.
            movetext.depth_exceeded = true;
            movetext.pending_skips += 1;
            return ControlFlow::Continue(Skip(true));
        }
        movetext.stack.push(LineFrame::default());
        ControlFlow::Continue(Skip(false))
    }

    fn end_variation(&mut self, movetext: &mut Self::Movetext) -> ControlFlow<Self::Output> {
        // A skipped variation still reports its closing bracket; that
        // bracket ends no open frame.
        if movetext.pending_skips > 0 {
            movetext.pending_skips -= 1;
            return ControlFlow::Continue(());
        }
        close_frame(movetext);
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, mut movetext: Self::Movetext) -> Self::Output {
        // Unclosed variations at end of input fold back into their parents.
        while movetext.stack.len() > 1 {
            close_frame(&mut movetext);
        }
        let moves = movetext.stack.pop().map(|frame| frame.moves).unwrap_or_default();
        ParsedGame {
            tags: movetext.tags,
            moves,
            depth_exceeded: movetext.depth_exceeded,
        }
    }
}

/// Pop the innermost open variation and hang it off the move it follows.
fn close_frame(movetext: &mut GameLines) {
    if movetext.stack.len() < 2 {
        return;
    }
    if let Some(frame) = movetext.stack.pop() {
        if frame.moves.is_empty() {
            return;
        }
        if let Some(anchor) = movetext
            .stack
            .last_mut()
            .and_then(|parent| parent.moves.last_mut())
        {
            anchor.variations.push(frame.moves);
        }
    }
}

/// Read the first game in `text`. `Ok(None)` means the input held no game at all.
pub fn parse_game(text: &str) -> Result<Option<ParsedGame>, StudyError> {
    let mut reader = Reader::new(Cursor::new(text.as_bytes()));
    let mut collector = GameCollector;
    Ok(reader.read_game(&mut collector)?)
}
