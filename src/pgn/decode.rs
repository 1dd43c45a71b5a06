//! Building a game tree from PGN text.

use shakmaty::Chess;

use crate::error::StudyError;
use crate::pgn::parse::{self, ParsedMove, MAX_VARIATION_DEPTH};
use crate::rules::{self, MoveInput, STARTING_FEN};
use crate::tree::{GameTree, Node};

/// Build a tree from PGN text. All or nothing: any unreadable header or
/// unplayable move rejects the whole input and nothing is returned.
///
/// `explicit_start` is a FEN the caller already knows the game begins from,
/// typically the position that was on the board when the text was pasted.
/// When the text carries its own `[FEN]` header the two must be the same
/// string; the comparison is textual, so callers should pass the value
/// through untouched rather than reformatted.
pub fn decode(text: &str, explicit_start: Option<&str>) -> Result<GameTree, StudyError> {
    let game = parse::parse_game(text)?.ok_or(StudyError::NoMovesParsed)?;
    if game.moves.is_empty() {
        return Err(StudyError::NoMovesParsed);
    }
    if game.depth_exceeded {
        return Err(StudyError::InvalidPgnMoves(format!(
            "variations nested deeper than {MAX_VARIATION_DEPTH}"
        )));
    }

    let header_fen = game.tags.get("FEN").map(String::as_str);
    let start_fen: String = match (explicit_start, header_fen) {
        (explicit, Some(header)) => {
            rules::position_from_fen(header)
                .map_err(|_| StudyError::InvalidFenInPgn(header.to_string()))?;
            if let Some(explicit) = explicit {
                if explicit != header {
                    return Err(StudyError::FenPgnConflict {
                        explicit: explicit.to_string(),
                        header: header.to_string(),
                    });
                }
            }
            header.to_string()
        }
        (Some(explicit), None) => {
            rules::position_from_fen(explicit)?;
            explicit.to_string()
        }
        (None, None) => STARTING_FEN.to_string(),
    };
    let root_pos = rules::position_from_fen(&start_fen)?;

    let mut next_id: u64 = 0;
    let mut root = Node::new_root(alloc(&mut next_id), start_fen);

    // A comment before the first move belongs to the game, not the move.
    let mut moves = game.moves;
    if let Some(first) = moves.first_mut() {
        let leading = std::mem::take(&mut first.comments_before);
        root.comment = leading.join(" ");
    }

    extend_line(&mut next_id, &mut root, &root_pos, &moves)?;
    Ok(GameTree::assemble(root, next_id))
}

fn alloc(next_id: &mut u64) -> u64 {
    let id = *next_id;
    *next_id += 1;
    id
}

/// Grow one line of moves under `anchor`, recursing into variations.
///
/// A variation in PGN replaces the move it follows, so its nodes branch from
/// that move's parent: they are played from the position before the move and
/// appended after it as trailing siblings. Recursion depth is bounded by the
/// parser's variation cap.
fn extend_line(
    next_id: &mut u64,
    anchor: &mut Node,
    start: &Chess,
    moves: &[ParsedMove],
) -> Result<(), StudyError> {
    let mut tail = anchor;
    let mut pos = start.clone();

    for parsed in moves {
        let input = MoveInput::San(parsed.san.san.clone());
        let applied = rules::apply(&pos, &input)
            .map_err(|_| StudyError::InvalidPgnMoves(parsed.san.to_string()))?;

        let comment = parsed
            .comments_before
            .iter()
            .chain(&parsed.comments_after)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let ply = tail.ply + 1;
        tail.children.push(Node::new_move(
            alloc(next_id),
            applied.san,
            comment,
            applied.fen,
            ply,
        ));
        let idx = tail.children.len() - 1;

        for variation in &parsed.variations {
            extend_line(next_id, tail, &pos, variation)?;
        }

        pos = applied.position;
        tail = &mut tail.children[idx];
    }

    Ok(())
}
