//! Move legality and notation, backed by shakmaty.
//!
//! Everything else in the crate treats positions as opaque FEN strings and
//! moves as canonical SAN; this module is the only place that talks to the
//! rules engine directly.

use shakmaty::{fen::Fen, san::San, CastlingMode, Chess, EnPassantMode, File, Move, Position, Role, Square};

use crate::error::StudyError;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A move as supplied by the embedding application.
#[derive(Debug, Clone)]
pub enum MoveInput {
    /// Board coordinates, as produced by dragging a piece. Castling is the
    /// king moving two files. A pawn reaching the last rank with no explicit
    /// promotion piece promotes to a queen.
    Coordinate {
        from: Square,
        to: Square,
        promotion: Option<Role>,
    },
    /// An already-parsed algebraic move.
    San(San),
}

impl MoveInput {
    fn describe(&self) -> String {
        match self {
            MoveInput::Coordinate { from, to, .. } => format!("{}{}", from, to),
            MoveInput::San(san) => san.to_string(),
        }
    }
}

/// Outcome of playing a move: canonical notation plus the resulting position.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    /// Canonical SAN, including a `+` or `#` suffix where the move gives
    /// check or mate.
    pub san: String,
    pub fen: String,
    pub position: Chess,
}

/// Parse and validate a FEN into a playable position.
pub fn position_from_fen(fen: &str) -> Result<Chess, StudyError> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|_| StudyError::InvalidFen(fen.to_string()))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|_| StudyError::InvalidFen(fen.to_string()))
}

/// Play `input` on `pos`, rejecting anything that is not legal there.
///
/// The input is never trusted: coordinate moves are matched against the legal
/// move list and SAN is resolved in context, so the same entry point serves
/// board drags and PGN replay.
pub fn apply(pos: &Chess, input: &MoveInput) -> Result<AppliedMove, StudyError> {
    let mv = match input {
        MoveInput::San(san) => san
            .to_move(pos)
            .map_err(|_| StudyError::IllegalMove(input.describe()))?,
        MoveInput::Coordinate {
            from,
            to,
            promotion,
        } => coordinate_move(pos, *from, *to, *promotion)
            .ok_or_else(|| StudyError::IllegalMove(input.describe()))?,
    };

    let san = San::from_move(pos, mv.clone()).to_string();
    let mut next = pos.clone();
    next.play_unchecked(mv);

    let suffix = if next.is_checkmate() {
        "#"
    } else if next.is_check() {
        "+"
    } else {
        ""
    };

    Ok(AppliedMove {
        san: format!("{san}{suffix}"),
        fen: Fen::from_position(&next, EnPassantMode::Legal).to_string(),
        position: next,
    })
}

/// Find the legal move matching a from/to pair. Castling is recognized by the
/// king's two-file jump; promotions default to queen when unspecified.
fn coordinate_move(pos: &Chess, from: Square, to: Square, promotion: Option<Role>) -> Option<Move> {
    let legals = pos.legal_moves();
    for m in &legals {
        let (m_from, m_to) = match m {
            Move::Normal { from, to, .. } => (*from, *to),
            Move::EnPassant { from, to } => (*from, *to),
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() {
                    File::G
                } else {
                    File::C
                };
                (*king, Square::from_coords(file, king.rank()))
            }
            Move::Put { .. } => continue,
        };

        if m_from != from || m_to != to {
            continue;
        }

        match m {
            Move::Normal { promotion: p, .. } => {
                if *p == promotion || (promotion.is_none() && *p == Some(Role::Queen)) {
                    return Some(m.clone());
                }
            }
            _ => return Some(m.clone()),
        }
    }
    None
}
