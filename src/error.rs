use serde::Serialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("no node at path {0:?}")]
    PathOutOfRange(Vec<usize>),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("the root node cannot be deleted")]
    RootDeletion,

    #[error("no moves found in PGN")]
    NoMovesParsed,

    #[error("FEN header in PGN is not a valid position: {0}")]
    InvalidFenInPgn(String),

    #[error("starting position conflicts with the FEN header in the PGN")]
    FenPgnConflict { explicit: String, header: String },

    #[error("PGN contains a move that cannot be played: {0}")]
    InvalidPgnMoves(String),

    #[error("PGN could not be read: {0}")]
    PgnParseError(#[from] std::io::Error),

    #[error("not a valid FEN: {0}")]
    InvalidFen(String),

    #[error("recorded line no longer replays: {0}")]
    IllegalReplay(String),
}

impl StudyError {
    /// Stable machine-readable tag for each error, used in notifications and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StudyError::PathOutOfRange(_) => "path_out_of_range",
            StudyError::IllegalMove(_) => "illegal_move",
            StudyError::RootDeletion => "root_deletion",
            StudyError::NoMovesParsed => "invalid_pgn",
            StudyError::InvalidFenInPgn(_) => "invalid_fen_in_pgn",
            StudyError::FenPgnConflict { .. } => "fen_pgn_conflict",
            StudyError::InvalidPgnMoves(_) => "invalid_pgn_moves",
            StudyError::PgnParseError(_) => "pgn_parse_error",
            StudyError::InvalidFen(_) => "invalid_fen",
            StudyError::IllegalReplay(_) => "illegal_replay",
        }
    }

    /// Payload an embedding UI can show or log without inspecting the enum.
    pub fn notification(&self) -> ErrorNotification {
        let details = match self {
            StudyError::PathOutOfRange(path) => json!({ "path": path }),
            StudyError::IllegalMove(mv) | StudyError::InvalidPgnMoves(mv) => {
                json!({ "move": mv })
            }
            StudyError::InvalidFenInPgn(fen) | StudyError::InvalidFen(fen) => {
                json!({ "fen": fen })
            }
            StudyError::FenPgnConflict { explicit, header } => {
                json!({ "explicit": explicit, "header": header })
            }
            StudyError::IllegalReplay(san) => json!({ "move": san }),
            _ => serde_json::Value::Null,
        };

        ErrorNotification {
            kind: self.kind(),
            message: self.to_string(),
            details,
        }
    }
}

/// Error surface handed to the embedding UI, serialized as
/// `{"type": ..., "message": ..., "details": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorNotification {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub details: serde_json::Value,
}
