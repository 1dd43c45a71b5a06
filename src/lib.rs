//! Game record editing for chess study tools.
//!
//! A game is kept as a tree: one mainline plus arbitrarily nested variations,
//! with a comment on any move. [`Study`] is the main entry point, wrapping a
//! [`GameTree`] with a cursor, a comment buffer and an always-current PGN
//! rendering; `pgn::decode` / `pgn::encode` convert between trees and PGN
//! text losslessly.

pub mod error;
pub mod pgn;
pub mod rules;
pub mod study;
pub mod tree;

pub use error::{ErrorNotification, StudyError};
pub use rules::{AppliedMove, MoveInput, STARTING_FEN};
pub use study::Study;
pub use tree::{GameTree, Node};
