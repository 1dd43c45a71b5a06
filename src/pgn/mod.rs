//! Lossless PGN round-tripping for game trees.
//!
//! `parse` reads raw text into a nested move list, `decode` replays that
//! list into a [`GameTree`](crate::tree::GameTree), and `encode` writes a
//! tree back out. Decoding a tree's own output always reproduces the tree.

pub mod decode;
pub mod encode;
pub mod parse;

pub use decode::decode;
pub use encode::encode;
pub use parse::{parse_game, ParsedGame, ParsedMove, MAX_VARIATION_DEPTH};
