//! Writing a game tree back out as PGN.

use regex::Regex;

use crate::rules::STARTING_FEN;
use crate::tree::{GameTree, Node};

/// Render the whole tree as a single PGN game.
///
/// Children after `children[0]` become parenthesized variations placed right
/// after the mainline move they replace. A `[FEN]` header is written only
/// when the game starts away from the standard position. Move numbers are
/// written before white moves on the main line and as `N...` before a
/// variation that opens with a black move; a variation opening with a white
/// move carries no number.
pub fn encode(tree: &GameTree) -> String {
    let mut out = String::new();
    if tree.root().fen != STARTING_FEN {
        out.push_str(&format!("[FEN \"{}\"]\n\n", tree.root().fen));
    }

    let mut movetext = String::new();
    push_move(&mut movetext, tree.root());
    write_line(&mut movetext, tree.root());
    out.push_str(movetext.trim_end());

    if !has_result(&out) {
        out.push_str(" *");
    }
    out
}

/// Whether the text already ends in a game result token.
fn has_result(text: &str) -> bool {
    let re = Regex::new(r"(1-0|0-1|1/2-1/2|\*)\s*$").unwrap();
    re.is_match(text)
}

/// Append the line continuing under `node`, with variations inline.
fn write_line(out: &mut String, node: &Node) {
    let mut node = node;
    loop {
        let main = match node.children.first() {
            Some(main) => main,
            None => break,
        };

        if main.ply % 2 == 0 {
            out.push_str(&format!("{}. ", main.ply / 2 + 1));
        }
        push_move(out, main);

        for variation in &node.children[1..] {
            write_variation(out, variation);
        }

        node = main;
    }
}

/// Append one parenthesized variation starting at `node`.
fn write_variation(out: &mut String, node: &Node) {
    let mut text = String::new();
    if node.ply % 2 == 1 {
        text.push_str(&format!("{}... ", node.ply / 2 + 1));
    }
    push_move(&mut text, node);
    write_line(&mut text, node);

    out.push('(');
    out.push_str(text.trim_end());
    out.push_str(") ");
}

/// Append a node's SAN and comment. The root has no SAN, so for it this
/// writes only the leading game comment, if any.
fn push_move(out: &mut String, node: &Node) {
    if let Some(san) = &node.san {
        out.push_str(san);
        out.push(' ');
    }
    if !node.comment.is_empty() {
        out.push_str(&format!("{{ {} }} ", node.comment));
    }
}
