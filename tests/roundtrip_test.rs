//! Integration tests for the PGN codec: encoding shapes, decode structure,
//! and the guarantee that a tree survives a trip through its own PGN.

use chess_study::pgn::{decode, encode};
use chess_study::{GameTree, StudyError, STARTING_FEN};

mod common;
use common::{assert_same_nodes, san};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a tree by replaying SAN lines from the root; shared prefixes converge.
fn tree_of(lines: &[&[&str]]) -> GameTree {
    let mut tree = GameTree::new();
    for line in lines {
        let mut path = Vec::new();
        for mv in *line {
            let (next, _) = tree.insert_move(&path, &san(mv)).unwrap();
            path = next;
        }
    }
    tree
}

/// Encode, decode the result, and check the tree came back unchanged.
fn assert_round_trips(tree: &GameTree) {
    let text = encode(tree);
    let reloaded = decode(&text, None).expect("own output must decode");
    assert_same_nodes(tree.root(), reloaded.root());
    // And the text itself is a fixed point.
    assert_eq!(encode(&reloaded), text);
}

// ---------------------------------------------------------------------------
// Encoding shapes
// ---------------------------------------------------------------------------

#[test]
fn test_empty_tree_encodes_bare_result() {
    let tree = GameTree::new();
    assert_eq!(encode(&tree), " *");
    // The bare result is not a loadable game.
    assert!(matches!(
        decode(" *", None),
        Err(StudyError::NoMovesParsed)
    ));
}

#[test]
fn test_short_line() {
    let tree = tree_of(&[&["e4", "e5"]]);
    assert_eq!(encode(&tree), "1. e4 e5 *");
    assert_round_trips(&tree);
}

#[test]
fn test_variation_text_shape() {
    let tree = tree_of(&[&["e4", "e5", "Nf3"], &["e4", "c5"]]);
    assert_eq!(encode(&tree), "1. e4 e5 (1... c5) 2. Nf3 *");
    assert_round_trips(&tree);
}

// ---------------------------------------------------------------------------
// Decode structure
// ---------------------------------------------------------------------------

#[test]
fn test_decode_builds_sibling_variations() {
    let tree = decode("1. e4 e5 (1... c5) 2. Nf3 *", None).unwrap();
    let e4 = &tree.root().children[0];
    let sans: Vec<_> = e4.children.iter().map(|c| c.san.clone().unwrap()).collect();
    assert_eq!(sans, vec!["e5", "c5"]);
    assert_eq!(e4.children[0].children[0].san.as_deref(), Some("Nf3"));
    assert_eq!(tree.root().fen, STARTING_FEN);
}

#[test]
fn test_decode_ignores_numbers_and_results() {
    // Same game written three ways.
    let a = decode("1. e4 e5 2. Nf3 *", None).unwrap();
    let b = decode("e4 e5 Nf3", None).unwrap();
    let c = decode("1.e4 e5 2.Nf3 1-0", None).unwrap();
    assert_same_nodes(a.root(), b.root());
    assert_same_nodes(a.root(), c.root());
}

#[test]
fn test_decoded_san_is_canonical() {
    // Over-disambiguation is dropped on decode, so the tree matches one
    // built by playing the moves directly.
    let decoded = decode("1. Ngf3 d5", None).unwrap();
    assert_same_nodes(tree_of(&[&["Nf3", "d5"]]).root(), decoded.root());

    // A missing check suffix is restored from the position.
    let checked = decode("1. e4 f5 2. Qh5 g6", None).unwrap();
    let qh5 = &checked.root().children[0].children[0].children[0];
    assert_eq!(qh5.san.as_deref(), Some("Qh5+"));
}

#[test]
fn test_decode_rejects_unplayable_text() {
    assert!(matches!(
        decode("1. e5 *", None),
        Err(StudyError::InvalidPgnMoves(_))
    ));
    assert!(matches!(
        decode("\n\n", None),
        Err(StudyError::NoMovesParsed)
    ));
}

// ---------------------------------------------------------------------------
// Custom starting positions
// ---------------------------------------------------------------------------

#[test]
fn test_custom_start_round_trip() {
    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    let mut tree = GameTree::with_start(fen).unwrap();
    let (path, _) = tree.insert_move(&[], &san("e5")).unwrap();
    tree.insert_move(&path, &san("Nf3")).unwrap();

    let text = encode(&tree);
    assert!(text.starts_with(&format!("[FEN \"{fen}\"]\n\n")));
    assert_round_trips(&tree);
}

#[test]
fn test_explicit_start_agreement() {
    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    let text = format!("[FEN \"{fen}\"]\n\n1. e5 *");

    let tree = decode(&text, Some(fen)).unwrap();
    assert_eq!(tree.root().fen, fen);

    assert!(matches!(
        decode(&text, Some(STARTING_FEN)),
        Err(StudyError::FenPgnConflict { .. })
    ));
    assert!(matches!(
        decode("[FEN \"broken\"]\n\n1. e4 *", None),
        Err(StudyError::InvalidFenInPgn(_))
    ));
}

// ---------------------------------------------------------------------------
// Losslessness
// ---------------------------------------------------------------------------

#[test]
fn test_rich_tree_survives_round_trip() {
    let mut tree = tree_of(&[
        &["e4", "e5", "Nf3", "Nc6", "Bb5"],
        &["e4", "c5", "Nf3", "d6"],
        &["e4", "c5", "c3"],
        &["d4", "d5"],
    ]);
    tree.set_comment_at(&[], "repertoire notes").unwrap();
    tree.set_comment_at(&[0], "my main weapon").unwrap();
    tree.set_comment_at(&[0, 1, 1], "the quiet option").unwrap();
    tree.set_comment_at(&[1, 0], "solid for black").unwrap();

    assert_round_trips(&tree);
}

#[test]
fn test_normalization_is_idempotent() {
    let messy = "1.e4   e5 ( 1... c5 \n 2. Nf3 {sicilian}) 2. Nf3 Nc6  *";
    let once = encode(&decode(messy, None).unwrap());
    let twice = encode(&decode(&once, None).unwrap());
    assert_eq!(once, twice);
    assert_eq!(once, "1. e4 e5 (1... c5 2. Nf3 { sicilian }) 2. Nf3 Nc6 *");
}

#[test]
fn test_checks_and_mates_round_trip() {
    let tree = tree_of(&[&["f3", "e5", "g4", "Qh4"]]);
    let text = encode(&tree);
    assert_eq!(text, "1. f3 e5 2. g4 Qh4# *");
    assert_round_trips(&tree);
}

#[test]
fn test_promoted_variation_round_trips() {
    let mut tree = tree_of(&[&["e4", "e5", "Nf3"], &["e4", "c5", "Nc3"]]);
    tree.promote_at(&[0, 1]).unwrap();
    assert_eq!(encode(&tree), "1. e4 c5 (1... e5 2. Nf3) 2. Nc3 *");
    assert_round_trips(&tree);
}
