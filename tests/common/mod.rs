use chess_study::{MoveInput, Node};

/// Parse a bare SAN string into a move input.
pub fn san(text: &str) -> MoveInput {
    MoveInput::San(text.parse().expect("valid SAN"))
}

/// Assert two trees are equal node for node: same moves, comments, plies,
/// positions and child order. IDs are deliberately not compared, since they
/// only have meaning within one tree instance.
pub fn assert_same_nodes(a: &Node, b: &Node) {
    assert_eq!(a.san, b.san, "san differs at ply {}", a.ply);
    assert_eq!(a.comment, b.comment, "comment differs on {:?}", a.san);
    assert_eq!(a.ply, b.ply, "ply differs on {:?}", a.san);
    assert_eq!(a.fen, b.fen, "fen differs on {:?}", a.san);
    assert_eq!(
        a.children.len(),
        b.children.len(),
        "child count differs on {:?}",
        a.san
    );
    for (left, right) in a.children.iter().zip(&b.children) {
        assert_same_nodes(left, right);
    }
}
