use expect_test::expect;
use lundo::{Direction, Error, NodeId, Side};

use crate::{branched, typed};

#[test]
fn walk_back_to_the_root_and_forward_again() -> anyhow::Result<()> {
    let texts = ["f", "fn", "fn m", "fn main", "fn main() {}"];
    let mut tree = typed(texts);

    for expected in texts.iter().rev().skip(1).chain([&""]) {
        assert_eq!(tree.undo()?.text, *expected);
    }
    assert_eq!(tree.undo().unwrap_err(), Error::AtRoot);

    for expected in texts {
        let step = tree.redo()?;
        assert_eq!(step.text, expected);
        assert_eq!(step.cursor, Some(expected.len()));
    }
    assert_eq!(tree.redo().unwrap_err(), Error::AtLeaf);
    Ok(())
}

#[test]
fn every_branch_stays_reachable() -> anyhow::Result<()> {
    let mut tree = branched();
    expect![[r#"
        0
          1
            2
            3*
              4 <<<
    "#]]
    .assert_eq(&format!("{tree:?}"));

    tree.undo()?;
    assert_eq!(tree.move_branch(Side::Left)?.text, "ab");
    expect![[r#"
        0
          1
            2* <<<
            3
              4
    "#]]
    .assert_eq(&format!("{tree:?}"));

    tree.undo()?;
    assert_eq!(tree.redo()?.text, "ab");
    assert_eq!(tree.move_branch(Side::Right)?.text, "ac");
    assert_eq!(tree.redo()?.text, "acd");
    Ok(())
}

#[test]
fn navigate_by_direction() -> anyhow::Result<()> {
    let mut tree = branched();
    let moves = "up up down left right down".split(' ').map(|s| s.parse::<Direction>());

    let mut texts = vec![];
    for direction in moves {
        texts.push(tree.navigate(direction.map_err(anyhow::Error::msg)?)?.text);
    }
    assert_eq!(texts, ["ac", "a", "ac", "ab", "ac", "acd"]);

    let err = tree.navigate(Direction::Down).unwrap_err();
    assert!(err.is_benign());
    expect!["nothing to redo"].assert_eq(&err.to_string());
    Ok(())
}

#[test]
fn patches_describe_each_move() -> anyhow::Result<()> {
    let mut tree = typed(["Hello, world!", "Hello!"]);
    let step = tree.undo()?;
    assert_eq!(lundo::patch::apply("Hello!", &step.patch)?, "Hello, world!");

    let step = tree.redo()?;
    expect![[r#"=5 -", world" =1"#]].assert_eq(&step.patch.to_string());
    assert_eq!(tree.head().patch_from_parent(), Some(&step.patch));
    let to_parent = tree.head().patch_to_parent().cloned();
    assert_eq!(to_parent, Some(tree.undo()?.patch));
    Ok(())
}

#[test]
fn snapshot_follows_preferences() -> anyhow::Result<()> {
    let mut tree = branched();
    let ids = tree.nodes().iter().map(|node| node.id()).collect::<Vec<_>>();
    let (first, second) = (ids[2], ids[3]);

    let snapshot = tree.snapshot();
    assert_eq!(snapshot.node(ids[1]).and_then(|node| node.redo_child), Some(second));
    assert_eq!(snapshot.ancestors(snapshot.current).count(), 4);

    tree.undo()?;
    tree.undo()?;
    assert_eq!(tree.switch_branch(Side::Left)?, first);
    assert_eq!(tree.snapshot().node(ids[1]).and_then(|node| node.redo_child), Some(first));
    assert_eq!(tree.switch_branch(Side::Left).unwrap_err(), Error::NoSiblingBranch);
    Ok(())
}

#[test]
fn jump_between_branches() -> anyhow::Result<()> {
    let mut tree = branched();
    let leaf = tree.nodes()[2].id();
    assert_eq!(tree.jump(leaf)?.text, "ab");
    assert_eq!(tree.reconstruct(NodeId::ROOT)?, "");
    assert_eq!(tree.redo().unwrap_err(), Error::AtLeaf);
    // the redo path from `a` still leads to the newer branch
    tree.undo()?;
    assert_eq!(tree.redo()?.text, "ac");
    Ok(())
}
