use lundo::{Config, Error, TreeState, UndoTree};
use serde_json::{json, Value};

use crate::branched;

fn tampered(tree: &UndoTree, f: impl FnOnce(&mut Value)) -> TreeState {
    let mut value = serde_json::to_value(tree.export()).unwrap();
    f(&mut value);
    serde_json::from_value(value).unwrap()
}

#[track_caller]
fn assert_invalid(state: TreeState, reason: &str) {
    match UndoTree::import(state, Config::default()) {
        Err(Error::InvalidState(actual)) => assert_eq!(actual, reason),
        Err(err) => panic!("expected an invalid state, got `{err}`"),
        Ok(tree) => panic!("expected an invalid state, got {tree:?}"),
    }
}

#[test]
fn json_round_trip() -> anyhow::Result<()> {
    let mut tree = branched();
    tree.undo()?;
    let json = serde_json::to_string(&tree.export())?;

    let mut imported = UndoTree::import(serde_json::from_str(&json)?, Config::default())?;
    assert_eq!(imported.export(), tree.export());
    assert_eq!(imported.current_text(), "ac");
    assert_eq!(format!("{imported:?}"), format!("{tree:?}"));

    assert_eq!(imported.redo()?.text, "acd");
    imported.undo()?;
    imported.undo()?;
    assert_eq!(imported.move_branch(lundo::Side::Left).unwrap_err(), Error::NoSiblingBranch);
    Ok(())
}

#[test]
fn restore_checks_the_buffer() -> anyhow::Result<()> {
    let tree = branched();
    let restored = UndoTree::restore(tree.export(), "acd", Config::default())?;
    assert_eq!(restored.len(), 4);

    let err = UndoTree::restore(tree.export(), "edited elsewhere", Config::default()).unwrap_err();
    assert_eq!(err, Error::StaleState);
    Ok(())
}

#[test]
fn import_rejects_broken_shapes() {
    let tree = branched();

    assert_invalid(tampered(&tree, |v| v["current"] = json!(9)), "current node 9 does not exist");
    assert_invalid(tampered(&tree, |v| v["nodes"] = json!([])), "there is no root node");
    assert_invalid(tampered(&tree, |v| v["nodes"][2]["id"] = json!(3)), "node at index 2 has id 3");
    assert_invalid(
        tampered(&tree, |v| v["nodes"][0]["edge"] = v["nodes"][1]["edge"].clone()),
        "the root has a parent",
    );
    assert_invalid(
        tampered(&tree, |v| v["nodes"][2]["edge"] = Value::Null),
        "node 2 is listed as a child of 1 but not linked to it",
    );
    assert_invalid(
        tampered(&tree, |v| {
            v["nodes"][2]["timestamp"] = json!({ "secs_since_epoch": 0, "nanos_since_epoch": 0 })
        }),
        "node 2 is older than its parent",
    );
    assert_invalid(
        tampered(&tree, |v| v["nodes"][1]["children"] = json!([3, 2])),
        "children of node 1 are not in creation order",
    );
    assert_invalid(
        tampered(&tree, |v| v["nodes"][1]["preferred"] = json!(4)),
        "preferred child 4 of node 1 is not its child",
    );
    assert_invalid(
        tampered(&tree, |v| v["nodes"][0]["children"] = json!([1, 2])),
        "node 2 is listed as a child of 0 but not linked to it",
    );
    assert_invalid(
        tampered(&tree, |v| v["nodes"][1]["children"] = json!([3])),
        "some nodes are missing from their parent's children",
    );
}

#[test]
fn import_rejects_patches_that_do_not_replay() {
    let tree = branched();

    let state = tampered(&tree, |v| v["nodes"][2]["edge"]["from_parent"] = json!([{ "Keep": 1 }]));
    let err = UndoTree::import(state, Config::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedPatch(_)), "{err}");

    let state = tampered(&tree, |v| {
        v["nodes"][2]["edge"]["to_parent"] = json!([{ "Keep": 1 }, { "Delete": "c" }])
    });
    let err = UndoTree::import(state, Config::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedPatch(_)), "{err}");

    let state = tampered(&tree, |v| v["root_text"] = json!("x"));
    assert!(UndoTree::import(state, Config::default()).is_err());
}
