mod history;
mod state;

use lundo::UndoTree;

/// Records each text in order, as a user typing them would.
fn typed<'a>(texts: impl IntoIterator<Item = &'a str>) -> UndoTree {
    let mut tree = UndoTree::new("");
    for text in texts {
        tree.insert(text, Some(text.len())).unwrap();
    }
    tree
}

/// `a`, `ab`, then back to `a` and a second branch `ac`, `acd`.
fn branched() -> UndoTree {
    let mut tree = typed(["a", "ab"]);
    tree.undo().unwrap();
    tree.insert("ac", Some(2)).unwrap();
    tree.insert("acd", Some(3)).unwrap();
    tree
}
