#![no_main]

use libfuzzer_sys::fuzz_target;
use lundo::{Direction, Side, UndoTree};

#[derive(Debug, arbitrary::Arbitrary)]
enum Action {
    Insert(String),
    Navigate(Direction),
    SwitchBranch(Side),
    Jump(u8),
}

fuzz_target!(|actions: Vec<Action>| {
    let mut tree = UndoTree::new("");
    for action in actions {
        let before = tree.current_text().to_owned();
        match action {
            Action::Insert(text) => {
                tree.insert(text, None).unwrap();
            }
            Action::Navigate(direction) => match tree.navigate(direction) {
                Ok(step) => assert_eq!(lundo::patch::apply(&before, &step.patch).unwrap(), step.text),
                Err(err) => assert!(err.is_benign(), "{err}"),
            },
            Action::SwitchBranch(side) => {
                if let Err(err) = tree.switch_branch(side) {
                    assert!(err.is_benign(), "{err}");
                }
            }
            Action::Jump(idx) => {
                let Some(id) = tree.nodes().get(idx as usize).map(|node| node.id()) else { continue };
                let step = tree.jump(id).unwrap();
                assert_eq!(lundo::patch::apply(&before, &step.patch).unwrap(), step.text);
            }
        }

        let current = tree.current_id();
        assert_eq!(tree.reconstruct(current).unwrap(), tree.current_text());
    }

    // every node still rebuilds and the exported state imports cleanly
    for id in tree.nodes().iter().map(|node| node.id()).collect::<Vec<_>>() {
        tree.reconstruct(id).unwrap();
    }
    let imported = UndoTree::import(tree.export(), tree.config().clone()).unwrap();
    assert_eq!(imported.current_text(), tree.current_text());
});
