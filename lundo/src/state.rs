use crate::config::Config;
use crate::node::{Node, NodeId};
use crate::tree::{apply, verify};
use crate::{Error, Result, UndoTree};

/// Everything needed to rebuild an [`UndoTree`] exactly: the root text, every node with both of
/// its patches and its preferred child, and the current position.
///
/// Persisting this across sessions is left to the caller. With the `serde` feature it can be
/// serialized with any serde format.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeState {
    pub root_text: String,
    /// Indexed by node id.
    pub nodes: Vec<Node>,
    pub current: NodeId,
}

impl UndoTree {
    pub fn export(&self) -> TreeState {
        TreeState {
            root_text: self.root_text().to_owned(),
            nodes: self.nodes().to_vec(),
            current: self.current_id(),
        }
    }

    /// Rebuild a tree from an exported state.
    ///
    /// The state is checked against every structural invariant and every stored patch pair is
    /// replayed, so a corrupted state is rejected rather than discovered halfway through an undo.
    #[tracing::instrument(skip_all, fields(nodes = state.nodes.len(), current = %state.current))]
    pub fn import(state: TreeState, config: Config) -> Result<Self> {
        let TreeState { root_text, nodes, current } = state;
        check_shape(&nodes, current)?;

        let mut text = None;
        let mut stack = vec![(NodeId::ROOT, root_text.clone())];
        while let Some((id, parent_text)) = stack.pop() {
            for &child in &nodes[id.index()].children {
                let Some(edge) = nodes[child.index()].edge() else {
                    return Err(Error::InvalidState(format!("node {child} has no parent")));
                };

                let child_text = apply(&parent_text, &edge.from_parent)?;
                verify(&child_text, &edge.to_parent, &parent_text)?;
                stack.push((child, child_text));
            }

            if id == current {
                text = Some(parent_text);
            }
        }

        let text = text.ok_or_else(|| {
            Error::InvalidState(format!("current node {current} is unreachable from the root"))
        })?;

        tracing::debug!("imported tree");
        Ok(UndoTree::from_parts(nodes, current, root_text, text, config))
    }

    /// Import `state` only if it ends at `buffer`, the text the editor has just loaded.
    ///
    /// A mismatch means the file changed outside this history, so the caller should start a
    /// fresh tree from the buffer instead.
    pub fn restore(state: TreeState, buffer: &str, config: Config) -> Result<Self> {
        let tree = Self::import(state, config)?;
        if tree.current_text() != buffer {
            tracing::debug!("saved history is stale");
            return Err(Error::StaleState);
        }

        Ok(tree)
    }
}

fn check_shape(nodes: &[Node], current: NodeId) -> Result<()> {
    let invalid = |reason: String| Err(Error::InvalidState(reason));

    if nodes.is_empty() {
        return invalid("there is no root node".into());
    }

    if current.index() >= nodes.len() {
        return invalid(format!("current node {current} does not exist"));
    }

    let mut linked = 0;
    for (i, node) in nodes.iter().enumerate() {
        if node.id.index() != i {
            return invalid(format!("node at index {i} has id {}", node.id));
        }

        match node.parent() {
            None if i != 0 => return invalid(format!("node {i} has no parent")),
            Some(_) if i == 0 => return invalid("the root has a parent".into()),
            Some(parent) if parent.index() >= i => {
                return invalid(format!("node {i} has parent {parent} which is newer"));
            }
            _ => {}
        }

        let parent = node.parent().and_then(|parent| nodes.get(parent.index()));
        if parent.is_some_and(|parent| parent.timestamp > node.timestamp) {
            return invalid(format!("node {i} is older than its parent"));
        }

        if !node.children.windows(2).all(|w| w[0] < w[1]) {
            return invalid(format!("children of node {i} are not in creation order"));
        }

        let is_linked = |child: &&NodeId| {
            nodes.get(child.index()).and_then(Node::parent) == Some(node.id)
        };
        if let Some(child) = node.children.iter().find(|child| !is_linked(child)) {
            return invalid(format!("node {child} is listed as a child of {i} but not linked to it"));
        }

        if let Some(preferred) = node.preferred.filter(|child| !node.children.contains(child)) {
            return invalid(format!("preferred child {preferred} of node {i} is not its child"));
        }

        linked += node.children.len();
    }

    if linked != nodes.len() - 1 {
        return invalid("some nodes are missing from their parent's children".into());
    }

    Ok(())
}
