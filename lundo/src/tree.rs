use std::time::SystemTime;
use std::{fmt, mem};

use lundo_patch::{EditScript, PatchError, PatchErrorKind};
use rustc_hash::FxHashMap;

use crate::config::{Config, FallbackBranch};
use crate::node::{Cursor, Edge, Node, NodeId};
use crate::{Error, Result};

/// A sibling direction, in the order children were created (left is older).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Side {
    Left,
    Right,
}

/// The outcome of moving through the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The node that is now current.
    pub node: NodeId,
    /// The full text of `node`.
    pub text: String,
    /// Transforms the text before the move into `text`.
    pub patch: EditScript,
    /// The cursor recorded when `node` was created.
    pub cursor: Option<Cursor>,
}

/// The branching history of a single buffer.
///
/// Nodes live in an arena indexed by [`NodeId`] and are linked by pairs of edit scripts, so only
/// the root's text and the current text are stored in full. Any other state is rebuilt by
/// replaying patches from the nearest ancestor with a known text.
pub struct UndoTree {
    nodes: Vec<Node>,
    current: NodeId,
    root_text: String,
    /// Text of the current node
    text: String,
    cache: TextCache,
    config: Config,
}

impl UndoTree {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_config(text, None, Config::default())
    }

    pub fn with_config(text: impl Into<String>, cursor: Option<Cursor>, config: Config) -> Self {
        let text = text.into();
        Self {
            nodes: vec![Node::new(NodeId::ROOT, None, cursor, SystemTime::now())],
            current: NodeId::ROOT,
            root_text: text.clone(),
            text,
            cache: TextCache::default(),
            config,
        }
    }

    /// Assemble a tree from parts that have already been checked against every invariant.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        current: NodeId,
        root_text: String,
        text: String,
        config: Config,
    ) -> Self {
        let this = Self { nodes, current, root_text, text, cache: TextCache::default(), config };
        debug_assert!(this.invariants());
        this
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of recorded states, not counting the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn current_id(&self) -> NodeId {
        self.current
    }

    /// The current node.
    #[inline]
    pub fn head(&self) -> &Node {
        &self.nodes[self.current.index()]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// All nodes in creation order, starting with the root.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn root_text(&self) -> &str {
        &self.root_text
    }

    /// The text the buffer should currently show.
    #[inline]
    pub fn current_text(&self) -> &str {
        &self.text
    }

    /// The index among the current node's children of the one `redo` would follow.
    pub fn branch(&self) -> Option<usize> {
        let head = self.head();
        let target = self.redo_target(head)?;
        head.children.iter().position(|&child| child == target)
    }

    /// Record `text` as a new child of the current node and make it current.
    ///
    /// Returns `None` without touching the tree if `text` is already the current text.
    /// Otherwise the new node becomes the preferred child of its parent, so earlier children of
    /// the same parent are kept as alternate branches.
    #[tracing::instrument(skip_all, fields(current = %self.current))]
    pub fn insert(
        &mut self,
        text: impl Into<String>,
        cursor: Option<Cursor>,
    ) -> Result<Option<NodeId>> {
        let text = text.into();
        if text == self.text {
            tracing::trace!("text unchanged, skipping insert");
            return Ok(None);
        }

        let from_parent = lundo_patch::diff(&self.text, &text);
        let to_parent = lundo_patch::diff(&text, &self.text);
        verify(&self.text, &from_parent, &text)?;
        verify(&text, &to_parent, &self.text)?;

        let parent = self.current;
        let id = NodeId::new(self.nodes.len());
        // the wall clock can go backwards
        let timestamp = SystemTime::now().max(self.head().timestamp);
        let edge = Edge { parent, to_parent, from_parent };
        self.nodes.push(Node::new(id, Some(edge), cursor, timestamp));

        let parent_node = &mut self.nodes[parent.index()];
        parent_node.children.push(id);
        parent_node.preferred = Some(id);

        let parent_text = mem::replace(&mut self.text, text);
        self.cache.insert(&self.config, parent, parent_text);
        self.current = id;

        tracing::debug!(%parent, %id, bytes = self.text.len(), "inserted node");
        debug_assert!(self.invariants());
        Ok(Some(id))
    }

    /// Move to the parent of the current node.
    #[tracing::instrument(skip_all, fields(current = %self.current))]
    pub fn undo(&mut self) -> Result<Step> {
        let Some(edge) = self.head().edge() else {
            return Err(Error::AtRoot);
        };

        let text = apply(&self.text, &edge.to_parent)?;
        let (parent, patch) = (edge.parent, edge.to_parent.clone());
        tracing::debug!(from = %self.current, to = %parent, "undo");
        Ok(self.move_to(parent, text, patch))
    }

    /// Move to the preferred child of the current node.
    ///
    /// The preferred child is the one most recently inserted or switched to. Should a branch point
    /// have no preference, the [`FallbackBranch`] setting decides.
    #[tracing::instrument(skip_all, fields(current = %self.current))]
    pub fn redo(&mut self) -> Result<Step> {
        let Some(child) = self.redo_target(self.head()) else {
            return Err(Error::AtLeaf);
        };

        let edge = self.edge(child)?;
        let text = apply(&self.text, &edge.from_parent)?;
        let patch = edge.from_parent.clone();
        tracing::debug!(from = %self.current, to = %child, "redo");
        Ok(self.move_to(child, text, patch))
    }

    /// Move to the neighbouring sibling of the current node and make it the preferred child of
    /// their parent, so that a later `undo` then `redo` comes back down this branch.
    #[tracing::instrument(skip_all, fields(current = %self.current))]
    pub fn move_branch(&mut self, side: Side) -> Result<Step> {
        let head = self.head();
        let edge = head.edge().ok_or(Error::NoSiblingBranch)?;
        let parent = edge.parent;
        let sibling = neighbour(&self.nodes[parent.index()].children, self.current, side)
            .ok_or(Error::NoSiblingBranch)?;

        let sibling_edge = self.edge(sibling)?;
        let parent_text = apply(&self.text, &edge.to_parent)?;
        let text = apply(&parent_text, &sibling_edge.from_parent)?;
        let patch = compose(&edge.to_parent, &sibling_edge.from_parent)?;

        self.nodes[parent.index()].preferred = Some(sibling);
        self.cache.insert(&self.config, parent, parent_text);
        tracing::debug!(from = %self.current, to = %sibling, ?side, "move branch");
        Ok(self.move_to(sibling, text, patch))
    }

    /// Change which child of the current node `redo` follows, without moving.
    ///
    /// Returns the newly preferred child.
    #[tracing::instrument(skip_all, fields(current = %self.current))]
    pub fn switch_branch(&mut self, side: Side) -> Result<NodeId> {
        let head = self.head();
        if !head.is_branch_point() {
            return Err(Error::NoSiblingBranch);
        }

        let target = self.redo_target(head).ok_or(Error::NoSiblingBranch)?;
        let child = neighbour(&head.children, target, side).ok_or(Error::NoSiblingBranch)?;
        self.nodes[self.current.index()].preferred = Some(child);
        tracing::debug!(from = %target, to = %child, ?side, "switch branch");
        Ok(child)
    }

    /// Move directly to any node in the tree. Preferred children are left untouched.
    #[tracing::instrument(skip(self), fields(current = %self.current))]
    pub fn jump(&mut self, id: NodeId) -> Result<Step> {
        if self.node(id).is_none() {
            return Err(Error::UnknownNode(id));
        }

        let patch = self.path_patch(self.current, id)?;
        let text = self.reconstruct(id)?;
        verify(&self.text, &patch, &text)?;
        tracing::debug!(from = %self.current, to = %id, "jump");
        Ok(self.move_to(id, text, patch))
    }

    /// Rebuild the text of any node.
    ///
    /// Walks up from `id` until a node with a known text (the current node, a memoized node or
    /// the root) and replays `patch_from_parent` back down.
    pub fn reconstruct(&mut self, id: NodeId) -> Result<String> {
        if self.node(id).is_none() {
            return Err(Error::UnknownNode(id));
        }

        let mut path = vec![];
        let mut at = id;
        let mut text = loop {
            if at == self.current {
                break self.text.clone();
            }

            if let Some(text) = self.cache.get(at) {
                tracing::trace!(%at, "text cache hit");
                break text.to_owned();
            }

            match &self.nodes[at.index()].edge {
                Some(edge) => {
                    path.push(at);
                    at = edge.parent;
                }
                None => break self.root_text.clone(),
            }
        };

        tracing::trace!(%id, from = %at, depth = path.len(), "reconstruct");
        for &node in path.iter().rev() {
            text = apply(&text, &self.edge(node)?.from_parent)?;
        }

        if !path.is_empty() {
            self.cache.insert(&self.config, id, text.clone());
        }

        Ok(text)
    }

    /// The script taking the text of `from` to the text of `to`, composed from the patches on the
    /// path between them through their closest common ancestor.
    fn path_patch(&self, from: NodeId, to: NodeId) -> Result<EditScript> {
        let (mut up, mut down) = (from, to);
        let mut descent = vec![];
        let mut patch = EditScript::identity(self.text.len());
        // a parent always has a smaller id than its children
        while up != down {
            if up > down {
                let edge = self.edge(up)?;
                patch = compose(&patch, &edge.to_parent)?;
                up = edge.parent;
            } else {
                descent.push(down);
                down = self.edge(down)?.parent;
            }
        }

        for &node in descent.iter().rev() {
            patch = compose(&patch, &self.edge(node)?.from_parent)?;
        }

        Ok(patch)
    }

    fn move_to(&mut self, id: NodeId, text: String, patch: EditScript) -> Step {
        let prev = mem::replace(&mut self.current, id);
        let prev_text = mem::replace(&mut self.text, text);
        self.cache.insert(&self.config, prev, prev_text);
        debug_assert!(self.invariants());

        Step { node: id, text: self.text.clone(), patch, cursor: self.head().cursor }
    }

    fn edge(&self, id: NodeId) -> Result<&Edge> {
        self.nodes[id.index()]
            .edge()
            .ok_or_else(|| Error::InvalidState(format!("node {id} has no parent")))
    }

    pub(crate) fn redo_target(&self, node: &Node) -> Option<NodeId> {
        if let Some(preferred) = node.preferred.filter(|child| node.children.contains(child)) {
            return Some(preferred);
        }

        match self.config.fallback_branch.get() {
            FallbackBranch::Newest => node.children.last().copied(),
            FallbackBranch::Oldest => node.children.first().copied(),
        }
    }

    fn invariants(&self) -> bool {
        self.current.index() < self.nodes.len()
            && self.nodes[0].is_root()
            && self.nodes.iter().enumerate().all(|(i, node)| {
                node.id.index() == i
                    && node.parent().map_or(i == 0, |parent| {
                        parent.index() < i && self.nodes[parent.index()].timestamp <= node.timestamp
                    })
                    && node
                        .children
                        .iter()
                        .all(|child| self.nodes[child.index()].parent() == Some(node.id))
            })
    }
}

/// Renders the tree one node per line, indented by depth. The preferred child of a branch point
/// is marked with `*` and the current node with `<<<`.
impl fmt::Debug for UndoTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(NodeId::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.index()];
            write!(f, "{:indent$}{id}", "", indent = depth * 2)?;

            if let Some(parent) = node.parent().map(|parent| &self.nodes[parent.index()]) {
                if parent.is_branch_point() && self.redo_target(parent) == Some(id) {
                    write!(f, "*")?;
                }
            }

            if id == self.current {
                write!(f, " <<<")?;
            }

            writeln!(f)?;
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }

        Ok(())
    }
}

fn neighbour(children: &[NodeId], of: NodeId, side: Side) -> Option<NodeId> {
    let idx = children.iter().position(|&child| child == of)?;
    match side {
        Side::Left => idx.checked_sub(1).map(|i| children[i]),
        Side::Right => children.get(idx + 1).copied(),
    }
}

pub(crate) fn apply(text: &str, script: &EditScript) -> Result<String, PatchError> {
    lundo_patch::apply(text, script)
        .inspect_err(|err| tracing::error!(%err, "stored patch does not apply"))
}

fn compose(first: &EditScript, second: &EditScript) -> Result<EditScript, PatchError> {
    lundo_patch::compose(first, second)
        .inspect_err(|err| tracing::error!(%err, "stored patches do not compose"))
}

/// Check that `script` takes `from` to exactly `to`.
pub(crate) fn verify(from: &str, script: &EditScript, to: &str) -> Result<(), PatchError> {
    let out = apply(from, script)?;
    if out == to {
        return Ok(());
    }

    let offset = out.bytes().zip(to.bytes()).take_while(|(a, b)| a == b).count();
    tracing::error!(offset, "patch produced the wrong text");
    Err(PatchError { offset, kind: PatchErrorKind::ContentMismatch })
}

/// Memoized texts of non-current nodes.
#[derive(Default)]
struct TextCache {
    texts: FxHashMap<NodeId, String>,
}

impl TextCache {
    fn get(&self, id: NodeId) -> Option<&str> {
        self.texts.get(&id).map(String::as_str)
    }

    fn insert(&mut self, config: &Config, id: NodeId, text: String) {
        let capacity = config.text_cache_capacity.get();
        if capacity == 0 {
            return;
        }

        if self.texts.len() >= capacity && !self.texts.contains_key(&id) {
            tracing::trace!(capacity, "text cache full, clearing");
            self.texts.clear();
        }

        self.texts.insert(id, text);
    }
}
