use std::fmt;
use std::time::SystemTime;

use lundo_patch::EditScript;

/// Index of a node in its tree. Ids are assigned in creation order starting from the root at `0`
/// and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        Self(idx)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(id: NodeId) -> usize {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte offset of the cursor in the buffer.
pub type Cursor = usize;

/// The link from a node to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub parent: NodeId,
    /// Transforms this node's text into the parent's text (undo).
    pub to_parent: EditScript,
    /// Transforms the parent's text into this node's text (redo).
    pub from_parent: EditScript,
}

/// One buffer state in the history.
///
/// Everything except the preferred child is fixed at creation; children are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) id: NodeId,
    /// `None` only for the root
    pub(crate) edge: Option<Edge>,
    /// Oldest first
    pub(crate) children: Vec<NodeId>,
    /// The child `redo` descends into.
    pub(crate) preferred: Option<NodeId>,
    pub(crate) cursor: Option<Cursor>,
    pub(crate) timestamp: SystemTime,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        edge: Option<Edge>,
        cursor: Option<Cursor>,
        timestamp: SystemTime,
    ) -> Self {
        Self { id, edge, children: vec![], preferred: None, cursor, timestamp }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.edge.as_ref().map(|edge| edge.parent)
    }

    #[inline]
    pub fn edge(&self) -> Option<&Edge> {
        self.edge.as_ref()
    }

    #[inline]
    pub fn patch_to_parent(&self) -> Option<&EditScript> {
        self.edge.as_ref().map(|edge| &edge.to_parent)
    }

    #[inline]
    pub fn patch_from_parent(&self) -> Option<&EditScript> {
        self.edge.as_ref().map(|edge| &edge.from_parent)
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The child last chosen by an insert or a branch switch, if any.
    #[inline]
    pub fn preferred_child(&self) -> Option<NodeId> {
        self.preferred
    }

    #[inline]
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// When the node was created. Never earlier than its parent's timestamp.
    #[inline]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.edge.is_none()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A node with more than one child.
    #[inline]
    pub fn is_branch_point(&self) -> bool {
        self.children.len() > 1
    }
}
