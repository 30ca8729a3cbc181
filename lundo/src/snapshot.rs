use std::time::SystemTime;

use crate::node::{Cursor, NodeId};
use crate::UndoTree;

/// A read-only copy of the shape of a tree, without any text, for history views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub current: NodeId,
    /// In creation order, starting with the root.
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// The child `redo` follows from here.
    pub redo_child: Option<NodeId>,
    pub cursor: Option<Cursor>,
    pub timestamp: SystemTime,
}

impl TreeSnapshot {
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.get(id.index())
    }

    /// Every `(parent, child)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.iter().filter_map(|node| Some((node.parent?, node.id)))
    }

    /// The ids from `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id), move |node| self.node(node.parent?)).map(|node| node.id)
    }
}

impl UndoTree {
    pub fn snapshot(&self) -> TreeSnapshot {
        let nodes = self
            .nodes()
            .iter()
            .map(|node| NodeSnapshot {
                id: node.id(),
                parent: node.parent(),
                children: node.children().to_vec(),
                redo_child: self.redo_target(node),
                cursor: node.cursor(),
                timestamp: node.timestamp(),
            })
            .collect();

        TreeSnapshot { current: self.current_id(), nodes }
    }
}

const SCALES: [(&str, u64); 7] = [
    ("year", 3600 * 24 * 365),
    ("month", 3600 * 24 * 30),
    ("week", 3600 * 24 * 7),
    ("day", 3600 * 24),
    ("hour", 3600),
    ("minute", 60),
    ("second", 1),
];

/// Describe how long before `now` the `timestamp` was, e.g. `5 minutes ago`.
///
/// Uses the largest unit that gives a count of at least two. Anything older than two years is
/// shown as a `YYYY-MM-DD` date instead.
pub fn age(timestamp: SystemTime, now: SystemTime) -> String {
    let Ok(elapsed) = now.duration_since(timestamp) else {
        return "in the future".to_string();
    };

    let delta = elapsed.as_secs().max(1);
    if delta > SCALES[0].1 * 2 {
        return chrono::DateTime::<chrono::Utc>::from(timestamp).format("%Y-%m-%d").to_string();
    }

    let (unit, n) = SCALES
        .iter()
        .map(|&(unit, secs)| (unit, delta / secs))
        .find(|&(unit, n)| n >= 2 || unit == "second")
        .unwrap_or(("second", delta));

    if n == 1 { format!("{n} {unit} ago") } else { format!("{n} {unit}s ago") }
}

/// Convenience for [`age`] relative to the current time.
pub fn age_now(timestamp: SystemTime) -> String {
    age(timestamp, SystemTime::now())
}
