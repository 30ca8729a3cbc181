//! A branching undo history for a text buffer.
//!
//! Every recorded buffer state is a node in an [`UndoTree`]. Inserting after an undo starts a new
//! branch instead of discarding the undone states, and every state stays reachable with
//! [`UndoTree::undo`], [`UndoTree::redo`] and [`UndoTree::move_branch`].
//!
//! ```
//! use lundo::UndoTree;
//!
//! let mut tree = UndoTree::new("");
//! tree.insert("Hello, world!", Some(13)).unwrap();
//! tree.insert("Bye, world!", Some(11)).unwrap();
//!
//! let step = tree.undo().unwrap();
//! assert_eq!(step.text, "Hello, world!");
//! assert_eq!(step.cursor, Some(13));
//!
//! assert_eq!(tree.redo().unwrap().text, "Bye, world!");
//! ```
//!
//! A tree is not internally synchronized. Share it between threads behind a lock or a single
//! owning task.

mod config;
mod error;
mod navigator;
mod node;
mod snapshot;
mod state;
mod tree;

pub use lundo_patch::{self as patch, EditScript};

pub use self::config::{Config, FallbackBranch, Setting};
pub use self::error::{Error, Result};
pub use self::navigator::Direction;
pub use self::node::{Cursor, Edge, Node, NodeId};
pub use self::snapshot::{age, age_now, NodeSnapshot, TreeSnapshot};
pub use self::state::TreeState;
pub use self::tree::{Side, Step, UndoTree};
