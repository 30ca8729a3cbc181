use std::error::Error as StdError;
use std::fmt;

use lundo_patch::PatchError;

use crate::NodeId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Nothing to undo.
    AtRoot,
    /// Nothing to redo.
    AtLeaf,
    /// No sibling in the requested direction.
    NoSiblingBranch,
    /// A stored patch did not apply to the text it was recorded against.
    /// The tree is left exactly as it was before the failing operation.
    MalformedPatch(PatchError),
    UnknownNode(NodeId),
    /// An imported state breaks one of the tree invariants.
    InvalidState(String),
    /// An imported state does not end at the text currently in the buffer.
    StaleState,
}

impl Error {
    /// Expected outcomes of navigation that callers usually turn into a no-op or status message.
    pub fn is_benign(&self) -> bool {
        matches!(self, Error::AtRoot | Error::AtLeaf | Error::NoSiblingBranch)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AtRoot => write!(f, "nothing to undo"),
            Error::AtLeaf => write!(f, "nothing to redo"),
            Error::NoSiblingBranch => write!(f, "no branch in that direction"),
            Error::MalformedPatch(err) => write!(f, "{err}"),
            Error::UnknownNode(id) => write!(f, "no node with id {id}"),
            Error::InvalidState(reason) => write!(f, "invalid undo tree state: {reason}"),
            Error::StaleState => write!(f, "saved history does not match the buffer"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::MalformedPatch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PatchError> for Error {
    #[inline]
    fn from(err: PatchError) -> Self {
        Error::MalformedPatch(err)
    }
}
