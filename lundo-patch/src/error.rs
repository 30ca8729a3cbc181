use std::error::Error;
use std::fmt;

/// An edit script did not line up with the text it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchError {
    /// Byte offset into the input text where the script stopped making sense.
    pub offset: usize,
    pub kind: PatchErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchErrorKind {
    /// A keep or delete ran past the end of the input.
    OutOfBounds,
    /// A delete's text differs from the input at that offset.
    ContentMismatch,
    /// An op boundary fell inside a multi-byte character.
    CharBoundary,
    /// The script finished before consuming the whole input.
    TrailingInput,
}

impl PatchError {
    #[inline]
    pub(crate) fn new(offset: usize, kind: PatchErrorKind) -> Self {
        Self { offset, kind }
    }
}

impl fmt::Display for PatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchErrorKind::OutOfBounds => write!(f, "script runs past the end of the text"),
            PatchErrorKind::ContentMismatch => write!(f, "deleted text does not match"),
            PatchErrorKind::CharBoundary => write!(f, "offset is not on a char boundary"),
            PatchErrorKind::TrailingInput => write!(f, "script does not cover the whole text"),
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed patch at byte {}: {}", self.offset, self.kind)
    }
}

impl Error for PatchError {}
