//! Reversible edit scripts between two strings.
//!
//! An [`EditScript`] is a run-length sequence of keep/delete/insert operations that turns one
//! specific text into another. Scripts are computed with [`diff`], replayed with [`apply`] and
//! chained with [`compose`].
//! Deleted text is stored verbatim so that replaying a script against the wrong text is detected
//! instead of silently producing garbage.
//!
//! ```
//! let script = lundo_patch::diff("Hello, world!", "Bye, world!");
//! assert_eq!(lundo_patch::apply("Hello, world!", &script).unwrap(), "Bye, world!");
//! ```

mod apply;
mod compose;
mod delta;
mod diff;
mod error;
mod script;

pub use self::apply::apply;
pub use self::compose::compose;
pub use self::delta::{Delta, DeltaRange, Deltas, TextReplace};
pub use self::diff::diff;
pub use self::error::{PatchError, PatchErrorKind};
pub use self::script::{EditScript, Op};
