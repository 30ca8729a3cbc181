use std::borrow::Cow;
use std::fmt;

use crate::delta::{Delta, Deltas};

/// A single step of an [`EditScript`].
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    /// Copy the next `n` bytes of the input unchanged.
    Keep(usize),
    /// Drop the given text, which must be the next bytes of the input.
    Delete(String),
    /// Emit the given text.
    Insert(String),
}

impl Op {
    /// Bytes of input consumed by a keep or delete, or bytes emitted by an insert.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Op::Keep(n) => *n,
            Op::Delete(text) | Op::Insert(text) => text.len(),
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        match self {
            Op::Keep(n) => *n == 0,
            Op::Delete(text) | Op::Insert(text) => text.is_empty(),
        }
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Keep(n) => write!(f, "={n}"),
            Op::Delete(text) => write!(f, "-{text:?}"),
            Op::Insert(text) => write!(f, "+{text:?}"),
        }
    }
}

/// A sequence of operations that transforms one particular text into another.
///
/// Ops are normalized on construction: empty ops are dropped and neighbouring ops of the same
/// kind are merged, so two scripts describing the same edit in the same order compare equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Op>", into = "Vec<Op>"))]
pub struct EditScript {
    ops: Box<[Op]>,
}

impl EditScript {
    pub fn new(ops: impl IntoIterator<Item = Op>) -> Self {
        let mut builder = ScriptBuilder::default();
        ops.into_iter().for_each(|op| builder.push(op));
        builder.finish()
    }

    /// The script that maps a text of `len` bytes to itself.
    pub fn identity(len: usize) -> Self {
        Self::new([Op::Keep(len)])
    }

    #[inline]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Returns `true` if applying the script does not change the text.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, Op::Keep(_)))
    }

    /// The byte length of the text this script applies to.
    pub fn old_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Keep(n) => *n,
                Op::Delete(text) => text.len(),
                Op::Insert(_) => 0,
            })
            .sum()
    }

    /// The byte length of the text this script produces.
    pub fn new_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Keep(n) => *n,
                Op::Insert(text) => text.len(),
                Op::Delete(_) => 0,
            })
            .sum()
    }

    /// Lower the script into a set of byte range replacements against the old text.
    ///
    /// Every maximal run of deletes and inserts between two keeps becomes a single [`Delta`].
    pub fn deltas(&self) -> Deltas<'_> {
        let mut deltas = vec![];
        let mut offset = 0;
        // (start, deleted bytes, inserted text) of the run being accumulated
        let mut pending: Option<(usize, usize, Cow<'_, str>)> = None;

        for op in self.ops.iter() {
            match op {
                Op::Keep(n) => {
                    if let Some((start, deleted, text)) = pending.take() {
                        deltas.push(Delta::new(start..start + deleted, text));
                    }
                    offset += n;
                }
                Op::Delete(text) => {
                    let (_, deleted, _) = pending.get_or_insert((offset, 0, Cow::Borrowed("")));
                    *deleted += text.len();
                    offset += text.len();
                }
                Op::Insert(text) => {
                    let (_, _, inserted) = pending.get_or_insert((offset, 0, Cow::Borrowed("")));
                    if inserted.is_empty() {
                        *inserted = Cow::Borrowed(text.as_str());
                    } else {
                        inserted.to_mut().push_str(text);
                    }
                }
            }
        }

        if let Some((start, deleted, text)) = pending {
            deltas.push(Delta::new(start..start + deleted, text));
        }

        Deltas::new(deltas)
    }
}

impl fmt::Debug for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ops.iter()).finish()
    }
}

/// Compact single-line form: `=5 -"Hello" +"Bye" =8`.
impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{op:?}")?;
        }
        Ok(())
    }
}

impl From<Vec<Op>> for EditScript {
    #[inline]
    fn from(ops: Vec<Op>) -> Self {
        Self::new(ops)
    }
}

impl From<EditScript> for Vec<Op> {
    #[inline]
    fn from(script: EditScript) -> Self {
        script.ops.into_vec()
    }
}

/// Accumulates ops, merging neighbours of the same kind.
#[derive(Default)]
pub(crate) struct ScriptBuilder {
    ops: Vec<Op>,
}

impl ScriptBuilder {
    pub(crate) fn push(&mut self, op: Op) {
        if op.is_empty() {
            return;
        }

        let merged = match (self.ops.last_mut(), &op) {
            (Some(Op::Keep(n)), Op::Keep(m)) => {
                *n += m;
                true
            }
            (Some(Op::Delete(text)), Op::Delete(more))
            | (Some(Op::Insert(text)), Op::Insert(more)) => {
                text.push_str(more);
                true
            }
            _ => false,
        };

        if !merged {
            self.ops.push(op);
        }
    }

    #[inline]
    pub(crate) fn keep(&mut self, n: usize) {
        self.push(Op::Keep(n))
    }

    #[inline]
    pub(crate) fn delete(&mut self, text: &str) {
        self.push(Op::Delete(text.to_owned()))
    }

    #[inline]
    pub(crate) fn insert(&mut self, text: &str) {
        self.push(Op::Insert(text.to_owned()))
    }

    pub(crate) fn finish(self) -> EditScript {
        EditScript { ops: self.ops.into_boxed_slice() }
    }
}
