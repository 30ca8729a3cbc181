use crate::error::{PatchError, PatchErrorKind};
use crate::script::{EditScript, Op, ScriptBuilder};

/// Combine `first` (`a -> b`) and `second` (`b -> c`) into a single script `a -> c` without
/// materializing any of the texts.
///
/// Fails if `second` does not line up with the output of `first`. Offsets in the error refer to
/// the intermediate text `b`.
pub fn compose(first: &EditScript, second: &EditScript) -> Result<EditScript, PatchError> {
    let mut a = Cursor::new(first.ops());
    let mut b = Cursor::new(second.ops());
    let mut builder = ScriptBuilder::default();
    let mut pos = 0;

    loop {
        let len = match (a.peek(), b.peek()) {
            (Some(Piece::Delete(text)), _) => {
                builder.delete(text);
                a.skip();
                continue;
            }
            (_, Some(Piece::Insert(text))) => {
                builder.insert(text);
                b.skip();
                continue;
            }
            (None, None) => break,
            (None, Some(_)) => return Err(PatchError::new(pos, PatchErrorKind::OutOfBounds)),
            (Some(_), None) => return Err(PatchError::new(pos, PatchErrorKind::TrailingInput)),
            (Some(Piece::Keep(n)), Some(Piece::Keep(m))) => {
                let len = n.min(m);
                builder.keep(len);
                len
            }
            (Some(Piece::Keep(n)), Some(Piece::Delete(deleted))) => {
                let len = n.min(deleted.len());
                builder.delete(prefix(deleted, len, pos)?);
                len
            }
            (Some(Piece::Insert(inserted)), Some(Piece::Keep(m))) => {
                let len = inserted.len().min(m);
                builder.insert(prefix(inserted, len, pos)?);
                len
            }
            (Some(Piece::Insert(inserted)), Some(Piece::Delete(deleted))) => {
                // text inserted by `first` and deleted again by `second` cancels out
                let len = inserted.len().min(deleted.len());
                if prefix(inserted, len, pos)? != prefix(deleted, len, pos)? {
                    return Err(PatchError::new(pos, PatchErrorKind::ContentMismatch));
                }
                len
            }
        };

        a.advance(len);
        b.advance(len);
        pos += len;
    }

    Ok(builder.finish())
}

fn prefix(text: &str, len: usize, pos: usize) -> Result<&str, PatchError> {
    text.get(..len).ok_or(PatchError::new(pos + len, PatchErrorKind::CharBoundary))
}

/// What is left of the op under a [`Cursor`].
enum Piece<'a> {
    Keep(usize),
    Delete(&'a str),
    Insert(&'a str),
}

/// Walks the ops of a script, allowing an op to be consumed in parts.
struct Cursor<'a> {
    ops: &'a [Op],
    idx: usize,
    /// Bytes of `ops[idx]` already consumed. Always on a char boundary.
    at: usize,
}

impl<'a> Cursor<'a> {
    fn new(ops: &'a [Op]) -> Self {
        Self { ops, idx: 0, at: 0 }
    }

    fn peek(&self) -> Option<Piece<'a>> {
        let piece = match self.ops.get(self.idx)? {
            Op::Keep(n) => Piece::Keep(n - self.at),
            Op::Delete(text) => Piece::Delete(&text[self.at..]),
            Op::Insert(text) => Piece::Insert(&text[self.at..]),
        };
        Some(piece)
    }

    fn advance(&mut self, len: usize) {
        self.at += len;
        if self.ops.get(self.idx).is_some_and(|op| self.at >= op.len()) {
            self.skip();
        }
    }

    fn skip(&mut self) {
        self.idx += 1;
        self.at = 0;
    }
}
