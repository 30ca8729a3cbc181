use crate::error::{PatchError, PatchErrorKind};
use crate::script::{EditScript, Op};

/// Apply `script` to `text`, producing the text the script was diffed against.
///
/// Fails if the script was not computed from `text`: every keep and delete must land inside the
/// text on char boundaries, every delete must match the text it removes, and the script must
/// account for every byte of the input.
pub fn apply(text: &str, script: &EditScript) -> Result<String, PatchError> {
    let mut out = String::with_capacity(script.new_len());
    let mut pos = 0;

    for op in script.ops() {
        match op {
            Op::Keep(n) => {
                let end = advance(text, pos, *n)?;
                out.push_str(&text[pos..end]);
                pos = end;
            }
            Op::Delete(deleted) => {
                let end = advance(text, pos, deleted.len())?;
                if text[pos..end] != **deleted {
                    return Err(PatchError::new(pos, PatchErrorKind::ContentMismatch));
                }
                pos = end;
            }
            Op::Insert(inserted) => out.push_str(inserted),
        }
    }

    if pos != text.len() {
        return Err(PatchError::new(pos, PatchErrorKind::TrailingInput));
    }

    Ok(out)
}

/// Returns the offset `n` bytes after `pos`, checking it is a valid place to stop.
fn advance(text: &str, pos: usize, n: usize) -> Result<usize, PatchError> {
    let end = pos
        .checked_add(n)
        .filter(|&end| end <= text.len())
        .ok_or(PatchError::new(pos, PatchErrorKind::OutOfBounds))?;

    if !text.is_char_boundary(end) {
        return Err(PatchError::new(end, PatchErrorKind::CharBoundary));
    }

    Ok(end)
}
