use similar::{Algorithm, ChangeTag, DiffTag, TextDiff};

use crate::script::{EditScript, ScriptBuilder};

/// Changed hunks larger than this (old and new bytes together) are not refined by character and
/// are recorded as a whole delete followed by a whole insert.
const CHAR_DIFF_LIMIT: usize = 2048;

/// Compute a script that transforms `old` into `new`.
///
/// Texts are diffed by line first, then each changed hunk is refined by character after trimming
/// its common prefix and suffix. Myers is run with no deadline, so the result depends only on the
/// inputs. It is not guaranteed to be minimal.
pub fn diff(old: &str, new: &str) -> EditScript {
    if old == new {
        return EditScript::identity(old.len());
    }

    let lines = TextDiff::configure().algorithm(Algorithm::Myers).diff_lines(old, new);
    let old_offsets = line_offsets(lines.old_slices());
    let new_offsets = line_offsets(lines.new_slices());

    let mut builder = ScriptBuilder::default();
    for op in lines.ops() {
        let (tag, old_lines, new_lines) = op.as_tag_tuple();
        let old_hunk = &old[old_offsets[old_lines.start]..old_offsets[old_lines.end]];
        let new_hunk = &new[new_offsets[new_lines.start]..new_offsets[new_lines.end]];
        match tag {
            DiffTag::Equal => builder.keep(old_hunk.len()),
            DiffTag::Delete => builder.delete(old_hunk),
            DiffTag::Insert => builder.insert(new_hunk),
            DiffTag::Replace => refine(&mut builder, old_hunk, new_hunk),
        }
    }

    builder.finish()
}

/// Byte offset of the start of each line, plus the end of the text.
fn line_offsets(lines: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len() + 1);
    offsets.push(0);
    offsets.extend(lines.iter().scan(0, |end, line| {
        *end += line.len();
        Some(*end)
    }));
    offsets
}

fn refine(builder: &mut ScriptBuilder, old: &str, new: &str) {
    let prefix = common_len(old.chars(), new.chars());
    let (old_rest, new_rest) = (&old[prefix..], &new[prefix..]);
    let suffix = common_len(old_rest.chars().rev(), new_rest.chars().rev());
    let old_mid = &old_rest[..old_rest.len() - suffix];
    let new_mid = &new_rest[..new_rest.len() - suffix];

    builder.keep(prefix);
    if old_mid.len() + new_mid.len() > CHAR_DIFF_LIMIT {
        builder.delete(old_mid);
        builder.insert(new_mid);
    } else {
        let chars = TextDiff::configure().algorithm(Algorithm::Myers).diff_chars(old_mid, new_mid);
        for change in chars.iter_all_changes() {
            let value = change.value();
            match change.tag() {
                ChangeTag::Equal => builder.keep(value.len()),
                ChangeTag::Delete => builder.delete(value),
                ChangeTag::Insert => builder.insert(value),
            }
        }
    }
    builder.keep(suffix);
}

/// Byte length of the longest run of equal chars at the front of both iterators.
fn common_len(a: impl Iterator<Item = char>, b: impl Iterator<Item = char>) -> usize {
    a.zip(b).take_while(|(a, b)| a == b).map(|(c, _)| c.len_utf8()).sum()
}
