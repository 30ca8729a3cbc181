use std::borrow::Cow;
use std::{fmt, ops};

// A set of replacements against a single text, the same shape as the lsp `TextEdit[]`.
// Useful for a host that wants to patch its own rope in place rather than swap out the whole buffer.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Deltas<'a> {
    /// The deltas ordered by their start offset ascending.
    deltas: Box<[Delta<'a>]>,
}

impl<'a> Deltas<'a> {
    /// Sorts the deltas by their start offset.
    ///
    /// Panics if any two deltas overlap or touch.
    #[must_use]
    pub fn new(deltas: impl IntoIterator<Item = Delta<'a>>) -> Self {
        let mut deltas = deltas.into_iter().collect::<Box<_>>();
        deltas.sort_by_key(|delta| delta.range.start);

        for pair in deltas.windows(2) {
            let [a, b] = pair else { unreachable!() };
            assert!(a.range.end < b.range.start, "deltas must not overlap: {a:?} and {b:?}");
        }

        Self { deltas }
    }

    /// Returns an iterator over the deltas ordered by their start offset descending.
    /// Applying them in this order keeps the offsets of the remaining deltas valid.
    pub fn iter(&self) -> impl Iterator<Item = &Delta<'a>> {
        self.deltas.iter().rev()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Apply every delta to `text` and return the deltas that undo them.
    pub fn apply(&self, text: &mut impl TextReplace) -> Deltas<'static> {
        let mut inverse_deltas = Vec::<Delta<'_>>::with_capacity(self.deltas.len());

        for delta in self.iter() {
            let shift = delta.text.len() as isize - delta.range.len() as isize;
            inverse_deltas.iter_mut().for_each(|d| d.shift(shift));

            let inverse = delta.apply(text);
            inverse_deltas.push(inverse);
        }

        Deltas::new(inverse_deltas)
    }

    pub fn to_owned(&self) -> Deltas<'static> {
        Deltas::new(self.deltas.iter().map(|d| d.to_owned()))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Delta<'a> {
    /// The byte range to replace
    range: DeltaRange,
    /// The text to replace the range with
    text: Cow<'a, str>,
}

impl fmt::Debug for Delta<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} => {:?}", self.range, self.text)
    }
}

pub type DeltaRange = ops::Range<usize>;

impl<'a> Delta<'a> {
    pub fn new(range: impl Into<DeltaRange>, text: impl Into<Cow<'a, str>>) -> Self {
        Self { range: range.into(), text: text.into() }
    }

    #[inline]
    pub fn range(&self) -> DeltaRange {
        self.range.clone()
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn to_owned(&self) -> Delta<'static> {
        Delta::new(self.range.clone(), self.text.to_string())
    }

    /// Apply the delta to the text and return the inverse delta
    fn apply(&self, text: &mut impl TextReplace) -> Delta<'static> {
        let start = self.range.start;
        let deleted_text = text.slice(self.range()).into_owned();
        text.replace(self.range(), &self.text);
        Delta::new(start..start + self.text.len(), deleted_text)
    }

    fn shift(&mut self, shift: isize) {
        debug_assert!(self.range.start as isize + shift >= 0, "shifted delta out of the text");
        self.range =
            self.range.start.saturating_add_signed(shift)..self.range.end.saturating_add_signed(shift);
    }
}

/// A text buffer that can have byte ranges replaced in place.
pub trait TextReplace {
    fn slice(&self, byte_range: DeltaRange) -> Cow<'_, str>;

    fn replace(&mut self, byte_range: DeltaRange, text: &str);
}

impl TextReplace for String {
    #[inline]
    fn slice(&self, byte_range: DeltaRange) -> Cow<'_, str> {
        Cow::Borrowed(&self[byte_range])
    }

    #[inline]
    fn replace(&mut self, byte_range: DeltaRange, text: &str) {
        self.replace_range(byte_range, text);
    }
}

impl TextReplace for crop::Rope {
    #[inline]
    fn slice(&self, byte_range: DeltaRange) -> Cow<'_, str> {
        Cow::Owned(self.byte_slice(byte_range).to_string())
    }

    #[inline]
    fn replace(&mut self, byte_range: DeltaRange, text: &str) {
        crop::Rope::replace(self, byte_range, text);
    }
}
