//! Character-unit addressing over UTF-8 text
//!
//! Every position handed across module boundaries is a count of `char`s,
//! never a byte offset.

use std::str::Chars;

/// Extension trait for character-unit operations on string slices
pub trait CharwiseExt {
    /// Iterate over the character units of the text
    fn units(&self) -> Chars<'_>;

    /// Number of character units
    fn unit_len(&self) -> usize;

    /// Substring starting at unit `offset`, `len` units long.
    ///
    /// Both ends are clamped to the text.
    fn unit_substring(&self, offset: usize, len: usize) -> &str;

    /// Unit index of the first occurrence of `needle` at or after unit `offset`
    fn unit_find(&self, needle: &str, offset: usize) -> Option<usize>;
}

impl CharwiseExt for str {
    #[inline]
    fn units(&self) -> Chars<'_> {
        self.chars()
    }

    #[inline]
    fn unit_len(&self) -> usize {
        self.chars().count()
    }

    fn unit_substring(&self, offset: usize, len: usize) -> &str {
        let start = byte_offset(self, offset);
        let end = start + byte_offset(&self[start..], len);
        &self[start..end]
    }

    fn unit_find(&self, needle: &str, offset: usize) -> Option<usize> {
        let start = byte_offset(self, offset);
        let found = self[start..].find(needle)?;
        Some(offset + self[start..start + found].unit_len())
    }
}

/// Join character units back into a string
pub fn join_units<I>(units: I) -> String
where
    I: IntoIterator<Item = char>,
{
    units.into_iter().collect()
}

fn byte_offset(text: &str, units: usize) -> usize {
    text.char_indices()
        .nth(units)
        .map_or(text.len(), |(index, _)| index)
}
