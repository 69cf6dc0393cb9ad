//! Source spans.

/// A region of source text.
///
/// `end` is inclusive: for a balanced region it is the offset of the closing
/// delimiter, so `text.len() == end - start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> Span<'a> {
    /// Span covering `source[start..=end]`.
    #[inline]
    pub fn new(source: &'a str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: &source[start..=end],
        }
    }

    /// Offset one past the end of the span.
    #[inline]
    pub fn end_exclusive(&self) -> usize {
        self.end + 1
    }

    /// The text between the opening and closing delimiters.
    #[inline]
    pub fn inner(&self) -> &'a str {
        if self.text.len() < 2 {
            return "";
        }
        &self.text[1..self.text.len() - 1]
    }
}
