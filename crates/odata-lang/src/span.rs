//! Byte ranges into a raw option or path string, for error reporting.

/// A span representing a range in the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering the whole of `input`.
    pub fn full(input: &str) -> Self {
        Self::new(0, input.len())
    }

    /// Create a span covering two spans.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift the span right by `offset` bytes.
    pub fn offset(self, offset: usize) -> Span {
        Span::new(self.start + offset, self.end + offset)
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text the span covers, if it lies on char boundaries of `input`.
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start..self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

/// Convert a byte offset to a 1-based character column.
///
/// Option strings are single-line, so the column is all a diagnostic needs.
pub fn offset_to_column(input: &str, offset: usize) -> usize {
    input
        .char_indices()
        .take_while(|(i, _)| *i < offset)
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(0, 2);
        let b = Span::new(3, 5);
        assert_eq!(a.merge(b), Span::new(0, 5));
        assert_eq!(Span::new(1, 2).offset(4), Span::new(5, 6));
    }

    #[test]
    fn test_span_slice() {
        let input = "id ge -14";
        assert_eq!(Span::new(6, 9).slice(input), Some("-14"));
        assert_eq!(Span::full(input).len(), input.len());
        assert!(Span::new(20, 30).slice(input).is_none());
    }

    #[test]
    fn test_offset_to_column() {
        assert_eq!(offset_to_column("id ge 2", 0), 1);
        assert_eq!(offset_to_column("id ge 2", 3), 4);
        // multi-byte characters count once
        assert_eq!(offset_to_column("né eq 2", 4), 4);
    }
}
