//! Source location tracking
//!
//! Offsets are Unicode scalar value indices into the input text, not byte
//! offsets. A workout such as `"6mn06\""` therefore reports the same offsets
//! whether or not the surrounding text contains multi-byte characters.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of character offsets `[start, end)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Zero-width span, used for the end-of-input marker
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_covers_both() {
        let merged = Span::new(4, 6).merge(Span::new(1, 3));
        assert_eq!(merged, Span::new(1, 6));
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn test_empty_span_display() {
        let eof = Span::empty(12);
        assert!(eof.is_empty());
        assert!(!eof.contains(12));
        assert_eq!(eof.to_string(), "12");
        assert_eq!(Span::new(2, 5).to_string(), "2..5");
    }
}
