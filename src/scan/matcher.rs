//! Literal delimiter search.

use std::ops::Range;

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// No prefix of the delimiter ends the haystack.
    NoMatch,
    /// The haystack ends with these bytes, which start the delimiter
    /// but do not complete it.
    Partial(Range<usize>),
    /// The delimiter occupies this range.
    Complete(Range<usize>),
}

/// Searches for a non-empty literal delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteMatcher {
    delimiter: Vec<u8>,
}

impl ByteMatcher {
    /// Constructor.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    #[inline]
    pub fn new(delimiter: impl Into<Vec<u8>>) -> Self {
        let delimiter = delimiter.into();
        assert!(!delimiter.is_empty(), "delimiter must not be empty");
        Self { delimiter }
    }

    #[inline]
    pub fn delimiter(&self) -> &[u8] { &self.delimiter }

    /// Find the leftmost full or trailing partial occurrence in
    /// `haystack[from..]`.
    ///
    /// Ranges are relative to `haystack`. A partial match is only reported
    /// once no complete match starts before it, so the first hit wins.
    pub fn find(&self, haystack: &[u8], from: usize) -> MatchResult {
        let dlen = self.delimiter.len();

        for i in from..haystack.len() {
            let len = std::cmp::min(dlen, haystack.len() - i);
            if haystack[i..i + len] != self.delimiter[..len] {
                continue;
            }
            return if len == dlen {
                MatchResult::Complete(i..i + dlen)
            } else {
                MatchResult::Partial(i..haystack.len())
            };
        }

        MatchResult::NoMatch
    }
}
