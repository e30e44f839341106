//! Literal text search.
//!
//! The needle is matched literally (it is escaped before being compiled into a regex). All
//! match ranges are **character offsets**, half-open (`[start, end)`).

use crate::error::SearchError;
use regex::{Regex, RegexBuilder};

/// A match expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Maps between char offsets and byte offsets of one string.
#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.char_to_byte[char_offset.min(self.char_count())]
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_offset) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

/// A compiled literal needle.
#[derive(Debug, Clone)]
pub struct LiteralQuery {
    needle: String,
    re: Regex,
}

impl LiteralQuery {
    /// Compile a case-sensitive query.
    pub fn new(needle: &str) -> Result<Self, SearchError> {
        Self::with_case(needle, true)
    }

    /// Compile a query, optionally ignoring case.
    pub fn with_case(needle: &str, case_sensitive: bool) -> Result<Self, SearchError> {
        let re = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self {
            needle: needle.to_string(),
            re,
        })
    }

    /// The needle as given.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Every non-overlapping occurrence in `text`. An empty needle matches nothing.
    pub fn find_all(&self, text: &str) -> Vec<SearchMatch> {
        if self.needle.is_empty() {
            return Vec::new();
        }

        let index = CharIndex::new(text);
        self.re
            .find_iter(text)
            .map(|m| SearchMatch {
                start: index.byte_to_char(m.start()),
                end: index.byte_to_char(m.end()),
            })
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// The first occurrence starting at or after `from_char`.
    pub fn find_next(&self, text: &str, from_char: usize) -> Option<SearchMatch> {
        if self.needle.is_empty() {
            return None;
        }

        let index = CharIndex::new(text);
        let m = self.re.find_at(text, index.char_to_byte(from_char))?;
        Some(SearchMatch {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        })
    }

    /// The last occurrence that ends at or before `before_char`.
    pub fn find_prev(&self, text: &str, before_char: usize) -> Option<SearchMatch> {
        if self.needle.is_empty() {
            return None;
        }

        let index = CharIndex::new(text);
        let limit = index.char_to_byte(before_char);
        self.re.find_iter(&text[..limit]).last().map(|m| SearchMatch {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        })
    }
}
