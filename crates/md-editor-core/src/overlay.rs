//! Overlay layers composed with syntax formats at paint time.
//!
//! Overlays own their ranges independently of the render layer: recomputing one never touches
//! the syntax formats or the other overlay.

use crate::error::SearchError;
use crate::format::{CharFormat, Color, FormatRange, Span};
use crate::line_index::LineIndex;
use crate::search::LiteralQuery;
use std::collections::BTreeMap;

/// The full-width band that marks the line holding the cursor.
#[derive(Debug, Clone)]
pub struct CurrentLineBand {
    color: Color,
    range: Option<FormatRange>,
}

impl CurrentLineBand {
    /// Create a band painted with `color`. Nothing is highlighted until [`Self::update`].
    pub fn new(color: Color) -> Self {
        Self { color, range: None }
    }

    /// Move the band to `line`.
    pub fn update(&mut self, line: usize, width: usize) {
        tracing::trace!(line, "current line band moved");
        self.range = Some(FormatRange::new(
            line,
            0,
            width,
            CharFormat::background(self.color).with_full_width(),
        ));
    }

    /// Change the band color, keeping its position.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        if let Some(range) = &mut self.range {
            range.format.background = Some(color);
        }
    }

    /// The band range, if it is on `line`.
    pub fn range_for(&self, line: usize) -> Option<&FormatRange> {
        self.range.as_ref().filter(|r| r.line == line)
    }

    /// The line currently marked.
    pub fn line(&self) -> Option<usize> {
        self.range.as_ref().map(|r| r.line)
    }
}

/// Background ranges for every occurrence of a literal needle.
#[derive(Debug, Clone)]
pub struct SearchOverlay {
    color: Color,
    query: Option<LiteralQuery>,
    lines: BTreeMap<usize, Vec<FormatRange>>,
    match_count: usize,
}

impl SearchOverlay {
    /// Create an inactive overlay painted with `color`.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            query: None,
            lines: BTreeMap::new(),
            match_count: 0,
        }
    }

    /// Activate the overlay for `needle` and compute its ranges over `index`.
    ///
    /// An empty needle is the same as [`Self::clear`].
    pub fn set_needle(&mut self, needle: &str, index: &LineIndex) -> Result<(), SearchError> {
        if needle.is_empty() {
            self.clear();
            return Ok(());
        }

        self.query = Some(LiteralQuery::new(needle)?);
        self.recompute(index);
        Ok(())
    }

    /// Deactivate the overlay.
    pub fn clear(&mut self) {
        self.query = None;
        self.lines.clear();
        self.match_count = 0;
    }

    /// The active needle.
    pub fn needle(&self) -> Option<&str> {
        self.query.as_ref().map(LiteralQuery::needle)
    }

    /// Recompute ranges for the active needle (no-op when inactive).
    pub fn recompute(&mut self, index: &LineIndex) {
        self.lines.clear();
        self.match_count = 0;

        let Some(query) = &self.query else {
            return;
        };

        let format = CharFormat::background(self.color);
        let matches = query.find_all(&index.text());
        for m in &matches {
            let (start_line, start_column) = index.char_offset_to_position(m.start);
            let (end_line, end_column) = index.char_offset_to_position(m.end - 1);
            let span = Span::new(start_line, start_column, end_line, end_column);

            for seg in span.segments(|line| index.line_len_chars(line)) {
                self.lines.entry(seg.line).or_default().push(FormatRange::new(
                    seg.line,
                    seg.start,
                    seg.length,
                    format.clone(),
                ));
            }
        }

        self.match_count = matches.len();
        tracing::trace!(matches = self.match_count, "search overlay recomputed");
    }

    /// Search ranges on `line`.
    pub fn ranges(&self, line: usize) -> &[FormatRange] {
        self.lines
            .get(&line)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of matches found by the last recomputation.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Change the highlight color of subsequent recomputations and of the current ranges.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        for range in self.lines.values_mut().flatten() {
            range.format.background = Some(color);
        }
    }
}

/// Merge the layers of one line in paint order: current-line band, syntax, search.
pub fn compose(
    band: Option<&FormatRange>,
    syntax: &[FormatRange],
    search: &[FormatRange],
) -> Vec<FormatRange> {
    let mut out = Vec::with_capacity(usize::from(band.is_some()) + syntax.len() + search.len());
    out.extend(band.cloned());
    out.extend_from_slice(syntax);
    out.extend_from_slice(search);
    out
}
