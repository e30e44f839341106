//! Format accumulation for a single highlight pass.
//!
//! A pass is `clear` → any number of `set_format` → `commit`. Ranges are bucketed per line in
//! insertion order; later ranges paint over earlier ones on overlapping columns, so buckets are
//! never sorted or deduplicated.

use crate::format::{CharFormat, FormatRange, Span, topmost_at};
use crate::layout::RenderLayer;
use std::collections::BTreeMap;

/// Per-line buffer of [`FormatRange`]s, committed to a [`RenderLayer`] in one call per line.
#[derive(Debug, Clone, Default)]
pub struct FormatAccumulator {
    lines: BTreeMap<usize, Vec<FormatRange>>,
}

impl FormatAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every accumulated range and reset the formats of every tracked block in `layer`.
    pub fn clear<L: RenderLayer + ?Sized>(&mut self, layer: &mut L) {
        for &line in self.lines.keys() {
            layer.clear_block_formats(line);
        }
        self.lines.clear();
    }

    /// Append `format` for `span`, one range per covered line.
    ///
    /// `layer` supplies the line widths used for lines the span runs past the end of.
    pub fn set_format<L: RenderLayer + ?Sized>(&mut self, layer: &L, span: Span, format: &CharFormat) {
        for seg in span.segments(|line| layer.block_width(line)) {
            self.lines.entry(seg.line).or_default().push(FormatRange::new(
                seg.line,
                seg.start,
                seg.length,
                format.clone(),
            ));
        }
    }

    /// Push every line's bucket to `layer`.
    pub fn commit<L: RenderLayer + ?Sized>(&self, layer: &mut L) {
        for (&line, ranges) in &self.lines {
            layer.set_block_formats(line, ranges.clone());
        }
    }

    /// Accumulated ranges of `line`, in insertion order.
    pub fn ranges(&self, line: usize) -> &[FormatRange] {
        self.lines
            .get(&line)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The range that wins on `(line, column)`.
    pub fn format_at(&self, line: usize, column: usize) -> Option<&FormatRange> {
        topmost_at(self.ranges(line), column)
    }

    /// Lines that currently hold at least one range.
    pub fn tracked_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.keys().copied()
    }

    /// Total number of accumulated ranges.
    pub fn len(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is accumulated.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Color, FontSpec};
    use crate::layout::TextLayout;
    use crate::line_index::LineIndex;
    use std::collections::BTreeMap;

    /// A layer that records how often each block is written.
    #[derive(Default)]
    struct RecordingLayer {
        widths: Vec<usize>,
        set_calls: BTreeMap<usize, usize>,
        cleared: Vec<usize>,
    }

    impl RenderLayer for RecordingLayer {
        fn block_count(&self) -> usize {
            self.widths.len()
        }

        fn block_width(&self, line: usize) -> usize {
            self.widths.get(line).copied().unwrap_or(0)
        }

        fn set_block_formats(&mut self, line: usize, _formats: Vec<FormatRange>) {
            *self.set_calls.entry(line).or_default() += 1;
        }

        fn clear_block_formats(&mut self, line: usize) {
            self.cleared.push(line);
        }
    }

    fn fmt(color: Color) -> CharFormat {
        CharFormat::text(color, FontSpec::default())
    }

    #[test]
    fn test_one_range_per_covered_line() {
        let layout = TextLayout::from_line_index(&LineIndex::from_text("abcdef\nxy\nlast line"));
        let mut acc = FormatAccumulator::new();

        let span = Span::new(0, 2, 2, 3);
        acc.set_format(&layout, span, &fmt(Color::BLUE));

        assert_eq!(acc.len(), span.line_count());
        assert_eq!((acc.ranges(0)[0].start, acc.ranges(0)[0].length), (2, 4));
        assert_eq!((acc.ranges(1)[0].start, acc.ranges(1)[0].length), (0, 2));
        assert_eq!((acc.ranges(2)[0].start, acc.ranges(2)[0].length), (0, 4));
    }

    #[test]
    fn test_commit_writes_each_line_once() {
        let mut layer = RecordingLayer {
            widths: vec![10, 10, 10],
            ..RecordingLayer::default()
        };
        let mut acc = FormatAccumulator::new();

        acc.set_format(&layer, Span::new(0, 0, 0, 3), &fmt(Color::BLUE));
        acc.set_format(&layer, Span::new(0, 5, 1, 2), &fmt(Color::GREEN));
        acc.set_format(&layer, Span::new(1, 4, 1, 6), &fmt(Color::BLACK));
        acc.commit(&mut layer);

        assert_eq!(layer.set_calls.get(&0), Some(&1));
        assert_eq!(layer.set_calls.get(&1), Some(&1));
        assert_eq!(layer.set_calls.get(&2), None);
    }

    #[test]
    fn test_later_ranges_win_on_overlap() {
        let layout = TextLayout::from_line_index(&LineIndex::from_text("- item text"));
        let mut acc = FormatAccumulator::new();

        acc.set_format(&layout, Span::new(0, 0, 0, 10), &fmt(Color::GREEN));
        acc.set_format(&layout, Span::new(0, 2, 0, 5), &fmt(Color::BLUE));

        let fg = |col| acc.format_at(0, col).and_then(|r| r.format.foreground);
        assert_eq!(fg(0), Some(Color::GREEN));
        assert_eq!(fg(3), Some(Color::BLUE));
        assert_eq!(fg(8), Some(Color::GREEN));
    }

    #[test]
    fn test_clear_resets_tracked_blocks() {
        let mut layout = TextLayout::from_line_index(&LineIndex::from_text("one\ntwo"));
        let mut acc = FormatAccumulator::new();

        acc.set_format(&layout, Span::new(0, 0, 1, 2), &fmt(Color::BLUE));
        acc.commit(&mut layout);
        assert_eq!(layout.range_count(), 2);

        acc.clear(&mut layout);
        assert!(acc.is_empty());
        assert!(layout.is_unformatted());
        assert!(acc.ranges(0).is_empty());
    }
}
