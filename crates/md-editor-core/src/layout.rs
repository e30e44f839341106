//! The render layer: one render block per logical line, each carrying the syntax formats that
//! the host paints for that line.
//!
//! Formats are pushed per block in a single call (see [`RenderLayer::set_block_formats`]), so a
//! host never observes half of a highlight pass.

use crate::format::{FormatRange, topmost_at};
use crate::line_index::LineIndex;

/// A per-line sink for syntax formats.
///
/// [`TextLayout`] is the in-crate implementation; hosts with their own text layout engine can
/// implement this trait directly.
pub trait RenderLayer {
    /// Number of render blocks (logical lines).
    fn block_count(&self) -> usize;

    /// Width of a block in chars, excluding the line terminator. Unknown blocks have width 0.
    fn block_width(&self, line: usize) -> usize;

    /// Replace the formats of a block.
    fn set_block_formats(&mut self, line: usize, formats: Vec<FormatRange>);

    /// Remove every format from a block.
    fn clear_block_formats(&mut self, line: usize);
}

/// Layout state of a single logical line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBlock {
    width: usize,
    formats: Vec<FormatRange>,
}

impl RenderBlock {
    /// Width in chars.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Committed formats, in paint order.
    pub fn formats(&self) -> &[FormatRange] {
        &self.formats
    }
}

/// The default [`RenderLayer`]: a vector of [`RenderBlock`]s kept in sync with a [`LineIndex`].
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    blocks: Vec<RenderBlock>,
}

impl TextLayout {
    /// Create a layout with no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout matching the lines of `index`.
    pub fn from_line_index(index: &LineIndex) -> Self {
        let mut layout = Self::new();
        layout.sync(index);
        layout
    }

    /// Resize the layout to the lines of `index` and refresh block widths.
    ///
    /// Blocks past the new line count are dropped together with their formats. Formats on the
    /// remaining blocks stay until the next highlight pass replaces them.
    pub fn sync(&mut self, index: &LineIndex) {
        let count = index.line_count();
        self.blocks.truncate(count);
        self.blocks.resize_with(count, RenderBlock::default);
        for (line, block) in self.blocks.iter_mut().enumerate() {
            block.width = index.line_len_chars(line);
        }
    }

    /// Block for `line`.
    pub fn block(&self, line: usize) -> Option<&RenderBlock> {
        self.blocks.get(line)
    }

    /// Committed formats of `line` (empty for unknown lines).
    pub fn formats(&self, line: usize) -> &[FormatRange] {
        self.blocks
            .get(line)
            .map(|b| b.formats.as_slice())
            .unwrap_or_default()
    }

    /// The format that paints `(line, column)`, i.e. the last committed range covering it.
    pub fn format_at(&self, line: usize, column: usize) -> Option<&FormatRange> {
        topmost_at(self.formats(line), column)
    }

    /// Returns `true` if no block carries any format.
    pub fn is_unformatted(&self) -> bool {
        self.blocks.iter().all(|b| b.formats.is_empty())
    }

    /// Total number of committed ranges over all blocks.
    pub fn range_count(&self) -> usize {
        self.blocks.iter().map(|b| b.formats.len()).sum()
    }
}

impl RenderLayer for TextLayout {
    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block_width(&self, line: usize) -> usize {
        self.blocks.get(line).map_or(0, |b| b.width)
    }

    fn set_block_formats(&mut self, line: usize, formats: Vec<FormatRange>) {
        if let Some(block) = self.blocks.get_mut(line) {
            block.formats = formats;
        }
    }

    fn clear_block_formats(&mut self, line: usize) {
        if let Some(block) = self.blocks.get_mut(line) {
            block.formats.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CharFormat, Color};

    #[test]
    fn test_sync_tracks_line_count_and_widths() {
        let mut layout = TextLayout::from_line_index(&LineIndex::from_text("ab\ncde\n"));
        assert_eq!(layout.block_count(), 3);
        assert_eq!(layout.block_width(1), 3);
        assert_eq!(layout.block_width(2), 0);
        assert_eq!(layout.block_width(9), 0);

        layout.set_block_formats(
            2,
            vec![FormatRange::new(2, 0, 1, CharFormat::background(Color::WHITE))],
        );
        layout.sync(&LineIndex::from_text("ab"));
        assert_eq!(layout.block_count(), 1);
        assert!(layout.is_unformatted());
    }

    #[test]
    fn test_unknown_blocks_are_ignored() {
        let mut layout = TextLayout::from_line_index(&LineIndex::from_text("x"));
        layout.set_block_formats(
            5,
            vec![FormatRange::new(5, 0, 1, CharFormat::background(Color::WHITE))],
        );
        layout.clear_block_formats(5);
        assert!(layout.is_unformatted());
        assert!(layout.formats(5).is_empty());
    }
}
