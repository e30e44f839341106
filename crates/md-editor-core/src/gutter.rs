//! Line-number gutter and view geometry.
//!
//! Pixel values are logical (device-independent) pixels. The gutter only depends on the line
//! count and the font metrics; it never influences the highlighting pipeline.

use crate::format::FontSpec;

/// Minimum number of digits reserved in the line-number gutter.
pub const MIN_GUTTER_DIGITS: usize = 2;

/// Horizontal padding added to the gutter, in pixels.
pub const GUTTER_PADDING: f32 = 3.0;

/// Glyph metrics of the editor font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Advance of a digit (`'9'`), in pixels. The editor font is expected to be monospace.
    pub char_width: f32,
    /// Line height, in pixels.
    pub line_height: f32,
}

impl FontMetrics {
    /// Create metrics from measured values.
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    /// Rough monospace metrics derived from the point size (96 DPI).
    ///
    /// Hosts that can measure glyphs should call [`crate::Editor::set_font_metrics`] instead.
    pub fn approximate(font: &FontSpec) -> Self {
        let px = font.point_size.max(1.0) * 96.0 / 72.0;
        Self {
            char_width: (px * 0.6).ceil(),
            line_height: (px * 1.2).ceil(),
        }
    }
}

/// Number of decimal digits needed to print `line_count`, at least [`MIN_GUTTER_DIGITS`].
pub fn gutter_digits(line_count: usize) -> usize {
    let mut digits = 1;
    let mut max = line_count.max(1);
    while max >= 10 {
        max /= 10;
        digits += 1;
    }
    digits.max(MIN_GUTTER_DIGITS)
}

/// Width of the line-number gutter in pixels.
pub fn line_number_area_width(line_count: usize, metrics: &FontMetrics) -> f32 {
    GUTTER_PADDING + metrics.char_width * gutter_digits(line_count) as f32
}

/// Translate a vertical pixel position (relative to the top of the viewport) into a line index.
///
/// Returns `None` above the viewport or below the last line.
pub fn line_at(
    y: f32,
    first_visible_line: usize,
    line_count: usize,
    metrics: &FontMetrics,
) -> Option<usize> {
    if y < 0.0 || !y.is_finite() || metrics.line_height <= 0.0 {
        return None;
    }

    let offset = (y / metrics.line_height).floor() as usize;
    let line = first_visible_line.checked_add(offset)?;
    (line < line_count).then_some(line)
}

/// Rendering-adjacent configuration derived from the two view toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Left viewport margin reserved for the gutter (0 when line numbers are hidden).
    pub left_margin: f32,
    /// Distance between tab stops in pixels.
    pub tab_stop_distance: f32,
    /// Paint markers for tabs and spaces.
    pub show_tabs_and_spaces: bool,
    /// Paint markers for line and paragraph separators.
    pub show_line_separators: bool,
}
