//! Formatting primitives shared by the highlighter and the render layer.
//!
//! Everything here is expressed in **logical line / character column** coordinates:
//! columns count Unicode scalar values (`char`) from the start of a line.

use crate::error::ColorParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// An RGBA color.
///
/// Serialized as a `#rrggbb` (or `#rrggbbaa` when not fully opaque) string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque pure blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque pure green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque dark blue.
    pub const DARK_BLUE: Self = Self::rgb(0, 0, 128);
    /// Opaque dark green.
    pub const DARK_GREEN: Self = Self::rgb(0, 128, 0);
    /// Opaque dark red.
    pub const DARK_RED: Self = Self::rgb(128, 0, 0);
    /// Opaque dark magenta.
    pub const DARK_MAGENTA: Self = Self::rgb(128, 0, 128);
    /// Opaque gray.
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns a lighter variant of this color.
    ///
    /// `factor` is a percentage; `160` makes the color 60% brighter. Channels saturate at 255.
    pub fn lighter(self, factor: u16) -> Self {
        let scale = |c: u8| -> u8 {
            let scaled = u32::from(c) * u32::from(factor) / 100;
            u8::try_from(scaled).unwrap_or(u8::MAX)
        };

        Self::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(ColorParseError::InvalidLength(s.to_string()));
        }

        let channel = |idx: usize| -> Result<u8, ColorParseError> {
            u8::from_str_radix(&hex[idx..idx + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Style option bits carried by text-like nodes (emphasis, strong emphasis, strikethrough).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextStyle(pub u8);

impl TextStyle {
    /// No style options.
    pub const NONE: Self = Self(0);
    /// Emphasis.
    pub const ITALIC: Self = Self(1);
    /// Strong emphasis.
    pub const BOLD: Self = Self(2);
    /// Strikethrough.
    pub const STRIKETHROUGH: Self = Self(4);

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set or unset the bits of `other`.
    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

impl BitOr for TextStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TextStyle {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A font description handed in by the host (family, size and variations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// Font family name.
    pub family: String,
    /// Point size.
    pub point_size: f32,
    /// Bold variation.
    pub bold: bool,
    /// Italic variation.
    pub italic: bool,
    /// Strikethrough decoration.
    pub strikethrough: bool,
}

impl FontSpec {
    /// Create a regular (non-bold, non-italic) font.
    pub fn new(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: family.into(),
            point_size,
            bold: false,
            italic: false,
            strikethrough: false,
        }
    }

    /// Returns a copy with the variations from `style` switched on.
    ///
    /// Bits that are not set in `style` keep the value of `self`.
    pub fn with_style(&self, style: TextStyle) -> Self {
        let mut font = self.clone();
        font.bold |= style.contains(TextStyle::BOLD);
        font.italic |= style.contains(TextStyle::ITALIC);
        font.strikethrough |= style.contains(TextStyle::STRIKETHROUGH);
        font
    }

    /// Returns a bold copy of this font.
    pub fn to_bold(&self) -> Self {
        self.with_style(TextStyle::BOLD)
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("monospace", 10.0)
    }
}

/// The visual attributes of a [`FormatRange`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharFormat {
    /// Text color, if overridden.
    pub foreground: Option<Color>,
    /// Background color, if overridden.
    pub background: Option<Color>,
    /// Font, if overridden.
    pub font: Option<FontSpec>,
    /// Paint the background up to the right edge of the viewport, not only under the text.
    pub full_width: bool,
}

impl CharFormat {
    /// A syntax format: foreground color plus font.
    pub fn text(foreground: Color, font: FontSpec) -> Self {
        Self {
            foreground: Some(foreground),
            font: Some(font),
            ..Self::default()
        }
    }

    /// An overlay format that only paints a background.
    pub fn background(color: Color) -> Self {
        Self {
            background: Some(color),
            ..Self::default()
        }
    }

    /// Mark the format as a full-width band.
    pub fn with_full_width(mut self) -> Self {
        self.full_width = true;
        self
    }

    /// Shortcut for `font.italic`.
    pub fn is_italic(&self) -> bool {
        self.font.as_ref().is_some_and(|f| f.italic)
    }

    /// Shortcut for `font.bold`.
    pub fn is_bold(&self) -> bool {
        self.font.as_ref().is_some_and(|f| f.bold)
    }

    /// Shortcut for `font.strikethrough`.
    pub fn is_strikethrough(&self) -> bool {
        self.font.as_ref().is_some_and(|f| f.strikethrough)
    }
}

/// An inclusive `(start_line, start_column)`..=`(end_line, end_column)` region of source text.
///
/// A zero-width marker has `start == end` and still covers a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First line (0-based).
    pub start_line: usize,
    /// First column on `start_line` (0-based).
    pub start_column: usize,
    /// Last line (0-based, inclusive).
    pub end_line: usize,
    /// Last column on `end_line` (0-based, inclusive).
    pub end_column: usize,
}

impl Span {
    /// Create a span from inclusive coordinates.
    pub const fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// A zero-width marker at `(line, column)`.
    pub const fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }

    /// Number of lines touched by the span.
    pub fn line_count(&self) -> usize {
        (self.end_line + 1).saturating_sub(self.start_line)
    }

    /// Returns `true` if `start == end`.
    pub fn is_zero_width(&self) -> bool {
        self.start_line == self.end_line && self.start_column == self.end_column
    }

    /// Split the span into one [`LineSegment`] per covered line.
    ///
    /// `line_width` returns the width (in chars) of a line; it is consulted for the lines where
    /// the span runs to the end of the line (every line except the last one).
    pub fn segments(&self, line_width: impl Fn(usize) -> usize) -> Vec<LineSegment> {
        let mut out = Vec::with_capacity(self.line_count());

        for line in self.start_line..=self.end_line {
            let first = line == self.start_line;
            let last = line == self.end_line;

            let start = if first { self.start_column } else { 0 };
            let length = match (first, last) {
                (true, true) => (self.end_column + 1).saturating_sub(self.start_column),
                (true, false) => line_width(line).saturating_sub(self.start_column),
                (false, true) => self.end_column + 1,
                (false, false) => line_width(line),
            };

            out.push(LineSegment {
                line,
                start,
                length,
            });
        }

        out
    }
}

/// The part of a [`Span`] that falls on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    /// Line index.
    pub line: usize,
    /// Start column.
    pub start: usize,
    /// Length in chars.
    pub length: usize,
}

/// A single-line styled sub-span: `(line, start, length, format)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRange {
    /// Line index.
    pub line: usize,
    /// Start column.
    pub start: usize,
    /// Length in chars.
    pub length: usize,
    /// Visual attributes.
    pub format: CharFormat,
}

impl FormatRange {
    /// Create a format range.
    pub fn new(line: usize, start: usize, length: usize, format: CharFormat) -> Self {
        Self {
            line,
            start,
            length,
            format,
        }
    }

    /// Exclusive end column.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Returns `true` if the range paints `column`.
    ///
    /// Full-width ranges paint every column of their line.
    pub fn contains(&self, column: usize) -> bool {
        self.format.full_width || (self.start <= column && column < self.end())
    }
}

/// Returns the last range in `ranges` that paints `column`.
///
/// Ranges are painted in order, so for overlapping columns the last one wins.
pub fn topmost_at(ranges: &[FormatRange], column: usize) -> Option<&FormatRange> {
    ranges.iter().rev().find(|r| r.contains(column))
}
