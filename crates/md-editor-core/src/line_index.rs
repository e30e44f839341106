//! Logical line index over the live text buffer.
//!
//! Backed by a [`Rope`], giving O(log N) line access and editing. All public coordinates are
//! **character** based (`line`, `column` in `char`s) except [`LineIndex::byte_to_position`],
//! which exists for parsers that report byte ranges.

use ropey::Rope;

/// Logical line index - the editor's text buffer.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

impl LineIndex {
    /// Create an empty buffer (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. An empty buffer and a buffer ending in a newline both count the trailing
    /// (empty) line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total byte count.
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Width of `line` in chars, excluding its line terminator. Out-of-range lines have width 0.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }

        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && is_line_break(slice.char(len - 1)) {
            let last = slice.char(len - 1);
            len -= 1;
            if last == '\n' && len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Text of `line` without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let width = self.line_len_chars(line);
        Some(self.rope.line(line).slice(..width).to_string())
    }

    /// Convert a character offset into `(line, column)`. Offsets past the end are clamped.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        (line, char_offset - self.rope.line_to_char(line))
    }

    /// Convert `(line, column)` into a character offset. Both coordinates are clamped.
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        self.rope.line_to_char(line) + column.min(self.line_len_chars(line))
    }

    /// Convert a byte offset into `(line, column)`.
    ///
    /// Offsets in the middle of a multi-byte character resolve to that character.
    pub fn byte_to_position(&self, byte_offset: usize) -> (usize, usize) {
        let byte_offset = byte_offset.min(self.rope.len_bytes());
        self.char_offset_to_position(self.rope.byte_to_char(byte_offset))
    }

    /// Insert `text` at a character offset (clamped).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Remove the half-open character range `start..end` (clamped).
    pub fn remove(&mut self, start: usize, end: usize) {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// The half-open character range `start..end` (clamped) as a `String`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// The whole buffer as a `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}
