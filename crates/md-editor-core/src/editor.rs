//! The editing surface.
//!
//! [`Editor`] owns the live text buffer and the render layer. Every mutation runs the attached
//! [`SyntaxProcessor`] synchronously over the full text, then recomputes the overlays. Overlays
//! (current-line band, search matches) and syntax formats are stored separately and only merged
//! by [`Editor::line_formats`].

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::format::{FontSpec, FormatRange, topmost_at};
use crate::gutter::{self, FontMetrics, RenderOptions};
use crate::layout::TextLayout;
use crate::line_index::LineIndex;
use crate::overlay::{self, CurrentLineBand, SearchOverlay};
use crate::processing::SyntaxProcessor;
use crate::search::{LiteralQuery, SearchMatch};
use std::cmp::Ordering;
use tracing::debug;

/// A logical cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A processor that never formats anything (plain text mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl SyntaxProcessor for PlainText {
    fn process(&mut self, _text: &str, _doc_name: &str, _layout: &mut TextLayout) {}

    fn clear(&mut self, _layout: &mut TextLayout) {}

    fn set_font(&mut self, _font: &FontSpec) {}
}

/// One reversible buffer change: `removed` was replaced by `inserted` at char offset `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditRecord {
    start: usize,
    removed: String,
    inserted: String,
}

impl EditRecord {
    fn inverted(&self) -> Self {
        Self {
            start: self.start,
            removed: self.inserted.clone(),
            inserted: self.removed.clone(),
        }
    }
}

/// The markdown editing surface.
#[derive(Debug)]
pub struct Editor<P: SyntaxProcessor = PlainText> {
    buffer: LineIndex,
    layout: TextLayout,
    doc_name: String,
    cursor: Position,
    selection: Option<SearchMatch>,
    config: EditorConfig,
    metrics: FontMetrics,
    first_visible_line: usize,
    viewport_height: f32,
    band: CurrentLineBand,
    search: SearchOverlay,
    processor: P,
    undo_stack: Vec<EditRecord>,
    redo_stack: Vec<EditRecord>,
}

impl Editor<PlainText> {
    /// Create a plain-text editor (no syntax highlighting).
    pub fn plain(text: &str, config: EditorConfig) -> Self {
        Self::new(text, config, PlainText)
    }
}

impl<P: SyntaxProcessor> Editor<P> {
    /// Create an editor over `text`, highlighted by `processor`.
    pub fn new(text: &str, config: EditorConfig, mut processor: P) -> Self {
        processor.set_font(&config.font);

        let mut editor = Self {
            buffer: LineIndex::from_text(text),
            layout: TextLayout::new(),
            doc_name: String::new(),
            cursor: Position::default(),
            selection: None,
            metrics: FontMetrics::approximate(&config.font),
            first_visible_line: 0,
            viewport_height: 0.0,
            band: CurrentLineBand::new(config.current_line_color),
            search: SearchOverlay::new(config.search_color),
            config,
            processor,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        };
        editor.text_changed();
        editor
    }

    // ---------------------------------------------------------------------
    // Document
    // ---------------------------------------------------------------------

    /// Logical document name (passed to the parser on every pass).
    pub fn doc_name(&self) -> &str {
        &self.doc_name
    }

    /// Set the logical document name. Takes effect from the next highlight pass.
    pub fn set_doc_name(&mut self, name: impl Into<String>) {
        self.doc_name = name.into();
    }

    /// The whole buffer.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Text of one line, without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.buffer.line_text(line)
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }

    /// Replace the whole buffer. Resets the cursor and the undo history.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = LineIndex::from_text(text);
        self.cursor = Position::default();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.text_changed();
    }

    /// Insert `text` at char offset `offset`. The cursor moves to the end of the insertion.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditorError> {
        self.replace(offset, offset, text)
    }

    /// Delete the half-open char range `start..end`.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        self.replace(start, end, "")
    }

    /// Replace the half-open char range `start..end` with `text`.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<(), EditorError> {
        self.check_range(start, end)?;
        if start == end && text.is_empty() {
            return Ok(());
        }

        let removed = self.buffer.slice(start, end);
        let record = EditRecord {
            start,
            removed,
            inserted: text.to_string(),
        };
        self.apply(&record);
        self.undo_stack.push(record);
        self.redo_stack.clear();
        Ok(())
    }

    /// Revert the last edit. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo_stack.pop() else {
            return false;
        };
        self.apply(&record.inverted());
        self.redo_stack.push(record);
        true
    }

    /// Re-apply the last undone edit. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };
        self.apply(&record);
        self.undo_stack.push(record);
        true
    }

    /// Whether [`Self::undo`] would do something.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether [`Self::redo`] would do something.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable edits.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), EditorError> {
        let len = self.buffer.char_count();
        if start > end {
            return Err(EditorError::InvalidRange { start, end });
        }
        if end > len {
            return Err(EditorError::OffsetOutOfBounds { offset: end, len });
        }
        Ok(())
    }

    fn apply(&mut self, record: &EditRecord) {
        let removed_len = record.removed.chars().count();
        self.buffer.remove(record.start, record.start + removed_len);
        self.buffer.insert(record.start, &record.inserted);

        let caret = record.start + record.inserted.chars().count();
        let (line, column) = self.buffer.char_offset_to_position(caret);
        self.cursor = Position::new(line, column);

        debug!(
            start = record.start,
            removed = removed_len,
            inserted = record.inserted.len(),
            "buffer changed"
        );
        self.text_changed();
    }

    /// Re-run the processor and recompute everything derived from the buffer.
    fn text_changed(&mut self) {
        self.selection = None;
        self.layout.sync(&self.buffer);

        let text = self.buffer.text();
        self.processor.process(&text, &self.doc_name, &mut self.layout);

        self.cursor = self.clamp(self.cursor);
        self.highlight_current_line();
        self.search.recompute(&self.buffer);
    }

    // ---------------------------------------------------------------------
    // Highlighting
    // ---------------------------------------------------------------------

    /// Run a highlight pass over the current buffer.
    pub fn rehighlight(&mut self) {
        let text = self.buffer.text();
        self.processor.process(&text, &self.doc_name, &mut self.layout);
    }

    /// Remove every syntax format. Overlays are not affected.
    pub fn clear_highlighting(&mut self) {
        self.processor.clear(&mut self.layout);
    }

    /// The attached processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// The attached processor, mutably. Call [`Self::rehighlight`] after changing its settings.
    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// The render layer holding the committed syntax formats.
    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    /// Committed syntax formats of `line`.
    pub fn syntax_formats(&self, line: usize) -> &[FormatRange] {
        self.layout.formats(line)
    }

    /// Everything painted on `line`: current-line band first, then syntax, then search matches.
    pub fn line_formats(&self, line: usize) -> Vec<FormatRange> {
        overlay::compose(
            self.band.range_for(line),
            self.layout.formats(line),
            self.search.ranges(line),
        )
    }

    /// The range that wins on `(line, column)` after composition.
    pub fn format_at(&self, line: usize, column: usize) -> Option<FormatRange> {
        topmost_at(&self.line_formats(line), column).cloned()
    }

    // ---------------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------------

    /// The cursor position.
    pub fn cursor_position(&self) -> Position {
        self.cursor
    }

    /// The match selected by the last find, if the cursor has not moved since.
    pub fn selection(&self) -> Option<SearchMatch> {
        self.selection
    }

    /// Move the cursor (clamped to the buffer) and move the current-line band with it.
    pub fn set_cursor(&mut self, position: Position) {
        self.selection = None;
        self.cursor = self.clamp(position);
        self.highlight_current_line();
    }

    /// Jump to a 1-based line number (clamped) and scroll it into view.
    pub fn go_to_line(&mut self, line_number: usize) {
        let line = line_number.saturating_sub(1);
        self.set_cursor(Position::new(line, 0));
        self.ensure_cursor_visible();
    }

    fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.buffer.line_count().saturating_sub(1));
        let column = position.column.min(self.buffer.line_len_chars(line));
        Position::new(line, column)
    }

    fn cursor_offset(&self) -> usize {
        self.buffer
            .position_to_char_offset(self.cursor.line, self.cursor.column)
    }

    fn highlight_current_line(&mut self) {
        let line = self.cursor.line;
        self.band.update(line, self.buffer.line_len_chars(line));
    }

    /// The line marked by the current-line band.
    pub fn current_line(&self) -> Option<usize> {
        self.band.line()
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    /// Highlight every occurrence of `needle` (literal, case-sensitive). Returns the match count.
    ///
    /// An empty needle clears the overlay.
    pub fn highlight_search(&mut self, needle: &str) -> Result<usize, EditorError> {
        self.search.set_needle(needle, &self.buffer)?;
        Ok(self.search.match_count())
    }

    /// Remove the search overlay.
    pub fn clear_search_highlight(&mut self) {
        self.search.clear();
    }

    /// The needle of the search overlay.
    pub fn search_needle(&self) -> Option<&str> {
        self.search.needle()
    }

    /// Search overlay ranges on `line`.
    pub fn search_ranges(&self, line: usize) -> &[FormatRange] {
        self.search.ranges(line)
    }

    /// Select the next occurrence of `needle` after the cursor, wrapping around the end.
    pub fn find_next(&mut self, needle: &str) -> Result<Option<SearchMatch>, EditorError> {
        let query = LiteralQuery::new(needle)?;
        let text = self.buffer.text();
        let from = self.selection.map_or_else(|| self.cursor_offset(), |m| m.end);

        let found = query
            .find_next(&text, from)
            .or_else(|| query.find_next(&text, 0));
        self.select(found);
        Ok(found)
    }

    /// Select the previous occurrence of `needle` before the cursor, wrapping around the start.
    pub fn find_prev(&mut self, needle: &str) -> Result<Option<SearchMatch>, EditorError> {
        let query = LiteralQuery::new(needle)?;
        let text = self.buffer.text();
        let before = self.selection.map_or_else(|| self.cursor_offset(), |m| m.start);

        let found = query
            .find_prev(&text, before)
            .or_else(|| query.find_prev(&text, self.buffer.char_count()));
        self.select(found);
        Ok(found)
    }

    fn select(&mut self, found: Option<SearchMatch>) {
        if let Some(m) = found {
            let (line, column) = self.buffer.char_offset_to_position(m.end);
            self.set_cursor(Position::new(line, column));
            self.selection = Some(m);
        }
    }

    /// Replace every occurrence of `needle` with `replacement` as a single undoable edit.
    ///
    /// Returns the number of replacements.
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize, EditorError> {
        let query = LiteralQuery::new(needle)?;
        let text = self.buffer.text();
        let matches = query.find_all(&text);
        if matches.is_empty() {
            return Ok(0);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in &matches {
            out.extend(&chars[last..m.start]);
            out.push_str(replacement);
            last = m.end;
        }
        out.extend(&chars[last..]);

        let record = EditRecord {
            start: 0,
            removed: text,
            inserted: out,
        };
        self.apply(&record);
        self.undo_stack.push(record);
        self.redo_stack.clear();
        Ok(matches.len())
    }

    // ---------------------------------------------------------------------
    // View
    // ---------------------------------------------------------------------

    /// The editor configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply a new configuration (font, toggles and overlay colors).
    pub fn set_config(&mut self, config: EditorConfig) {
        self.band.set_color(config.current_line_color);
        self.search.set_color(config.search_color);
        let font_changed = config.font != self.config.font;
        let font = config.font.clone();
        self.config = config;
        if font_changed {
            self.set_font(font);
        }
    }

    /// The editor font.
    pub fn font(&self) -> &FontSpec {
        &self.config.font
    }

    /// Change the editor font. Metrics are re-derived and syntax formats rebuilt with the font.
    pub fn set_font(&mut self, font: FontSpec) {
        self.metrics = FontMetrics::approximate(&font);
        self.processor.set_font(&font);
        self.config.font = font;
        self.rehighlight();
    }

    /// Override the derived font metrics with measured ones.
    pub fn set_font_metrics(&mut self, metrics: FontMetrics) {
        self.metrics = metrics;
    }

    /// Current font metrics.
    pub fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Show or hide the line-number gutter.
    pub fn show_line_numbers(&mut self, on: bool) {
        self.config.show_line_numbers = on;
    }

    /// Whether the line-number gutter is shown.
    pub fn line_numbers_visible(&self) -> bool {
        self.config.show_line_numbers
    }

    /// Show or hide markers for unprintable characters.
    pub fn show_unprintable_characters(&mut self, on: bool) {
        self.config.show_unprintable = on;
    }

    /// Whether unprintable-character markers are shown.
    pub fn unprintable_characters_visible(&self) -> bool {
        self.config.show_unprintable
    }

    /// Width of the line-number gutter for the current line count.
    pub fn line_number_area_width(&self) -> f32 {
        gutter::line_number_area_width(self.buffer.line_count(), &self.metrics)
    }

    /// Margins, tab stops and text flags derived from the view toggles.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            left_margin: if self.config.show_line_numbers {
                self.line_number_area_width()
            } else {
                0.0
            },
            tab_stop_distance: self.metrics.char_width * self.config.tab_width as f32,
            show_tabs_and_spaces: self.config.show_unprintable,
            show_line_separators: self.config.show_unprintable,
        }
    }

    /// Set the height of the viewport, in pixels.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
    }

    /// Scroll so that `line` is the first visible line (clamped).
    pub fn set_first_visible_line(&mut self, line: usize) {
        self.first_visible_line = line.min(self.buffer.line_count().saturating_sub(1));
    }

    /// First visible line.
    pub fn first_visible_line(&self) -> usize {
        self.first_visible_line
    }

    fn visible_line_count(&self) -> usize {
        if self.metrics.line_height <= 0.0 {
            return 1;
        }
        ((self.viewport_height / self.metrics.line_height).floor() as usize).max(1)
    }

    fn ensure_cursor_visible(&mut self) {
        let visible = self.visible_line_count();
        let line = self.cursor.line;
        if line < self.first_visible_line {
            self.first_visible_line = line;
        } else if line >= self.first_visible_line + visible {
            self.first_visible_line = line + 1 - visible;
        }
    }

    /// The logical line under vertical pixel position `y` (relative to the viewport top).
    pub fn line_number_at(&self, y: f32) -> Option<usize> {
        gutter::line_at(
            y,
            self.first_visible_line,
            self.buffer.line_count(),
            &self.metrics,
        )
    }
}
