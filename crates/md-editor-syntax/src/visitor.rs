//! Tree walk that turns a [`Document`] into syntax formats.
//!
//! The walk is pre-order (document, then block children, then inline children) followed by a
//! second pass over the footnote definitions and their content, which are not reachable through
//! the tree. Ranges are pushed into a [`FormatAccumulator`] in walk order, so an inner node painted
//! after its container wins on the columns they share.

use crate::colors::Colors;
use crate::document::{Document, Footnote, FootnoteRef, Item, Link, Paragraph, Table, TableCell, Text};
use md_editor_core::{CharFormat, Color, FontSpec, FormatAccumulator, FormatRange, RenderLayer, Span};
use tracing::debug;

/// Syntax highlighter for a parsed markdown document.
#[derive(Debug, Clone, Default)]
pub struct SyntaxVisitor {
    acc: FormatAccumulator,
    font: FontSpec,
}

/// Borrowed state of one highlight pass.
struct Pass<'a, L: RenderLayer + ?Sized> {
    acc: &'a mut FormatAccumulator,
    layer: &'a L,
    doc: &'a Document,
    colors: &'a Colors,
    font: &'a FontSpec,
}

impl SyntaxVisitor {
    /// Create a visitor using the default font.
    pub fn new() -> Self {
        Self::default()
    }

    /// Base font of every syntax format.
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Replace the base font. Takes effect on the next pass.
    pub fn set_font(&mut self, font: &FontSpec) {
        self.font = font.clone();
    }

    /// Replace the syntax formats of `layer` with the formats of `doc`.
    ///
    /// `None` or an empty document clears the previous pass and commits nothing.
    pub fn highlight<L: RenderLayer + ?Sized>(
        &mut self,
        doc: Option<&Document>,
        colors: &Colors,
        layer: &mut L,
    ) {
        self.acc.clear(layer);

        let Some(doc) = doc.filter(|d| !d.is_empty()) else {
            debug!("nothing to highlight");
            return;
        };

        let mut pass = Pass {
            acc: &mut self.acc,
            layer: &*layer,
            doc,
            colors,
            font: &self.font,
        };
        for item in &doc.items {
            pass.item(item);
        }
        for footnote in doc.footnotes() {
            pass.footnote(footnote);
        }

        self.acc.commit(layer);
        debug!(
            lines = self.acc.tracked_lines().count(),
            ranges = self.acc.len(),
            items = doc.items.len(),
            footnotes = doc.footnote_count(),
            "highlight pass committed"
        );
    }

    /// Remove every format committed by the previous pass.
    pub fn clear_highlighting<L: RenderLayer + ?Sized>(&mut self, layer: &mut L) {
        self.acc.clear(layer);
    }

    /// Ranges of the last pass on `line`, in paint order.
    pub fn ranges(&self, line: usize) -> &[FormatRange] {
        self.acc.ranges(line)
    }

    /// The range that wins on `(line, column)` in the last pass.
    pub fn format_at(&self, line: usize, column: usize) -> Option<&FormatRange> {
        self.acc.format_at(line, column)
    }

    /// Number of lines that received formats in the last pass.
    pub fn formatted_lines(&self) -> usize {
        self.acc.tracked_lines().count()
    }
}

impl<L: RenderLayer + ?Sized> Pass<'_, L> {
    fn set(&mut self, span: Span, format: CharFormat) {
        self.acc.set_format(self.layer, span, &format);
    }

    /// Color on the base font.
    fn flat(&mut self, span: Span, color: Color) {
        let format = CharFormat::text(color, self.font.clone());
        self.set(span, format);
    }

    fn item(&mut self, item: &Item) {
        match item {
            Item::Text(text) => self.text(text),
            Item::Heading(heading) => {
                let format = CharFormat::text(self.colors.heading, self.font.to_bold());
                self.set(heading.span, format);
            }
            Item::Paragraph(paragraph) => self.paragraph(paragraph),
            Item::Code(code) => self.flat(code.span, self.colors.code),
            Item::InlineCode(code) => self.flat(code.span, self.colors.inline_code),
            Item::Blockquote(quote) => {
                self.flat(quote.span, self.colors.blockquote);
                self.items(&quote.items);
            }
            Item::List(list) => {
                for entry in &list.items {
                    self.flat(entry.span, self.colors.list);
                    self.items(&entry.items);
                }
            }
            Item::ListItem(entry) => {
                self.flat(entry.span, self.colors.list);
                self.items(&entry.items);
            }
            Item::Link(link) => self.link(link),
            Item::Image(image) => {
                self.flat(image.span, self.colors.link);
                if let Some(alt) = &image.paragraph {
                    self.paragraph(alt);
                }
            }
            Item::Table(table) => self.table(table),
            Item::TableRow(row) => {
                for cell in &row.cells {
                    self.cell(cell);
                }
            }
            Item::TableCell(cell) => self.cell(cell),
            Item::Footnote(footnote) => self.footnote(footnote),
            Item::FootnoteRef(reference) => self.footnote_ref(reference),
            Item::RawHtml(html) => self.flat(html.span, self.colors.html),
            Item::Math(_)
            | Item::LineBreak(_)
            | Item::HorizontalLine(_)
            | Item::Anchor(_)
            | Item::PageBreak(_) => {}
        }
    }

    fn items(&mut self, items: &[Item]) {
        for item in items {
            self.item(item);
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        self.items(&paragraph.items);
    }

    fn text(&mut self, text: &Text) {
        let format = CharFormat::text(self.colors.text, self.font.with_style(text.options));
        self.set(text.span, format);
    }

    fn link(&mut self, link: &Link) {
        let format = CharFormat::text(self.colors.link, self.font.with_style(link.options));
        self.set(link.span, format);
        if let Some(label) = &link.paragraph {
            self.paragraph(label);
        }
    }

    fn footnote(&mut self, footnote: &Footnote) {
        self.flat(footnote.span, self.colors.footnote);
        self.items(&footnote.items);
    }

    fn footnote_ref(&mut self, reference: &FootnoteRef) {
        let format = if self.doc.footnote(&reference.label).is_some() {
            CharFormat::text(self.colors.link, self.font.with_style(reference.options))
        } else {
            CharFormat::text(self.colors.text, self.font.clone())
        };
        self.set(reference.span, format);
    }

    fn table(&mut self, table: &Table) {
        self.flat(table.span, self.colors.table);

        let Some((header, body)) = table.rows.split_first() else {
            return;
        };
        for cell in &header.cells {
            self.cell(cell);
        }

        // Cells past the header width are not part of the table.
        let columns = table.columns();
        for row in body {
            for cell in row.cells.iter().take(columns) {
                self.cell(cell);
            }
        }
    }

    fn cell(&mut self, cell: &TableCell) {
        self.flat(cell.span, self.colors.table);
        self.items(&cell.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Anchor, List, ListItem, TableRow};
    use md_editor_core::{TextLayout, TextStyle};
    use pretty_assertions::assert_eq;

    fn layout(widths: &[usize]) -> TextLayout {
        let text = widths
            .iter()
            .map(|w| "x".repeat(*w))
            .collect::<Vec<_>>()
            .join("\n");
        TextLayout::from_line_index(&md_editor_core::LineIndex::from_text(&text))
    }

    fn text(span: Span, options: TextStyle) -> Item {
        Item::Text(Text {
            span,
            text: String::new(),
            options,
        })
    }

    fn doc(items: Vec<Item>) -> Document {
        let mut doc = Document::new();
        doc.items = items;
        doc
    }

    #[test]
    fn test_none_and_empty_clear_previous_pass() {
        let mut layer = layout(&[10]);
        let mut visitor = SyntaxVisitor::new();
        let colors = Colors::default();

        visitor.highlight(
            Some(&doc(vec![text(Span::new(0, 0, 0, 3), TextStyle::NONE)])),
            &colors,
            &mut layer,
        );
        assert_eq!(layer.range_count(), 1);

        visitor.highlight(None, &colors, &mut layer);
        assert!(layer.is_unformatted());

        let anchors_only = doc(vec![Item::Anchor(Anchor {
            span: Span::point(0, 0),
            label: "a.md".to_string(),
        })]);
        visitor.highlight(Some(&anchors_only), &colors, &mut layer);
        assert!(layer.is_unformatted());
        assert_eq!(visitor.formatted_lines(), 0);
    }

    #[test]
    fn test_multi_line_span_gets_one_range_per_line() {
        let mut layer = layout(&[5, 8, 4]);
        let mut visitor = SyntaxVisitor::new();
        let tree = doc(vec![Item::Code(crate::document::Code {
            span: Span::new(0, 2, 2, 1),
            text: String::new(),
            language: String::new(),
            fenced: true,
        })]);

        visitor.highlight(Some(&tree), &Colors::default(), &mut layer);

        let spans: Vec<(usize, usize)> = (0..3)
            .map(|l| (visitor.ranges(l)[0].start, visitor.ranges(l)[0].length))
            .collect();
        assert_eq!(spans, vec![(2, 3), (0, 8), (0, 2)]);
    }

    #[test]
    fn test_list_item_then_inner_text() {
        let mut layer = layout(&[12]);
        let mut visitor = SyntaxVisitor::new();
        let colors = Colors::default();
        let tree = doc(vec![Item::List(List {
            span: Span::new(0, 0, 0, 11),
            start: None,
            items: vec![ListItem {
                span: Span::new(0, 0, 0, 11),
                task: None,
                items: vec![text(Span::new(0, 2, 0, 11), TextStyle::BOLD)],
            }],
        })]);

        visitor.highlight(Some(&tree), &colors, &mut layer);

        let ranges = visitor.ranges(0);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].format.foreground, Some(colors.list));
        assert_eq!(visitor.format_at(0, 0).unwrap().format.foreground, Some(colors.list));

        let inner = visitor.format_at(0, 5).unwrap();
        assert_eq!(inner.format.foreground, Some(colors.text));
        assert!(inner.format.is_bold());
    }

    #[test]
    fn test_table_ignores_cells_past_header_width() {
        let mut layer = layout(&[9, 9, 13]);
        let mut visitor = SyntaxVisitor::new();
        let cell = |line, col| TableCell {
            span: Span::new(line, col, line, col),
            items: vec![text(Span::new(line, col, line, col), TextStyle::NONE)],
        };
        let row = |line, cols: &[usize]| TableRow {
            span: Span::new(line, 0, line, 12),
            cells: cols.iter().map(|c| cell(line, *c)).collect(),
        };
        let tree = doc(vec![Item::Table(Table {
            span: Span::new(0, 0, 2, 12),
            alignments: Vec::new(),
            rows: vec![row(0, &[2, 6]), row(2, &[2, 6, 10])],
        })]);

        visitor.highlight(Some(&tree), &Colors::default(), &mut layer);

        // table + (cell + text) per cell; the third body cell adds nothing
        assert_eq!(visitor.ranges(0).len(), 5);
        assert_eq!(visitor.ranges(2).len(), 5);
    }

    #[test]
    fn test_empty_table_only_gets_table_color() {
        let mut layer = layout(&[4]);
        let mut visitor = SyntaxVisitor::new();
        let tree = doc(vec![Item::Table(Table {
            span: Span::new(0, 0, 0, 3),
            ..Table::default()
        })]);

        visitor.highlight(Some(&tree), &Colors::default(), &mut layer);
        assert_eq!(visitor.ranges(0).len(), 1);
    }

    #[test]
    fn test_footnotes_painted_after_tree() {
        let mut layer = layout(&[6, 0, 10]);
        let mut visitor = SyntaxVisitor::new();
        let colors = Colors::default();
        let mut tree = doc(vec![Item::FootnoteRef(FootnoteRef {
            span: Span::new(0, 0, 0, 5),
            label: "n".to_string(),
            options: TextStyle::ITALIC,
        })]);
        tree.insert_footnote(Footnote {
            span: Span::new(2, 0, 2, 9),
            label: "N".to_string(),
            items: vec![text(Span::new(2, 6, 2, 9), TextStyle::BOLD)],
        });

        visitor.highlight(Some(&tree), &colors, &mut layer);

        let reference = visitor.format_at(0, 0).unwrap();
        assert_eq!(reference.format.foreground, Some(colors.link));
        assert!(reference.format.is_italic());
        assert_eq!(
            visitor.format_at(2, 0).unwrap().format.foreground,
            Some(colors.footnote)
        );

        // Footnote content paints over the definition's own range.
        assert_eq!(visitor.ranges(2).len(), 2);
        let inner = visitor.format_at(2, 7).unwrap();
        assert_eq!(inner.format.foreground, Some(colors.text));
        assert!(inner.format.is_bold());
    }

    #[test]
    fn test_heading_is_bold_without_recursion() {
        let mut layer = layout(&[7]);
        let mut visitor = SyntaxVisitor::new();
        let colors = Colors::default();
        let tree = doc(vec![Item::Heading(crate::document::Heading {
            span: Span::new(0, 0, 0, 6),
            level: 1,
            label: None,
            text: Some(Paragraph {
                span: Span::new(0, 2, 0, 6),
                items: vec![text(Span::new(0, 2, 0, 6), TextStyle::NONE)],
            }),
        })]);

        visitor.highlight(Some(&tree), &colors, &mut layer);

        assert_eq!(visitor.ranges(0).len(), 1);
        let heading = &visitor.ranges(0)[0];
        assert_eq!((heading.start, heading.length), (0, 7));
        assert!(heading.format.is_bold());
        assert_eq!(heading.format.foreground, Some(colors.heading));
    }
}
