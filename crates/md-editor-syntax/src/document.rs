//! Position-tagged markdown document tree.
//!
//! Every node carries an inclusive [`Span`] into the source text. The tree is a plain owned
//! hierarchy; footnote definitions live outside it in [`Document::footnotes`] and are resolved
//! from [`FootnoteRef`]s by label lookup.

use md_editor_core::{Span, TextStyle};
use std::collections::BTreeMap;

/// Node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// Root.
    Document,
    /// Plain text run.
    Text,
    /// ATX or setext heading.
    Heading,
    /// Paragraph.
    Paragraph,
    /// Fenced or indented code block.
    Code,
    /// Inline code span.
    InlineCode,
    /// Block quote.
    Blockquote,
    /// Ordered or unordered list.
    List,
    /// One list item.
    ListItem,
    /// Link.
    Link,
    /// Image.
    Image,
    /// Table.
    Table,
    /// Table row.
    TableRow,
    /// Table cell.
    TableCell,
    /// Footnote definition.
    Footnote,
    /// Footnote reference.
    FootnoteRef,
    /// Structural anchor.
    Anchor,
    /// Raw HTML.
    RawHtml,
    /// Thematic break.
    HorizontalLine,
    /// Inline or display math.
    Math,
    /// Hard line break.
    LineBreak,
    /// Page break between documents.
    PageBreak,
}

/// A run of text with its style options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Source span.
    pub span: Span,
    /// Text content with markup removed.
    pub text: String,
    /// Emphasis bits of the enclosing markup.
    pub options: TextStyle,
}

/// A sequence of inline items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Source span.
    pub span: Span,
    /// Inline children.
    pub items: Vec<Item>,
}

/// An ATX or setext heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Source span, markers included.
    pub span: Span,
    /// 1..=6
    pub level: usize,
    /// Explicit `{#id}` label, if any.
    pub label: Option<String>,
    /// Heading content.
    pub text: Option<Paragraph>,
}

/// A code block or an inline code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    /// Source span, fences or backticks included.
    pub span: Span,
    /// Code text.
    pub text: String,
    /// Info string of a fenced block (empty otherwise).
    pub language: String,
    /// `true` for fenced blocks.
    pub fenced: bool,
}

/// A block quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blockquote {
    /// Source span, `>` markers included.
    pub span: Span,
    /// Block children.
    pub items: Vec<Item>,
}

/// An ordered or bullet list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    /// Source span.
    pub span: Span,
    /// Start number of an ordered list, `None` for bullet lists.
    pub start: Option<u64>,
    /// Items in source order.
    pub items: Vec<ListItem>,
}

/// One list item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Source span, marker and nested blocks included.
    pub span: Span,
    /// `Some(checked)` for task list items.
    pub task: Option<bool>,
    /// Children.
    pub items: Vec<Item>,
}

/// An inline link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Source span of the whole link.
    pub span: Span,
    /// Destination.
    pub url: String,
    /// Emphasis bits of the enclosing markup.
    pub options: TextStyle,
    /// Display text.
    pub paragraph: Option<Paragraph>,
}

/// An inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Source span of the whole image.
    pub span: Span,
    /// Image source.
    pub url: String,
    /// Alt text.
    pub paragraph: Option<Paragraph>,
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// No alignment given.
    #[default]
    None,
    /// `:--`
    Left,
    /// `:-:`
    Center,
    /// `--:`
    Right,
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Source span.
    pub span: Span,
    /// Inline children.
    pub items: Vec<Item>,
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Source span.
    pub span: Span,
    /// Cells in source order.
    pub cells: Vec<TableCell>,
}

/// A table. The first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Source span, delimiter row included.
    pub span: Span,
    /// Per-column alignment from the delimiter row.
    pub alignments: Vec<Alignment>,
    /// Header row followed by body rows.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Returns `true` if the table has no header row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of header cells.
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, |r| r.cells.len())
    }
}

/// A footnote definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footnote {
    /// Source span, `[^label]:` included.
    pub span: Span,
    /// Label as written.
    pub label: String,
    /// Block children.
    pub items: Vec<Item>,
}

/// A `[^label]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteRef {
    /// Source span.
    pub span: Span,
    /// Label as written.
    pub label: String,
    /// Emphasis bits of the enclosing markup.
    pub options: TextStyle,
}

/// A structural marker (e.g. the start of a named document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Zero-width position of the marker.
    pub span: Span,
    /// Anchor name.
    pub label: String,
}

/// Raw HTML, block or inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHtml {
    /// Source span.
    pub span: Span,
    /// HTML source.
    pub text: String,
}

/// A math expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Math {
    /// Source span, delimiters included.
    pub span: Span,
    /// Expression without delimiters.
    pub expr: String,
    /// `true` for `$...$`, `false` for `$$...$$`.
    pub inline: bool,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Plain text run.
    Text(Text),
    /// Heading.
    Heading(Heading),
    /// Paragraph.
    Paragraph(Paragraph),
    /// Code block.
    Code(Code),
    /// Inline code span.
    InlineCode(Code),
    /// Block quote.
    Blockquote(Blockquote),
    /// List.
    List(List),
    /// List item.
    ListItem(ListItem),
    /// Link.
    Link(Link),
    /// Image.
    Image(Image),
    /// Table.
    Table(Table),
    /// Table row.
    TableRow(TableRow),
    /// Table cell.
    TableCell(TableCell),
    /// Footnote definition.
    Footnote(Footnote),
    /// Footnote reference.
    FootnoteRef(FootnoteRef),
    /// Structural anchor.
    Anchor(Anchor),
    /// Raw HTML.
    RawHtml(RawHtml),
    /// Thematic break.
    HorizontalLine(Span),
    /// Math.
    Math(Math),
    /// Hard line break.
    LineBreak(Span),
    /// Page break between documents.
    PageBreak(Span),
}

impl Item {
    /// The node's type tag.
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Text(_) => ItemType::Text,
            Self::Heading(_) => ItemType::Heading,
            Self::Paragraph(_) => ItemType::Paragraph,
            Self::Code(_) => ItemType::Code,
            Self::InlineCode(_) => ItemType::InlineCode,
            Self::Blockquote(_) => ItemType::Blockquote,
            Self::List(_) => ItemType::List,
            Self::ListItem(_) => ItemType::ListItem,
            Self::Link(_) => ItemType::Link,
            Self::Image(_) => ItemType::Image,
            Self::Table(_) => ItemType::Table,
            Self::TableRow(_) => ItemType::TableRow,
            Self::TableCell(_) => ItemType::TableCell,
            Self::Footnote(_) => ItemType::Footnote,
            Self::FootnoteRef(_) => ItemType::FootnoteRef,
            Self::Anchor(_) => ItemType::Anchor,
            Self::RawHtml(_) => ItemType::RawHtml,
            Self::HorizontalLine(_) => ItemType::HorizontalLine,
            Self::Math(_) => ItemType::Math,
            Self::LineBreak(_) => ItemType::LineBreak,
            Self::PageBreak(_) => ItemType::PageBreak,
        }
    }

    /// The node's source span.
    pub fn span(&self) -> Span {
        match self {
            Self::Text(t) => t.span,
            Self::Heading(h) => h.span,
            Self::Paragraph(p) => p.span,
            Self::Code(c) | Self::InlineCode(c) => c.span,
            Self::Blockquote(b) => b.span,
            Self::List(l) => l.span,
            Self::ListItem(i) => i.span,
            Self::Link(l) => l.span,
            Self::Image(i) => i.span,
            Self::Table(t) => t.span,
            Self::TableRow(r) => r.span,
            Self::TableCell(c) => c.span,
            Self::Footnote(f) => f.span,
            Self::FootnoteRef(r) => r.span,
            Self::Anchor(a) => a.span,
            Self::RawHtml(h) => h.span,
            Self::Math(m) => m.span,
            Self::HorizontalLine(s) | Self::LineBreak(s) | Self::PageBreak(s) => *s,
        }
    }
}

/// Normalize a footnote label for lookup (labels match case-insensitively).
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// The root of a parsed buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Span from the first to the last top-level item.
    pub span: Span,
    /// Top-level items; footnote definitions are kept apart.
    pub items: Vec<Item>,
    footnotes: BTreeMap<String, Footnote>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the document holds nothing but anchors.
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|i| matches!(i, Item::Anchor(_)))
    }

    /// Register a footnote definition under its normalized label. A later definition with the
    /// same label is ignored.
    pub fn insert_footnote(&mut self, footnote: Footnote) {
        self.footnotes
            .entry(normalize_label(&footnote.label))
            .or_insert(footnote);
    }

    /// Look up a footnote definition by label.
    pub fn footnote(&self, label: &str) -> Option<&Footnote> {
        self.footnotes.get(&normalize_label(label))
    }

    /// All footnote definitions, ordered by normalized label.
    pub fn footnotes(&self) -> impl Iterator<Item = &Footnote> {
        self.footnotes.values()
    }

    /// Number of footnote definitions.
    pub fn footnote_count(&self) -> usize {
        self.footnotes.len()
    }
}
