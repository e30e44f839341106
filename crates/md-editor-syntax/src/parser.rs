//! Markdown → [`Document`] using `pulldown-cmark` offset events.
//!
//! Byte ranges reported by the parser become inclusive `(line, column)` spans over chars, with
//! trailing line terminators trimmed. Emphasis, strong emphasis and strikethrough do not become
//! nodes; they set [`TextStyle`] bits on the text-like nodes inside them.

use crate::document::{
    Alignment, Anchor, Blockquote, Code, Document, Footnote, FootnoteRef, Heading, Image, Item,
    Link, List, ListItem, Math, Paragraph, RawHtml, Table, TableCell, TableRow, Text,
};
use md_editor_core::{LineIndex, Span, TextStyle};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Parser extensions enabled for the editor.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse `source` into a position-tagged document.
///
/// A non-empty `doc_name` is recorded as an [`Anchor`] at the start of the document.
pub fn parse(source: &str, doc_name: &str) -> Document {
    let index = LineIndex::from_text(source);
    let mut builder = TreeBuilder::new(source, &index);

    if !doc_name.is_empty() {
        builder.doc.items.push(Item::Anchor(Anchor {
            span: Span::point(0, 0),
            label: doc_name.to_string(),
        }));
    }

    for (event, range) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        builder.event(event, range);
    }

    builder.finish()
}

#[derive(Debug)]
enum FrameKind {
    Paragraph,
    Heading { level: usize, label: Option<String> },
    Blockquote,
    CodeBlock { language: String, fenced: bool },
    HtmlBlock,
    List { start: Option<u64> },
    ListItem { task: Option<bool> },
    Footnote { label: String },
    Table { alignments: Vec<Alignment> },
    TableRow,
    TableCell,
    Link { url: String, options: TextStyle },
    Image { url: String },
    /// Constructs without a node of their own; children are spliced into the parent.
    Transparent,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    span: Span,
    items: Vec<Item>,
    text: String,
}

struct TreeBuilder<'a> {
    source: &'a str,
    index: &'a LineIndex,
    doc: Document,
    stack: Vec<Frame>,
    italic: usize,
    bold: usize,
    strike: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, index: &'a LineIndex) -> Self {
        Self {
            source,
            index,
            doc: Document::new(),
            stack: Vec::new(),
            italic: 0,
            bold: 0,
            strike: 0,
        }
    }

    fn style(&self) -> TextStyle {
        let mut style = TextStyle::NONE;
        style.set(TextStyle::ITALIC, self.italic > 0);
        style.set(TextStyle::BOLD, self.bold > 0);
        style.set(TextStyle::STRIKETHROUGH, self.strike > 0);
        style
    }

    /// Convert a half-open byte range into an inclusive char span.
    fn span(&self, range: Range<usize>) -> Span {
        let bytes = self.source.as_bytes();
        let mut end = range.end.min(bytes.len());
        while end > range.start && matches!(bytes[end - 1], b'\n' | b'\r') {
            end -= 1;
        }

        let (start_line, start_column) = self.index.byte_to_position(range.start);
        if end <= range.start {
            return Span::point(start_line, start_column);
        }

        // The last char starts at or before `end - 1`.
        let (end_line, end_column) = self.index.byte_to_position(end - 1);
        Span::new(start_line, start_column, end_line, end_column)
    }

    fn push(&mut self, item: Item) {
        match self.stack.last_mut() {
            Some(frame) => frame.items.push(item),
            None => self.doc.items.push(item),
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(frame) = self.stack.last_mut()
                    && matches!(frame.kind, FrameKind::CodeBlock { .. } | FrameKind::HtmlBlock)
                {
                    frame.text.push_str(&text);
                    return;
                }
                let item = Item::Text(Text {
                    span: self.span(range),
                    text: text.into_string(),
                    options: self.style(),
                });
                self.push(item);
            }
            Event::Code(code) => {
                let item = Item::InlineCode(Code {
                    span: self.span(range),
                    text: code.into_string(),
                    language: String::new(),
                    fenced: false,
                });
                self.push(item);
            }
            Event::InlineMath(expr) => self.push_math(expr.into_string(), true, range),
            Event::DisplayMath(expr) => self.push_math(expr.into_string(), false, range),
            Event::Html(html) | Event::InlineHtml(html) => {
                if let Some(frame) = self.stack.last_mut()
                    && matches!(frame.kind, FrameKind::HtmlBlock)
                {
                    frame.text.push_str(&html);
                    return;
                }
                let item = Item::RawHtml(RawHtml {
                    span: self.span(range),
                    text: html.into_string(),
                });
                self.push(item);
            }
            Event::FootnoteReference(label) => {
                let item = Item::FootnoteRef(FootnoteRef {
                    span: self.span(range),
                    label: label.into_string(),
                    options: self.style(),
                });
                self.push(item);
            }
            Event::HardBreak => {
                let span = self.span(range);
                self.push(Item::LineBreak(span));
            }
            Event::Rule => {
                let span = self.span(range);
                self.push(Item::HorizontalLine(span));
            }
            Event::TaskListMarker(checked) => {
                if let Some(frame) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|f| matches!(f.kind, FrameKind::ListItem { .. }))
                {
                    frame.kind = FrameKind::ListItem {
                        task: Some(checked),
                    };
                }
            }
            Event::SoftBreak => {}
        }
    }

    fn push_math(&mut self, expr: String, inline: bool, range: Range<usize>) {
        let span = self.span(range);
        self.push(Item::Math(Math { span, expr, inline }));
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::Emphasis => {
                self.italic += 1;
                return;
            }
            Tag::Strong => {
                self.bold += 1;
                return;
            }
            Tag::Strikethrough => {
                self.strike += 1;
                return;
            }
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Heading { level, id, .. } => FrameKind::Heading {
                level: level as usize,
                label: id.map(|id| id.into_string()),
            },
            Tag::BlockQuote(_) => FrameKind::Blockquote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => FrameKind::CodeBlock {
                language: info.split_whitespace().next().unwrap_or_default().to_string(),
                fenced: true,
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => FrameKind::CodeBlock {
                language: String::new(),
                fenced: false,
            },
            Tag::HtmlBlock => FrameKind::HtmlBlock,
            Tag::List(start) => FrameKind::List { start },
            Tag::Item => FrameKind::ListItem { task: None },
            Tag::FootnoteDefinition(label) => FrameKind::Footnote {
                label: label.into_string(),
            },
            Tag::Table(alignments) => FrameKind::Table {
                alignments: alignments.into_iter().map(alignment).collect(),
            },
            Tag::TableHead | Tag::TableRow => FrameKind::TableRow,
            Tag::TableCell => FrameKind::TableCell,
            Tag::Link { dest_url, .. } => FrameKind::Link {
                url: dest_url.into_string(),
                options: self.style(),
            },
            Tag::Image { dest_url, .. } => FrameKind::Image {
                url: dest_url.into_string(),
            },
            _ => FrameKind::Transparent,
        };

        let span = self.span(range);
        self.stack.push(Frame {
            kind,
            span,
            items: Vec::new(),
            text: String::new(),
        });
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Strikethrough => self.strike = self.strike.saturating_sub(1),
            _ => {
                if let Some(frame) = self.stack.pop() {
                    self.close(frame);
                }
            }
        }
    }

    fn close(&mut self, frame: Frame) {
        let Frame {
            kind,
            span,
            items,
            text,
        } = frame;

        let item = match kind {
            FrameKind::Paragraph => Item::Paragraph(Paragraph { span, items }),
            FrameKind::Heading { level, label } => Item::Heading(Heading {
                span,
                level,
                label,
                text: inline_paragraph(items),
            }),
            FrameKind::Blockquote => Item::Blockquote(Blockquote { span, items }),
            FrameKind::CodeBlock { language, fenced } => Item::Code(Code {
                span,
                text,
                language,
                fenced,
            }),
            FrameKind::HtmlBlock => Item::RawHtml(RawHtml { span, text }),
            FrameKind::List { start } => Item::List(List {
                span,
                start,
                items: items
                    .into_iter()
                    .filter_map(|i| match i {
                        Item::ListItem(li) => Some(li),
                        _ => None,
                    })
                    .collect(),
            }),
            FrameKind::ListItem { task } => Item::ListItem(ListItem { span, task, items }),
            FrameKind::Footnote { label } => {
                self.doc.insert_footnote(Footnote { span, label, items });
                return;
            }
            FrameKind::Table { alignments } => Item::Table(Table {
                span,
                alignments,
                rows: items
                    .into_iter()
                    .filter_map(|i| match i {
                        Item::TableRow(row) => Some(row),
                        _ => None,
                    })
                    .collect(),
            }),
            FrameKind::TableRow => Item::TableRow(TableRow {
                span,
                cells: items
                    .into_iter()
                    .filter_map(|i| match i {
                        Item::TableCell(cell) => Some(cell),
                        _ => None,
                    })
                    .collect(),
            }),
            FrameKind::TableCell => Item::TableCell(TableCell { span, items }),
            FrameKind::Link { url, options } => Item::Link(Link {
                span,
                url,
                options,
                paragraph: inline_paragraph(items),
            }),
            FrameKind::Image { url } => Item::Image(Image {
                span,
                url,
                paragraph: inline_paragraph(items),
            }),
            FrameKind::Transparent => {
                for item in items {
                    self.push(item);
                }
                return;
            }
        };

        self.push(item);
    }

    fn finish(mut self) -> Document {
        // Unbalanced frames cannot come out of pulldown-cmark, but never lose content.
        while let Some(frame) = self.stack.pop() {
            self.close(frame);
        }

        if let (Some(first), Some(last)) = (self.doc.items.first(), self.doc.items.last()) {
            let (first, last) = (first.span(), last.span());
            self.doc.span = Span::new(
                first.start_line,
                first.start_column,
                last.end_line,
                last.end_column,
            );
        }
        self.doc
    }
}

/// Wrap inline children into a paragraph spanning from the first to the last child.
fn inline_paragraph(items: Vec<Item>) -> Option<Paragraph> {
    let first = items.first()?.span();
    let last = items.last()?.span();
    Some(Paragraph {
        span: Span::new(
            first.start_line,
            first.start_column,
            last.end_line,
            last.end_column,
        ),
        items,
    })
}

fn alignment(a: pulldown_cmark::Alignment) -> Alignment {
    match a {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}
