use md_editor_core::{FormatRange, LineIndex, Span, TextLayout, TextStyle};
use md_editor_syntax::document::{FootnoteRef, Paragraph, Text};
use md_editor_syntax::{Colors, Document, Item, SyntaxVisitor, parse};
use pretty_assertions::assert_eq;

fn highlight(source: &str) -> (SyntaxVisitor, TextLayout) {
    let mut layout = TextLayout::from_line_index(&LineIndex::from_text(source));
    let mut visitor = SyntaxVisitor::new();
    visitor.highlight(Some(&parse(source, "")), &Colors::default(), &mut layout);
    (visitor, layout)
}

fn snapshot(layout: &TextLayout, lines: usize) -> Vec<Vec<FormatRange>> {
    (0..lines).map(|l| layout.formats(l).to_vec()).collect()
}

const RICH: &str = "# Title\n\n\
Some *text* with `code` and a [link](http://x.y).\n\n\
- item one\n- **item** two\n\n\
> quoted\n\n\
| a | b |\n|---|---|\n| 1 | 2 |\n\n\
```\nfn main() {}\n```\n\n\
See[^n].\n\n[^n]: The note.\n";

#[test]
fn test_heading_and_emphasis_scenario() {
    let colors = Colors::default();
    let (_, layout) = highlight("# Title\n\nSome *text*.");

    let heading = &layout.formats(0)[0];
    assert_eq!((heading.start, heading.length), (0, 7));
    assert_eq!(heading.format.foreground, Some(colors.heading));
    assert!(heading.format.is_bold());

    let emphasized = layout.format_at(2, 7).unwrap();
    assert_eq!(emphasized.format.foreground, Some(colors.text));
    assert!(emphasized.format.is_italic());

    let plain = layout.format_at(2, 1).unwrap();
    assert_eq!(plain.format.foreground, Some(colors.text));
    assert!(!plain.format.is_italic());
}

#[test]
fn test_table_extra_body_cells_are_ignored() {
    let colors = Colors::default();
    let (_, layout) = highlight("| a | b |\n|---|---|\n| 1 | 2 | 3 |\n");

    assert_eq!(layout.format_at(2, 2).unwrap().format.foreground, Some(colors.text));
    assert_eq!(layout.format_at(2, 6).unwrap().format.foreground, Some(colors.text));
    // Only the table's own range covers the third cell.
    assert_eq!(layout.format_at(2, 10).unwrap().format.foreground, Some(colors.table));
}

#[test]
fn test_resolved_footnote_ref_uses_link_color() {
    let colors = Colors::default();
    let (_, layout) = highlight("See[^n].\n\n[^n]: The note.\n");

    assert_eq!(layout.format_at(0, 4).unwrap().format.foreground, Some(colors.link));
    assert_eq!(layout.format_at(2, 0).unwrap().format.foreground, Some(colors.footnote));
}

#[test]
fn test_dangling_footnote_ref_uses_text_color() {
    let colors = Colors::default();
    let mut layout = TextLayout::from_line_index(&LineIndex::from_text("See[^gone]."));
    let mut doc = Document::new();
    doc.items.push(Item::Paragraph(Paragraph {
        span: Span::new(0, 0, 0, 10),
        items: vec![
            Item::Text(Text {
                span: Span::new(0, 0, 0, 2),
                text: "See".to_string(),
                options: TextStyle::NONE,
            }),
            Item::FootnoteRef(FootnoteRef {
                span: Span::new(0, 3, 0, 9),
                label: "gone".to_string(),
                options: TextStyle::BOLD,
            }),
        ],
    }));

    let mut visitor = SyntaxVisitor::new();
    visitor.highlight(Some(&doc), &colors, &mut layout);

    let reference = layout.format_at(0, 5).unwrap();
    assert_eq!(reference.format.foreground, Some(colors.text));
    assert!(!reference.format.is_bold());
}

#[test]
fn test_highlight_is_idempotent() {
    let lines = LineIndex::from_text(RICH).line_count();
    let mut layout = TextLayout::from_line_index(&LineIndex::from_text(RICH));
    let mut visitor = SyntaxVisitor::new();
    let doc = parse(RICH, "rich.md");

    visitor.highlight(Some(&doc), &Colors::default(), &mut layout);
    let first = snapshot(&layout, lines);
    visitor.highlight(Some(&doc), &Colors::default(), &mut layout);
    assert_eq!(snapshot(&layout, lines), first);

    let colors = Colors::default();
    let fg = |line, col| layout.format_at(line, col).and_then(|r| r.format.foreground);
    assert_eq!(fg(2, 18), Some(colors.inline_code));
    assert_eq!(fg(4, 0), Some(colors.list));
    assert_eq!(fg(7, 0), Some(colors.blockquote));
    assert_eq!(fg(7, 2), Some(colors.text));
}

#[test]
fn test_one_range_per_covered_line() {
    let source = "```\na\nbb\nccc\n```\n";
    let (visitor, _) = highlight(source);

    let doc = parse(source, "");
    let Item::Code(code) = &doc.items[0] else {
        panic!("expected code block");
    };
    let lines = code.span.end_line - code.span.start_line + 1;
    assert_eq!(lines, 5);
    assert_eq!(visitor.formatted_lines(), lines);
    for line in 0..lines {
        assert_eq!(visitor.ranges(line).len(), 1, "line {line}");
    }
}

#[test]
fn test_inner_text_wins_over_list_item() {
    let colors = Colors::default();
    let (visitor, _) = highlight("- **bold** item\n");

    let ranges = visitor.ranges(0);
    assert_eq!(ranges[0].format.foreground, Some(colors.list));
    assert_eq!(visitor.format_at(0, 0).unwrap().format.foreground, Some(colors.list));

    let bold = visitor.format_at(0, 4).unwrap();
    assert_eq!(bold.format.foreground, Some(colors.text));
    assert!(bold.format.is_bold());
}

#[test]
fn test_link_label_paints_over_link() {
    let colors = Colors::default();
    let (_, layout) = highlight("[label](http://x.y)");

    assert_eq!(layout.format_at(0, 2).unwrap().format.foreground, Some(colors.text));
    assert_eq!(layout.format_at(0, 10).unwrap().format.foreground, Some(colors.link));
}

#[test]
fn test_clear_highlighting_empties_every_line() {
    let lines = LineIndex::from_text(RICH).line_count();
    let (mut visitor, mut layout) = highlight(RICH);
    assert!(!layout.is_unformatted());

    visitor.clear_highlighting(&mut layout);
    assert!(layout.is_unformatted());
    for line in 0..lines {
        assert!(visitor.ranges(line).is_empty());
        assert!(layout.formats(line).is_empty());
    }
}

#[test]
fn test_blockquote_content_is_highlighted() {
    let colors = Colors::default();
    let (_, layout) = highlight("> quote *em*\n> more\n");

    assert_eq!(layout.format_at(0, 0).unwrap().format.foreground, Some(colors.blockquote));
    let emphasized = layout.format_at(0, 9).unwrap();
    assert_eq!(emphasized.format.foreground, Some(colors.text));
    assert!(emphasized.format.is_italic());
    assert!(!layout.format_at(0, 3).unwrap().format.is_italic());
    assert_eq!(layout.format_at(1, 3).unwrap().format.foreground, Some(colors.text));
}

#[test]
fn test_footnote_definition_content_is_highlighted() {
    let colors = Colors::default();
    let (_, layout) = highlight("See[^n].\n\n[^n]: Some *em*.\n");

    assert_eq!(layout.format_at(2, 0).unwrap().format.foreground, Some(colors.footnote));
    let emphasized = layout.format_at(2, 12).unwrap();
    assert_eq!(emphasized.format.foreground, Some(colors.text));
    assert!(emphasized.format.is_italic());
}

#[test]
fn test_code_colors() {
    let colors = Colors::default();

    let (_, layout) = highlight("```\ncode\n```\n");
    assert_eq!(layout.format_at(1, 0).unwrap().format.foreground, Some(colors.code));

    let (_, layout) = highlight("a `b` c");
    assert_eq!(layout.format_at(0, 3).unwrap().format.foreground, Some(colors.inline_code));
    assert_eq!(layout.format_at(0, 6).unwrap().format.foreground, Some(colors.text));
}

#[test]
fn test_raw_html_colors() {
    let colors = Colors::default();

    let (_, layout) = highlight("<div>\nx\n</div>\n");
    assert_eq!(layout.format_at(0, 0).unwrap().format.foreground, Some(colors.html));
    assert_eq!(layout.format_at(1, 0).unwrap().format.foreground, Some(colors.html));

    let (_, layout) = highlight("a <b>x</b>");
    assert_eq!(layout.format_at(0, 3).unwrap().format.foreground, Some(colors.html));
    assert_eq!(layout.format_at(0, 5).unwrap().format.foreground, Some(colors.text));
}

#[test]
fn test_image_alt_text_paints_over_link_color() {
    let colors = Colors::default();
    let (_, layout) = highlight("![alt *it*](u.png)");

    assert_eq!(layout.format_at(0, 0).unwrap().format.foreground, Some(colors.link));
    assert_eq!(layout.format_at(0, 14).unwrap().format.foreground, Some(colors.link));
    assert_eq!(layout.format_at(0, 2).unwrap().format.foreground, Some(colors.text));
    assert!(layout.format_at(0, 7).unwrap().format.is_italic());
}

#[test]
fn test_strikethrough_sets_font_flag() {
    let (_, layout) = highlight("~~gone~~ kept");

    assert!(layout.format_at(0, 3).unwrap().format.is_strikethrough());
    assert!(!layout.format_at(0, 10).unwrap().format.is_strikethrough());
    assert!(layout.format_at(0, 0).is_none());
}

#[test]
fn test_math_rules_and_breaks_are_not_painted() {
    let (_, layout) = highlight("---\n");
    assert!(layout.formats(0).is_empty());

    let (_, layout) = highlight("$x$ a");
    assert!(layout.format_at(0, 1).is_none());
    assert!(layout.format_at(0, 4).is_some());

    let (_, layout) = highlight("a\\\nb");
    assert_eq!(layout.formats(0).len(), 1);
    assert!(layout.format_at(0, 1).is_none());
}
