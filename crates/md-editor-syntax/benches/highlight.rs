use criterion::{Criterion, black_box, criterion_group, criterion_main};
use md_editor_core::{LineIndex, TextLayout};
use md_editor_syntax::{Colors, SyntaxVisitor, parse};

fn sample(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!(
            "## Section {i}\n\n\
             Some *emphasis*, **strong** text, `code` and a [link](http://example.com/{i}).\n\n\
             - first item\n- second item with ~~strike~~\n\n\
             > a quote[^n{i}]\n\n\
             | a | b |\n|---|---|\n| {i} | x |\n\n\
             ```rust\nfn f() -> usize {{ {i} }}\n```\n\n\
             [^n{i}]: Footnote {i}.\n\n"
        ));
    }
    text
}

fn bench_highlight(c: &mut Criterion) {
    let text = sample(500);
    let index = LineIndex::from_text(&text);
    let colors = Colors::default();

    c.bench_function("parse", |b| b.iter(|| parse(black_box(&text), "bench.md")));

    c.bench_function("parse_and_highlight", |b| {
        let mut layout = TextLayout::from_line_index(&index);
        let mut visitor = SyntaxVisitor::new();
        b.iter(|| {
            let doc = parse(black_box(&text), "bench.md");
            visitor.highlight(Some(&doc), &colors, &mut layout);
        })
    });
}

criterion_group!(benches, bench_highlight);
criterion_main!(benches);
