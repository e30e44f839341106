//! [`SyntaxProcessor`] that re-parses markdown and runs the [`SyntaxVisitor`] on every change.

use crate::colors::Colors;
use crate::document::Document;
use crate::parser::parse;
use crate::visitor::SyntaxVisitor;
use md_editor_core::{FontSpec, SyntaxProcessor, TextLayout};
use tracing::debug;

/// Markdown highlighting for an [`Editor`](md_editor_core::Editor).
///
/// Holds the document of the last parse; it is replaced wholesale on every pass.
#[derive(Debug, Clone, Default)]
pub struct MarkdownProcessor {
    visitor: SyntaxVisitor,
    colors: Colors,
    document: Option<Document>,
}

impl MarkdownProcessor {
    /// Create a processor highlighting with `colors`.
    pub fn new(colors: Colors) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }

    /// The current color policy.
    pub fn colors(&self) -> &Colors {
        &self.colors
    }

    /// Replace the color policy. Returns `true` if it differs from the current one, in which case
    /// the caller should re-highlight.
    pub fn set_colors(&mut self, colors: Colors) -> bool {
        if self.colors == colors {
            return false;
        }
        self.colors = colors;
        true
    }

    /// Document of the last pass.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The visitor, holding the ranges of the last pass.
    pub fn visitor(&self) -> &SyntaxVisitor {
        &self.visitor
    }
}

impl SyntaxProcessor for MarkdownProcessor {
    fn process(&mut self, text: &str, doc_name: &str, layout: &mut TextLayout) {
        let document = self.document.insert(parse(text, doc_name));

        if self.colors.enabled {
            self.visitor.highlight(Some(&*document), &self.colors, layout);
        } else {
            debug!("syntax highlighting disabled, clearing formats");
            self.visitor.clear_highlighting(layout);
        }
    }

    fn clear(&mut self, layout: &mut TextLayout) {
        self.visitor.clear_highlighting(layout);
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.visitor.set_font(font);
    }
}
