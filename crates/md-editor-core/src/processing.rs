//! The hook through which a parser-backed highlighter plugs into the editing surface.
//!
//! External crates (`md-editor-*`) implement [`SyntaxProcessor`]; the [`Editor`](crate::Editor)
//! calls it synchronously after every buffer mutation. A processor re-parses the full text and
//! replaces the syntax formats of the render layer in one atomic commit.

use crate::format::FontSpec;
use crate::layout::TextLayout;
use std::fmt::Debug;

/// A full-buffer syntax highlighter.
pub trait SyntaxProcessor: Debug {
    /// Re-parse `text` and replace the syntax formats in `layout`.
    ///
    /// `layout` already matches the lines of `text` when this is called.
    fn process(&mut self, text: &str, doc_name: &str, layout: &mut TextLayout);

    /// Remove every syntax format this processor committed to `layout`.
    fn clear(&mut self, layout: &mut TextLayout);

    /// Set the base font used for syntax formats.
    fn set_font(&mut self, font: &FontSpec);
}
