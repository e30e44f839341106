#![warn(missing_docs)]
//! md-editor Syntax - markdown highlighting for `md-editor-core`
//!
//! # Overview
//!
//! This crate turns markdown text into syntax formats on a [`md_editor_core::TextLayout`]:
//!
//! 1. [`parser::parse`] builds a position-tagged [`Document`] with `pulldown-cmark`.
//! 2. [`SyntaxVisitor::highlight`] walks it with a [`Colors`] policy and commits the formats in
//!    one pass.
//! 3. [`MarkdownProcessor`] glues both into the editor's
//!    [`SyntaxProcessor`](md_editor_core::SyntaxProcessor) hook.
//!
//! # Example
//!
//! ```rust
//! use md_editor_core::{Editor, EditorConfig};
//! use md_editor_syntax::{Colors, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(Colors::default());
//! let editor = Editor::new("# Title\n\nSome *text*.", EditorConfig::default(), processor);
//!
//! let heading = &editor.syntax_formats(0)[0];
//! assert_eq!(heading.format.foreground, Some(Colors::default().heading));
//! assert!(heading.format.is_bold());
//! ```

pub mod colors;
pub mod document;
pub mod error;
pub mod parser;
pub mod processor;
pub mod visitor;

pub use colors::Colors;
pub use document::{Document, Item, ItemType};
pub use error::ColorsError;
pub use parser::parse;
pub use processor::MarkdownProcessor;
pub use visitor::SyntaxVisitor;
