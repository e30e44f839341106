#![warn(missing_docs)]
//! md-editor Core - headless editing surface for a markdown editor
//!
//! # Overview
//!
//! `md-editor-core` owns the live text buffer of a markdown editor and everything derived from it
//! that is not markup specific: the render layer that carries syntax formats, the per-pass
//! format accumulator, the current-line and search overlays, and the line-number gutter. It does
//! not paint; the host reads composed [`FormatRange`]s per line and draws them.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (editing surface)                   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  SyntaxProcessor hook (full re-parse)       │  ← md-editor-syntax
//! ├─────────────────────────────────────────────┤
//! │  Overlays (current line, search matches)    │  ← Paint-time composition
//! ├─────────────────────────────────────────────┤
//! │  FormatAccumulator → RenderLayer            │  ← Atomic per-pass commit
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use md_editor_core::{Editor, EditorConfig, Position};
//!
//! let mut editor = Editor::plain("first line\nsecond line", EditorConfig::default());
//!
//! editor.set_cursor(Position::new(1, 3));
//! assert_eq!(editor.current_line(), Some(1));
//!
//! assert_eq!(editor.highlight_search("line").unwrap(), 2);
//! assert_eq!(editor.search_ranges(0).len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based text buffer
//! - [`format`] - colors, fonts, spans and format ranges
//! - [`layout`] - render blocks (one per line) and the [`RenderLayer`] trait
//! - [`accumulator`] - per-pass format accumulation and atomic commit
//! - [`overlay`] - current-line band and search overlay
//! - [`gutter`] - line-number gutter width, pixel → line lookup, render options
//! - [`processing`] - the [`SyntaxProcessor`] hook
//! - [`editor`] - the editing surface

pub mod accumulator;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod gutter;
pub mod layout;
pub mod line_index;
pub mod overlay;
pub mod processing;
pub mod search;

pub use accumulator::FormatAccumulator;
pub use config::EditorConfig;
pub use editor::{Editor, PlainText, Position};
pub use error::{ColorParseError, EditorError, SearchError};
pub use format::{CharFormat, Color, FontSpec, FormatRange, LineSegment, Span, TextStyle};
pub use gutter::{FontMetrics, RenderOptions};
pub use layout::{RenderBlock, RenderLayer, TextLayout};
pub use line_index::LineIndex;
pub use overlay::{CurrentLineBand, SearchOverlay};
pub use processing::SyntaxProcessor;
pub use search::{LiteralQuery, SearchMatch};
