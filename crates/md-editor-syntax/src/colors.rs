//! Color policy: one color per node category plus a global on/off switch.
//!
//! The policy is a plain value. It is handed to the highlighter on every pass and persisted by
//! whoever owns the application settings, through [`Colors::to_json`] / [`Colors::from_json`].

use crate::error::ColorsError;
use md_editor_core::Color;
use serde::{Deserialize, Serialize};

/// Per-category highlight colors.
///
/// Two policies are equal only if every field is equal; hosts compare the edited policy against
/// the current one to decide whether a re-highlight is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    /// Plain text runs.
    pub text: Color,
    /// Links, images and resolved footnote references.
    pub link: Color,
    /// List items.
    pub list: Color,
    /// Inline code spans.
    pub inline_code: Color,
    /// Fenced and indented code blocks.
    pub code: Color,
    /// Headings (always bold).
    pub heading: Color,
    /// Block quotes.
    pub blockquote: Color,
    /// Tables and their cells.
    pub table: Color,
    /// Footnote definitions.
    pub footnote: Color,
    /// Raw HTML blocks and inline tags.
    pub html: Color,
    /// Math expressions. Kept for hosts; math nodes are not painted.
    pub math: Color,
    /// When `false` no syntax formats are committed at all.
    pub enabled: bool,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            text: Color::BLUE,
            link: Color::GREEN,
            list: Color::GREEN,
            inline_code: Color::BLACK,
            code: Color::BLACK,
            heading: Color::DARK_BLUE,
            blockquote: Color::GRAY,
            table: Color::BLACK,
            footnote: Color::DARK_MAGENTA,
            html: Color::DARK_RED,
            math: Color::DARK_MAGENTA,
            enabled: true,
        }
    }
}

impl Colors {
    /// Default palette with highlighting switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Parse a policy from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ColorsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the policy to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ColorsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
