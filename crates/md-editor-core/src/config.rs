//! Editing-surface configuration.
//!
//! Persistence is the host's business; this type only knows how to go to and from JSON.

use crate::error::EditorError;
use crate::format::{Color, FontSpec};
use serde::{Deserialize, Serialize};

/// Default width of a tab, in characters.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Default current-line band color (a light yellow).
pub const DEFAULT_CURRENT_LINE_COLOR: Color = Color::rgb(255, 255, 153);

/// Default search-match background color.
pub const DEFAULT_SEARCH_COLOR: Color = Color::rgb(255, 200, 0);

/// View and overlay settings of an [`Editor`](crate::Editor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor font.
    pub font: FontSpec,
    /// Show the line-number gutter.
    pub show_line_numbers: bool,
    /// Show markers for tabs, spaces and line separators.
    pub show_unprintable: bool,
    /// Tab width in characters.
    pub tab_width: usize,
    /// Background of the current-line band.
    pub current_line_color: Color,
    /// Background of search matches.
    pub search_color: Color,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            show_line_numbers: true,
            show_unprintable: false,
            tab_width: DEFAULT_TAB_WIDTH,
            current_line_color: DEFAULT_CURRENT_LINE_COLOR,
            search_color: DEFAULT_SEARCH_COLOR,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r##"{ "show_line_numbers": false, "search_color": "#00ff00" }"##)
            .unwrap();
        assert!(!config.show_line_numbers);
        assert_eq!(config.search_color, Color::rgb(0, 255, 0));
        assert_eq!(config.tab_width, DEFAULT_TAB_WIDTH);
        assert_eq!(config.font, FontSpec::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EditorConfig {
            font: FontSpec::new("Fira Code", 12.0),
            show_unprintable: true,
            ..EditorConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        let err = EditorConfig::from_json(r#"{ "search_color": "green" }"#).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }
}
