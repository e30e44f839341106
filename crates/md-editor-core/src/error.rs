use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by editing-surface operations.
pub enum EditorError {
    #[error("offset {offset} is out of bounds (document has {len} chars)")]
    /// A character offset pointed past the end of the buffer.
    OffsetOutOfBounds {
        /// The offending offset.
        offset: usize,
        /// Buffer length in chars.
        len: usize,
    },

    #[error("invalid range {start}..{end}")]
    /// A range had `start > end`.
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
    },

    #[error("search error: {0}")]
    /// Building a search query failed.
    Search(#[from] SearchError),

    #[error("config error: {0}")]
    /// The editor configuration could not be (de)serialized.
    Config(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
/// Errors produced while compiling a search needle.
pub enum SearchError {
    #[error("cannot compile search pattern: {0}")]
    /// The escaped needle could not be compiled (e.g. it exceeds the regex size limit).
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors produced while parsing a `#rrggbb` color string.
pub enum ColorParseError {
    #[error("color '{0}' must start with '#'")]
    /// The leading `#` is missing.
    MissingHash(String),

    #[error("color '{0}' must have 6 or 8 hex digits")]
    /// Wrong number of digits.
    InvalidLength(String),

    #[error("color '{0}' contains a non-hex digit")]
    /// A digit is not hexadecimal.
    InvalidDigit(String),
}
