//! Error types of the syntax crate.

use thiserror::Error;

/// Errors raised while loading or saving a [`Colors`](crate::Colors) policy.
#[derive(Debug, Error)]
pub enum ColorsError {
    /// The JSON is malformed or a field has the wrong shape (e.g. a bad color string).
    #[error("invalid color policy: {0}")]
    Json(#[from] serde_json::Error),
}
