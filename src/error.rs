//! Error types for the tracking pipeline.

use thiserror::Error;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by ingest, configuration and output. The engine itself
/// has no recoverable error conditions; its invariant violations abort the
/// run instead of appearing here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed input at {timestamp}: {reason}")]
    MalformedInput { timestamp: String, reason: String },

    #[error("unparseable timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
