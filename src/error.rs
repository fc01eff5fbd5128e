//! Error types for search and download operations.

use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur while searching for or acquiring images.
#[derive(Error, Debug)]
pub enum ImageError {
    /// Transport-level failure (connection, DNS, timeout).
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("request failed with HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Downloaded body exceeds the configured size ceiling.
    #[error("image size ({actual_mb:.2}MB) exceeds the maximum allowed size of {limit_mb}MB")]
    SizeLimit { actual_mb: f64, limit_mb: u64 },

    /// Decode, resize, or format-conversion failure.
    #[error("failed to transcode image: {0}")]
    Transcode(String),

    /// Directory creation or file write failure.
    #[error("failed to persist image: {0}")]
    Persist(#[source] std::io::Error),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        Self::Transcode(err.to_string())
    }
}
