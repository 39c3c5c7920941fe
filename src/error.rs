//! Error types for the extraction library.
//!
//! Only conditions that make a whole call meaningless are errors. Empty
//! documents and statistics over too few samples are handled in-band.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, extracting or formatting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be decoded as a PDF document.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// IO error while reading the source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration values violate an invariant
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The formatter rejected its options or input
    #[error("Format error: {0}")]
    Format(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for Error {
    fn from(e: lopdf::Error) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}
