//! Error handling for the search harness
//!
//! One thiserror enum covers every failure the library can report. Binaries
//! wrap these with anyhow context at the edges.

use thiserror::Error;

use search_types::UnknownLabel;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot cycle over an empty collection")]
    EmptyCollection,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error(
        "The header and records do not all have the same number of elements. \
         expected=[ {expected} ], received=[ {received} ], index=[ {index} ]"
    )]
    FieldCountMismatch {
        expected: usize,
        received: usize,
        index: usize,
    },

    #[error("At least one of the includeOnly parameter values was not recognized: {0}")]
    UnknownResultType(#[from] UnknownLabel),

    #[error("Invalid attr parameter '{param}': {reason}")]
    InvalidAttrParam { param: String, reason: &'static str },

    #[error("At least one search criteria attribute must be provided")]
    MissingCriteria,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search worker thread panicked: {0}")]
    WorkerPanicked(String),
}

impl HarnessError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        HarnessError::InvalidArgument(message.into())
    }
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
