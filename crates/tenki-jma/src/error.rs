//! JMA-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JmaError {
    /// Transport failure or non-success HTTP status.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The payload did not have the expected shape.
    #[error("Format error: {0}")]
    Format(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl JmaError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
