//! Analysis log error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid storage response: {0}")]
    InvalidResponse(String),
}
