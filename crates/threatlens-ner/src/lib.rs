//! Named entity extraction for threat reports.
//!
//! Combines spans from an external recognition model with deterministic
//! pattern rules (weapons, callsigns) and a label-correction table for
//! tokens the model is known to mislabel.

mod corrections;
mod extractor;
mod patterns;
mod recognizer;

pub use corrections::corrected_label;
pub use extractor::EntityExtractor;
pub use patterns::{custom_patterns, CustomPattern};
pub use recognizer::{EntityRecognizer, HttpRecognizer, RecognizedSpan};

pub type Result<T> = std::result::Result<T, NerError>;

#[derive(Debug, thiserror::Error)]
pub enum NerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Recognizer API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Recognizer unavailable: {0}")]
    Unavailable(String),
}
