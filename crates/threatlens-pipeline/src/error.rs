use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Entity recognition failed: {0}")]
    Recognition(#[from] threatlens_ner::NerError),

    #[error("Risk classification failed: {0}")]
    Classification(#[from] threatlens_risk::ClassifierError),

    #[error("Analysis log error: {0}")]
    Storage(#[from] threatlens_db::DbError),

    #[error("Capabilities unavailable: {0}")]
    CapabilitiesUnavailable(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
