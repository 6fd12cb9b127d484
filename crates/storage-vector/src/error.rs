use ingestion_embedding::EmbeddingError;
use ingestion_parameters::ParameterError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    /// The service asked the caller to slow down; the statement may be retried.
    #[error("statement throttled: {0}")]
    Throttled(String),
    #[error("statement execution failed: {0}")]
    Remote(String),
    #[error("parameter `{name}` cannot be bound: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl ExecutorError {
    #[must_use]
    pub const fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled(_))
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: usize, max: usize },
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("failed to decode formatted records: {0}")]
    Decode(String),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
}
