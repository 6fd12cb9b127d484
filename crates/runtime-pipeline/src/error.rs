use ingestion_embedding::EmbeddingError;
use ingestion_import::ImportError;
use storage_vector::QueryError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("invalid query event: {0}")]
    InvalidEvent(String),
    #[error("failed to encode response: {0}")]
    Encode(String),
    #[error("{0} is not available in this pipeline")]
    Unavailable(&'static str),
}
