use ingestion_dataset::DatasetError;
use storage_objects::ObjectStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding dimensions must be non-zero")]
    InvalidDimensions,
    #[error("embedder returned {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("row {row} has no text to embed")]
    MissingText { row: usize },
    #[error("column `{0}` not present in dataset")]
    MissingColumn(String),
    #[error("embedding service error: {0}")]
    Remote(String),
    #[error("failed to decode embedding payload: {0}")]
    Decode(String),
    #[error(transparent)]
    Store(#[from] ObjectStoreError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
