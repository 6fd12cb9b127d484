use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("invalid object location: {0}")]
    InvalidLocation(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("remote storage error: {0}")]
    Remote(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
