use ingestion_dataset::DatasetError;
use ingestion_parameters::ParameterError;
use storage_objects::ObjectStoreError;
use storage_vector::ExecutorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Store(#[from] ObjectStoreError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error("input is missing table column `{0}`")]
    MissingColumn(String),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("statement still throttled after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: ExecutorError,
    },
}
