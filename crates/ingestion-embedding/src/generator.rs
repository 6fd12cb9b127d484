use futures::stream::{self, StreamExt, TryStreamExt};
use ingestion_dataset::{read_csv, write_csv, CsvOptions, DatasetError, DEFAULT_VECTOR_COLUMN};
use ingestion_parameters::{Dataset, ScalarValue};
use storage_objects::{ObjectLocation, SharedObjectStore};
use tracing::{info, instrument};

use crate::embedder::SharedEmbedder;
use crate::error::EmbeddingError;

pub const DEFAULT_TEXT_COLUMN: &str = "product_name";

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub input: ObjectLocation,
    pub output: ObjectLocation,
    /// Column whose text is embedded.
    pub text_column: String,
    /// Column appended with the vectors.
    pub embedding_column: String,
    /// In-flight embedding requests; results keep row order.
    pub concurrency: usize,
    pub csv: CsvOptions,
}

impl GenerationConfig {
    pub fn new(input: ObjectLocation, output: ObjectLocation) -> Self {
        Self {
            input,
            output,
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            embedding_column: DEFAULT_VECTOR_COLUMN.to_string(),
            concurrency: 1,
            csv: CsvOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub rows: usize,
    pub model_id: String,
    pub dimensions: usize,
    pub output: ObjectLocation,
    /// blake3 digest of the written CSV.
    pub fingerprint: String,
}

pub struct EmbeddingGenerator {
    embedder: SharedEmbedder,
    store: SharedObjectStore,
}

impl EmbeddingGenerator {
    #[must_use]
    pub fn new(embedder: SharedEmbedder, store: SharedObjectStore) -> Self {
        Self { embedder, store }
    }

    #[instrument(skip(self, config), fields(input = %config.input, output = %config.output))]
    pub async fn run(&self, config: &GenerationConfig) -> Result<GenerationReport, EmbeddingError> {
        let bytes = self.store.get(&config.input).await?;
        let dataset = read_csv(&bytes, &config.csv)?;
        info!(rows = dataset.len(), model = self.embedder.model_id(), "embedding catalog");

        let augmented = self.augment(dataset, config).await?;
        let output = write_csv(&augmented, &config.csv)?;
        let fingerprint = blake3::hash(&output).to_hex().to_string();
        self.store.put(&config.output, output).await?;
        info!(rows = augmented.len(), "wrote embeddings csv");

        Ok(GenerationReport {
            rows: augmented.len(),
            model_id: self.embedder.model_id().to_string(),
            dimensions: self.embedder.dimensions(),
            output: config.output.clone(),
            fingerprint,
        })
    }

    /// Set one embedding per row, computed from `config.text_column`. An
    /// existing embedding column is replaced.
    pub async fn augment(
        &self,
        mut dataset: Dataset,
        config: &GenerationConfig,
    ) -> Result<Dataset, EmbeddingError> {
        let texts = dataset
            .column(&config.text_column)
            .ok_or_else(|| EmbeddingError::MissingColumn(config.text_column.clone()))?
            .enumerate()
            .map(|(row, value)| match value {
                ScalarValue::Null => Err(EmbeddingError::MissingText { row }),
                ScalarValue::Text(text) => Ok(text.clone()),
                other => Ok(other.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected = self.embedder.dimensions();
        let embedder = &self.embedder;
        let vectors: Vec<ScalarValue> = stream::iter(texts)
            .map(|text| async move {
                let vector = embedder.embed(&text).await?;
                if vector.len() != expected {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
                Ok(ScalarValue::from(vector))
            })
            .buffered(config.concurrency.max(1))
            .try_collect()
            .await?;

        dataset
            .set_column(config.embedding_column.clone(), vectors)
            .map_err(DatasetError::from)?;
        Ok(dataset)
    }
}
