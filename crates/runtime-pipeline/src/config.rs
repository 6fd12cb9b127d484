//! Pipeline settings: an optional TOML file, then command-line/environment
//! overrides. Required values are checked when a stage asks for them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ingestion_embedding::{
    EmbeddingConfig, GenerationConfig, DEFAULT_DIMENSIONS, DEFAULT_MODEL_ID, DEFAULT_TEXT_COLUMN,
};
use ingestion_import::{ImportConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use storage_objects::{ObjectLocation, ObjectStoreError};
use storage_vector::{ArrayBinding, DataApiTarget};
use thiserror::Error;

pub const DEFAULT_EMBEDDINGS_NAME: &str = "embeddings.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required setting `{key}`")]
    Missing { key: &'static str },
    #[error(transparent)]
    Location(#[from] ObjectStoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub region: Option<String>,
    pub storage: StorageSection,
    pub embedding: EmbeddingSection,
    pub database: DatabaseSection,
    pub import: ImportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    /// Bucket receiving the embeddings CSV.
    pub bucket: Option<String>,
    /// Source catalog, `s3://bucket/key` or a local path.
    pub input_url: Option<String>,
    pub embeddings_name: String,
    /// Serve bucket objects from this directory instead of S3.
    pub local_root: Option<PathBuf>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            bucket: None,
            input_url: None,
            embeddings_name: DEFAULT_EMBEDDINGS_NAME.to_string(),
            local_root: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    #[default]
    Bedrock,
    /// Deterministic offline vectors.
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingSection {
    pub provider: EmbedderKind,
    pub model_id: String,
    pub dimensions: usize,
    pub normalize: bool,
    pub text_column: String,
    pub concurrency: usize,
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        Self {
            provider: EmbedderKind::Bedrock,
            model_id: DEFAULT_MODEL_ID.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            normalize: true,
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub cluster_arn: Option<String>,
    pub secret_arn: Option<String>,
    pub database: Option<String>,
    /// Bind vectors as `arrayValue` instead of pgvector text.
    pub native_arrays: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSection {
    pub pace_ms: u64,
    pub create_extension: bool,
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub parameter_workers: usize,
}

impl Default for ImportSection {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            pace_ms: 100,
            create_extension: false,
            max_attempts: retry.max_attempts,
            backoff_ms: retry.backoff_ms,
            parameter_workers: 1,
        }
    }
}

/// Values supplied on the command line or through the environment; each one
/// that is set replaces the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub input_url: Option<String>,
    pub embeddings_name: Option<String>,
    pub cluster_arn: Option<String>,
    pub secret_arn: Option<String>,
    pub database: Option<String>,
    pub model_id: Option<String>,
}

fn required(value: Option<&String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .ok_or(ConfigError::Missing { key })
}

impl PipelineConfig {
    /// Read `path` when given; otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        fn set(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        set(&mut self.region, overrides.region);
        set(&mut self.storage.bucket, overrides.bucket);
        set(&mut self.storage.input_url, overrides.input_url);
        set(&mut self.database.cluster_arn, overrides.cluster_arn);
        set(&mut self.database.secret_arn, overrides.secret_arn);
        set(&mut self.database.database, overrides.database);
        if let Some(name) = overrides.embeddings_name {
            self.storage.embeddings_name = name;
        }
        if let Some(model_id) = overrides.model_id {
            self.embedding.model_id = model_id;
        }
        self
    }

    pub fn input_location(&self) -> Result<ObjectLocation, ConfigError> {
        let raw = required(self.storage.input_url.as_ref(), "INPUT_BUCKET_URL")?;
        Ok(ObjectLocation::parse(&raw)?)
    }

    /// `s3://<bucket>/<embeddings_name>`.
    pub fn embeddings_location(&self) -> Result<ObjectLocation, ConfigError> {
        let bucket = required(self.storage.bucket.as_ref(), "BUCKET_NAME")?;
        if self.storage.embeddings_name.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "EMBEDDINGS_CSV_NAME",
            });
        }
        Ok(ObjectLocation::s3(bucket, self.storage.embeddings_name.clone()))
    }

    pub fn data_api_target(&self) -> Result<DataApiTarget, ConfigError> {
        Ok(DataApiTarget::new(
            required(self.database.cluster_arn.as_ref(), "CLUSTER_ARN")?,
            required(self.database.secret_arn.as_ref(), "SECRET_ARN")?,
            required(self.database.database.as_ref(), "DATABASE_NAME")?,
        ))
    }

    #[must_use]
    pub fn array_binding(&self) -> ArrayBinding {
        if self.database.native_arrays {
            ArrayBinding::Native
        } else {
            ArrayBinding::Literal
        }
    }

    #[must_use]
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig::new(self.embedding.model_id.clone(), self.embedding.dimensions)
            .with_normalize(self.embedding.normalize)
    }

    pub fn generation_config(&self) -> Result<GenerationConfig, ConfigError> {
        let mut config = GenerationConfig::new(self.input_location()?, self.embeddings_location()?);
        config.text_column = self.embedding.text_column.clone();
        config.concurrency = self.embedding.concurrency.max(1);
        Ok(config)
    }

    pub fn import_config(&self) -> Result<ImportConfig, ConfigError> {
        let mut config = ImportConfig::new(self.embeddings_location()?);
        config.pace = Duration::from_millis(self.import.pace_ms);
        config.create_extension = self.import.create_extension;
        config.retry = RetryPolicy {
            max_attempts: self.import.max_attempts,
            backoff_ms: self.import.backoff_ms,
        };
        config.parameter_workers = self.import.parameter_workers.max(1);
        Ok(config)
    }
}
