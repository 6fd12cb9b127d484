//! Flags shared by every catalog binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use runtime_pipeline::{init_tracing, ConfigOverrides, EmbedderKind, LogFormat, PipelineConfig};

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Pipeline settings file (TOML).
    #[arg(long, env = "CATALOG_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log output: text or json.
    #[arg(long, env = "CATALOG_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Bucket receiving the embeddings CSV.
    #[arg(long, env = "BUCKET_NAME")]
    pub bucket: Option<String>,

    /// Source catalog (`s3://bucket/key` or a path).
    #[arg(long, env = "INPUT_BUCKET_URL")]
    pub input_url: Option<String>,

    #[arg(long, env = "EMBEDDINGS_CSV_NAME")]
    pub embeddings_name: Option<String>,

    #[arg(long, env = "CLUSTER_ARN")]
    pub cluster_arn: Option<String>,

    #[arg(long, env = "SECRET_ARN")]
    pub secret_arn: Option<String>,

    #[arg(long, env = "DATABASE_NAME")]
    pub database: Option<String>,

    #[arg(long, env = "EMBED_MODEL_ID")]
    pub model_id: Option<String>,

    /// Serve bucket objects from this directory instead of S3.
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,

    /// Use deterministic offline embeddings instead of Bedrock.
    #[arg(long)]
    pub hash_embedder: bool,

    /// Embedding width.
    #[arg(long)]
    pub dimensions: Option<usize>,
}

impl CommonArgs {
    /// Start logging, then resolve the file and flag settings.
    pub fn load(&self) -> Result<PipelineConfig> {
        init_tracing(self.log_format);
        let mut config = PipelineConfig::load(self.config.as_deref())
            .context("loading pipeline configuration")?
            .with_overrides(ConfigOverrides {
                region: self.region.clone(),
                bucket: self.bucket.clone(),
                input_url: self.input_url.clone(),
                embeddings_name: self.embeddings_name.clone(),
                cluster_arn: self.cluster_arn.clone(),
                secret_arn: self.secret_arn.clone(),
                database: self.database.clone(),
                model_id: self.model_id.clone(),
            });
        if let Some(root) = &self.local_root {
            config.storage.local_root = Some(root.clone());
        }
        if self.hash_embedder {
            config.embedding.provider = EmbedderKind::Hash;
        }
        if let Some(dimensions) = self.dimensions {
            config.embedding.dimensions = dimensions;
        }
        Ok(config)
    }
}
