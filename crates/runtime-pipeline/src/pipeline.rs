use std::sync::Arc;

use ingestion_embedding::{
    BedrockEmbedder, EmbeddingGenerator, GenerationReport, HashEmbedder, SharedEmbedder,
};
use ingestion_import::{ImportReport, ProductImporter};
use serde::Deserialize;
use serde_json::Value;
use storage_objects::{LocalObjectStore, RoutingObjectStore, S3ObjectStore, SharedObjectStore};
use storage_vector::{
    Product, ProductDetail, ProductQueries, RdsDataExecutor, SharedExecutor, DEFAULT_SEARCH_LIMIT,
};
use tracing::{info, instrument};

use crate::aws::load_sdk_config;
use crate::config::{EmbedderKind, PipelineConfig};
use crate::error::PipelineError;

/// The three stages wired to their collaborators.
pub struct Pipeline {
    config: PipelineConfig,
    store: SharedObjectStore,
    embedder: SharedEmbedder,
    executor: Option<SharedExecutor>,
}

impl Pipeline {
    /// Build AWS-backed collaborators from `config`. Bucket objects are served
    /// from `storage.local_root` instead of S3 when it is set. The statement
    /// executor is built only when the database settings are complete.
    pub async fn connect(config: PipelineConfig) -> Self {
        let sdk = load_sdk_config(config.region.clone()).await;
        let store: SharedObjectStore = match &config.storage.local_root {
            Some(root) => Arc::new(RoutingObjectStore::new(
                None,
                LocalObjectStore::with_root(root),
            )),
            None => Arc::new(RoutingObjectStore::new(
                Some(S3ObjectStore::from_sdk_config(&sdk)),
                LocalObjectStore::new(),
            )),
        };
        let embedder: SharedEmbedder = match config.embedding.provider {
            EmbedderKind::Bedrock => Arc::new(BedrockEmbedder::from_sdk_config(
                &sdk,
                config.embedding_config(),
            )),
            EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.embedding_config())),
        };
        let executor = config.data_api_target().ok().map(|target| {
            Arc::new(
                RdsDataExecutor::from_sdk_config(&sdk, target)
                    .with_array_binding(config.array_binding()),
            ) as SharedExecutor
        });
        info!(
            region = ?sdk.region(),
            model = %config.embedding.model_id,
            database = executor.is_some(),
            "pipeline connected"
        );
        Self {
            config,
            store,
            embedder,
            executor,
        }
    }

    /// Assemble a pipeline from ready-made collaborators.
    pub fn from_parts(
        config: PipelineConfig,
        store: SharedObjectStore,
        embedder: SharedEmbedder,
        executor: Option<SharedExecutor>,
    ) -> Self {
        Self {
            config,
            store,
            embedder,
            executor,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The executor shared by import and queries. Missing database settings
    /// are reported as configuration errors.
    pub fn executor(&self) -> Result<SharedExecutor, PipelineError> {
        if let Some(executor) = &self.executor {
            return Ok(executor.clone());
        }
        self.config.data_api_target()?;
        Err(PipelineError::Unavailable("statement executor"))
    }

    #[instrument(skip(self))]
    pub async fn generate(&self) -> Result<GenerationReport, PipelineError> {
        let config = self.config.generation_config()?;
        let generator = EmbeddingGenerator::new(self.embedder.clone(), self.store.clone());
        Ok(generator.run(&config).await?)
    }

    #[instrument(skip(self))]
    pub async fn import(&self) -> Result<ImportReport, PipelineError> {
        let config = self.config.import_config()?;
        let importer = ProductImporter::new(self.store.clone(), self.executor()?);
        Ok(importer.run(&config).await?)
    }

    pub fn queries(&self) -> Result<ProductQueries, PipelineError> {
        Ok(ProductQueries::new(self.embedder.clone(), self.executor()?))
    }

    pub async fn search(&self, text: &str, limit: usize) -> Result<Vec<Product>, PipelineError> {
        Ok(self.queries()?.search(text, limit).await?)
    }

    pub async fn get_product(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductDetail>, PipelineError> {
        Ok(self.queries()?.get_product(product_id).await?)
    }

    pub async fn handle_query_event(&self, event: Value) -> Result<Value, PipelineError> {
        handle_query_event(&self.queries()?, event).await
    }
}

#[derive(Debug, Deserialize)]
struct QueryEvent {
    arguments: QueryArguments,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QueryArguments {
    query: Option<String>,
    #[serde(alias = "id")]
    product_id: Option<String>,
    limit: Option<usize>,
}

/// Answer a resolver-style event.
///
/// `{"arguments": {"query": "...", "limit": n}}` returns the matching products
/// as a JSON array; `{"arguments": {"product_id": "..."}}` returns one product
/// with its related products, or `null`.
pub async fn handle_query_event(
    queries: &ProductQueries,
    event: Value,
) -> Result<Value, PipelineError> {
    let event: QueryEvent =
        serde_json::from_value(event).map_err(|e| PipelineError::InvalidEvent(e.to_string()))?;
    let arguments = event.arguments;
    let response = if let Some(product_id) = arguments.product_id {
        serde_json::to_value(queries.get_product(&product_id).await?)
    } else if let Some(query) = arguments.query {
        let limit = arguments.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        serde_json::to_value(queries.search(&query, limit).await?)
    } else {
        return Err(PipelineError::InvalidEvent(
            "expected `arguments.query` or `arguments.product_id`".into(),
        ));
    };
    response.map_err(|e| PipelineError::Encode(e.to_string()))
}
