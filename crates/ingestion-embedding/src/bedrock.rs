use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::embedder::Embedder;
use crate::error::EmbeddingError;

const JSON: &str = "application/json";

/// Output width of Titan models that do not take a `dimensions` option.
const FIXED_WIDTH_MODELS: &[(&str, usize)] = &[
    ("amazon.titan-embed-text-v1", 1536),
    ("amazon.titan-embed-g1-text-02", 1536),
];

fn native_dimensions(model_id: &str) -> Option<usize> {
    FIXED_WIDTH_MODELS
        .iter()
        .find(|(prefix, _)| model_id.starts_with(prefix))
        .map(|&(_, width)| width)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalize: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    embedding: Vec<f32>,
}

/// Titan text embeddings through Bedrock `InvokeModel`.
#[derive(Debug, Clone)]
pub struct BedrockEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

impl BedrockEmbedder {
    #[must_use]
    pub const fn new(client: Client, config: EmbeddingConfig) -> Self {
        Self { client, config }
    }

    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: EmbeddingConfig) -> Self {
        Self::new(Client::new(sdk_config), config)
    }

    /// Only Titan v2 accepts the `dimensions` and `normalize` options.
    fn accepts_options(&self) -> bool {
        self.config.model_id.starts_with("amazon.titan-embed-text-v2")
    }

    pub fn request_body(&self, text: &str) -> Result<Vec<u8>, EmbeddingError> {
        let options = self.accepts_options();
        let request = TitanRequest {
            input_text: text,
            dimensions: options.then_some(self.config.dimensions),
            normalize: options.then_some(self.config.normalize),
        };
        serde_json::to_vec(&request).map_err(|e| EmbeddingError::Decode(e.to_string()))
    }

    pub fn decode_response(bytes: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
        let response: TitanResponse =
            serde_json::from_slice(bytes).map_err(|e| EmbeddingError::Decode(e.to_string()))?;
        Ok(response.embedding)
    }
}

#[async_trait]
impl Embedder for BedrockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.dimensions() == 0 {
            return Err(EmbeddingError::InvalidDimensions);
        }
        let body = self.request_body(text)?;
        let output = self
            .client
            .invoke_model()
            .model_id(&self.config.model_id)
            .content_type(JSON)
            .accept(JSON)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|err| EmbeddingError::Remote(DisplayErrorContext(&err).to_string()))?;
        let vector = Self::decode_response(output.body().as_ref())?;
        debug!(model = %self.config.model_id, dimensions = vector.len(), "embedded text");
        Ok(vector)
    }

    /// Fixed-width models report their native width; the configured width
    /// applies only to models that accept it.
    fn dimensions(&self) -> usize {
        if self.accepts_options() {
            return self.config.dimensions;
        }
        native_dimensions(&self.config.model_id).unwrap_or(self.config.dimensions)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}
