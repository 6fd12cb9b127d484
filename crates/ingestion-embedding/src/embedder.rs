use std::sync::Arc;

use async_trait::async_trait;
use blake3::Hasher;

use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;

/// Turns one text into one fixed-width vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Width of every vector returned by [`Embedder::embed`].
    fn dimensions(&self) -> usize;

    fn model_id(&self) -> &str;
}

pub type SharedEmbedder = Arc<dyn Embedder>;

/// Offline embedder deriving vectors from a blake3 digest of the model id
/// and the text. Identical inputs always produce identical vectors.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    config: EmbeddingConfig,
}

impl HashEmbedder {
    #[must_use]
    pub const fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    fn vector_for_text(&self, text: &str) -> Vec<f32> {
        let mut hasher = Hasher::new();
        hasher.update(self.config.model_id.as_bytes());
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();
        let bytes = hash.as_bytes();
        let mut vector = Vec::with_capacity(self.config.dimensions);
        let mut idx = 0usize;
        while vector.len() < self.config.dimensions {
            let b1 = u16::from(bytes[idx % bytes.len()]);
            let b2 = u16::from(bytes[(idx + 1) % bytes.len()]);
            let combined = (b1 << 8) | b2;
            vector.push(f32::from(combined) / f32::from(u16::MAX));
            idx += 2;
        }
        if self.config.normalize {
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                vector.iter_mut().for_each(|v| *v /= norm);
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.config.dimensions == 0 {
            return Err(EmbeddingError::InvalidDimensions);
        }
        Ok(self.vector_for_text(text))
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}
