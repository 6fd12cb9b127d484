//! Embedding generation for product catalogs.
//!
//! An [`Embedder`] turns one text into one vector. The
//! [`EmbeddingGenerator`] reads a catalog CSV, embeds one text column per row
//! and writes the catalog back out with an `embedding` column appended.

mod bedrock;
mod config;
mod embedder;
mod error;
mod generator;

pub use bedrock::BedrockEmbedder;
pub use config::{EmbeddingConfig, DEFAULT_DIMENSIONS, DEFAULT_MODEL_ID};
pub use embedder::{Embedder, HashEmbedder, SharedEmbedder};
pub use error::EmbeddingError;
pub use generator::{EmbeddingGenerator, GenerationConfig, GenerationReport, DEFAULT_TEXT_COLUMN};
