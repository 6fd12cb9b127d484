//! Runtime wiring for the catalog pipeline: configuration, logging, AWS
//! clients, and the generate/import/query stages.

mod aws;
pub mod config;
mod error;
mod pipeline;
mod telemetry;

pub use aws::load_sdk_config;
pub use config::{
    ConfigError, ConfigOverrides, DatabaseSection, EmbedderKind, EmbeddingSection, ImportSection,
    PipelineConfig, StorageSection,
};
pub use error::PipelineError;
pub use pipeline::{handle_query_event, Pipeline};
pub use telemetry::{init_tracing, LogFormat};
