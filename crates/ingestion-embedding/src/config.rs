pub const DEFAULT_MODEL_ID: &str = "amazon.titan-embed-text-v2:0";
pub const DEFAULT_DIMENSIONS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    pub model_id: String,
    pub dimensions: usize,
    /// Ask the model for unit-length vectors when it supports the option.
    pub normalize: bool,
}

impl EmbeddingConfig {
    #[must_use]
    pub const fn new(model_id: String, dimensions: usize) -> Self {
        Self {
            model_id,
            dimensions,
            normalize: true,
        }
    }

    #[must_use]
    pub const fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_ID.to_string(), DEFAULT_DIMENSIONS)
    }
}
