use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ObjectStoreError;
use crate::location::ObjectLocation;

pub mod fs;
mod routing;
mod s3;

pub use fs::LocalObjectStore;
pub use routing::RoutingObjectStore;
pub use s3::S3ObjectStore;

/// Whole-object reads and writes against a bucket or directory.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of an object.
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, ObjectStoreError>;
    /// Create or replace an object.
    async fn put(&self, location: &ObjectLocation, bytes: Vec<u8>)
        -> Result<(), ObjectStoreError>;
}

pub type SharedObjectStore = Arc<dyn ObjectStore>;

/// In-memory store keyed by the location's display form.
#[derive(Debug, Default, Clone)]
pub struct MemoryObjectStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, location: &ObjectLocation, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.insert(location.to_string(), bytes.into());
        }
    }

    #[must_use]
    pub fn contents(&self, location: &ObjectLocation) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.get(&location.to_string()).cloned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, ObjectStoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        guard
            .get(&location.to_string())
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound(location.to_string()))
    }

    async fn put(&self, location: &ObjectLocation, bytes: Vec<u8>) -> Result<(), ObjectStoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        guard.insert(location.to_string(), bytes);
        Ok(())
    }
}
