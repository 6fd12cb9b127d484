use async_trait::async_trait;

use super::{LocalObjectStore, ObjectStore, S3ObjectStore};
use crate::error::ObjectStoreError;
use crate::location::ObjectLocation;

/// Sends `s3://` locations to S3 and everything else to the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct RoutingObjectStore {
    s3: Option<S3ObjectStore>,
    local: LocalObjectStore,
}

impl RoutingObjectStore {
    #[must_use]
    pub const fn new(s3: Option<S3ObjectStore>, local: LocalObjectStore) -> Self {
        Self { s3, local }
    }
}

#[async_trait]
impl ObjectStore for RoutingObjectStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, ObjectStoreError> {
        match (&self.s3, location) {
            (Some(s3), ObjectLocation::S3 { .. }) => s3.get(location).await,
            _ => self.local.get(location).await,
        }
    }

    async fn put(&self, location: &ObjectLocation, bytes: Vec<u8>) -> Result<(), ObjectStoreError> {
        match (&self.s3, location) {
            (Some(s3), ObjectLocation::S3 { .. }) => s3.put(location, bytes).await,
            _ => self.local.put(location, bytes).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_s3_bucket_objects_fall_back_to_local_root() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = RoutingObjectStore::new(None, LocalObjectStore::with_root(dir.path()));
        let location = ObjectLocation::s3("catalog", "embeddings.csv");
        store.put(&location, b"x".to_vec()).await.expect("write");
        assert!(dir.path().join("catalog").join("embeddings.csv").exists());
        assert_eq!(store.get(&location).await.expect("read"), b"x");
    }
}
