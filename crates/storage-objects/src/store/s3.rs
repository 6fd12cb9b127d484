use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use super::ObjectStore;
use crate::error::ObjectStoreError;
use crate::location::ObjectLocation;

/// S3-backed store. Local locations are rejected.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

fn bucket_key(location: &ObjectLocation) -> Result<(&str, &str), ObjectStoreError> {
    match location {
        ObjectLocation::S3 { bucket, key } => Ok((bucket, key)),
        ObjectLocation::Local(_) => Err(ObjectStoreError::Unsupported(format!(
            "{location}: S3 store only serves s3:// locations"
        ))),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, ObjectStoreError> {
        let (bucket, key) = bucket_key(location)?;
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false)
                {
                    ObjectStoreError::NotFound(location.to_string())
                } else {
                    ObjectStoreError::Remote(format!("{location}: {}", DisplayErrorContext(&err)))
                }
            })?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| ObjectStoreError::Io(format!("{location}: {err}")))?
            .into_bytes()
            .to_vec();
        debug!(%location, bytes = bytes.len(), "downloaded object");
        Ok(bytes)
    }

    async fn put(&self, location: &ObjectLocation, bytes: Vec<u8>) -> Result<(), ObjectStoreError> {
        let (bucket, key) = bucket_key(location)?;
        let len = bytes.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| {
                ObjectStoreError::Remote(format!("{location}: {}", DisplayErrorContext(&err)))
            })?;
        debug!(%location, bytes = len, "uploaded object");
        Ok(())
    }
}
