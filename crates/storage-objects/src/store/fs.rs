use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::ObjectStore;
use crate::error::ObjectStoreError;
use crate::location::ObjectLocation;

fn encode_component(s: &str) -> String {
    // dot segments would walk out of the root
    if s == "." || s == ".." {
        return s.replace('.', "%2E");
    }
    // percent-encode anything outside the portable filename set
    s.bytes()
        .flat_map(|b| match b {
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_' | b'.' => vec![b],
            _ => format!("%{:02X}", b).into_bytes(),
        })
        .map(|b| b as char)
        .collect()
}

/// Directory layout for a bucket/key pair under `root`; key segments map to
/// nested directories.
pub fn make_path(root: &Path, bucket: &str, key: &str) -> PathBuf {
    key.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.join(encode_component(bucket)), |path, segment| {
            path.join(encode_component(segment))
        })
}

pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    {
        let mut f = File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

pub fn read_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut f = File::open(path)?;
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Filesystem-backed store. Local locations resolve directly; S3 locations
/// resolve beneath the configured root, one directory per bucket.
#[derive(Debug, Clone, Default)]
pub struct LocalObjectStore {
    root: Option<PathBuf>,
}

impl LocalObjectStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, location: &ObjectLocation) -> Result<PathBuf, ObjectStoreError> {
        match (location, &self.root) {
            (ObjectLocation::Local(path), Some(root)) if path.is_relative() => Ok(root.join(path)),
            (ObjectLocation::Local(path), _) => Ok(path.clone()),
            (ObjectLocation::S3 { bucket, key }, Some(root)) => Ok(make_path(root, bucket, key)),
            (ObjectLocation::S3 { .. }, None) => Err(ObjectStoreError::Unsupported(format!(
                "{location}: local store has no root for bucket objects"
            ))),
        }
    }
}

fn io_error(location: &ObjectLocation, err: std::io::Error) -> ObjectStoreError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ObjectStoreError::NotFound(location.to_string())
    } else {
        ObjectStoreError::Io(format!("{location}: {err}"))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, ObjectStoreError> {
        let path = self.resolve(location)?;
        let bytes = tokio::task::spawn_blocking(move || read_bytes(&path))
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?
            .map_err(|e| io_error(location, e))?;
        debug!(%location, bytes = bytes.len(), "read local object");
        Ok(bytes)
    }

    async fn put(&self, location: &ObjectLocation, bytes: Vec<u8>) -> Result<(), ObjectStoreError> {
        let path = self.resolve(location)?;
        let len = bytes.len();
        tokio::task::spawn_blocking(move || atomic_write_bytes(&path, &bytes))
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?
            .map_err(|e| io_error(location, e))?;
        debug!(%location, bytes = len, "wrote local object");
        Ok(())
    }
}
