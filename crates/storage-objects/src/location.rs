use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ObjectStoreError;

/// Address of one object: an S3 bucket/key pair or a local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectLocation {
    S3 { bucket: String, key: String },
    Local(PathBuf),
}

impl ObjectLocation {
    pub fn s3(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse `s3://bucket/key`, `file:///path` or a plain path.
    pub fn parse(raw: &str) -> Result<Self, ObjectStoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ObjectStoreError::InvalidLocation("empty location".into()));
        }
        if let Some(rest) = raw.strip_prefix("s3://") {
            let (bucket, key) = rest
                .split_once('/')
                .ok_or_else(|| ObjectStoreError::InvalidLocation(format!("{raw}: missing key")))?;
            if bucket.is_empty() || key.is_empty() {
                return Err(ObjectStoreError::InvalidLocation(format!(
                    "{raw}: bucket and key must be non-empty"
                )));
            }
            return Ok(Self::s3(bucket, key));
        }
        if let Some(path) = raw.strip_prefix("file://") {
            return Ok(Self::Local(PathBuf::from(path)));
        }
        if raw.contains("://") {
            return Err(ObjectStoreError::InvalidLocation(format!(
                "{raw}: unsupported scheme"
            )));
        }
        Ok(Self::Local(PathBuf::from(raw)))
    }

    /// Sibling object in the same bucket or directory.
    #[must_use]
    pub fn with_name(&self, name: &str) -> Self {
        match self {
            Self::S3 { bucket, key } => {
                let key = match key.rsplit_once('/') {
                    Some((prefix, _)) => format!("{prefix}/{name}"),
                    None => name.to_string(),
                };
                Self::s3(bucket.clone(), key)
            }
            Self::Local(path) => Self::Local(path.with_file_name(name)),
        }
    }
}

impl FromStr for ObjectLocation {
    type Err = ObjectStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
