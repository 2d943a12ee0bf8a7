//! ObjectStore trait definition
//!
//! This trait defines the interface for the S3-compatible storage operations
//! the uploader needs. It decouples the upload engine from the specific S3
//! SDK implementation and can be mocked for testing.

use async_trait::async_trait;

use crate::error::Result;

/// Metadata for a stored object
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: Option<i64>,

    /// Human-readable size
    pub size_human: Option<String>,

    /// Last modified timestamp
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of known size
    pub fn object(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size as u64, humansize::BINARY)),
            last_modified: None,
            etag: None,
        }
    }
}

/// Trait for S3-compatible storage operations
///
/// Implemented by the S3 adapter; mocked in the upload engine's tests.
/// Implementations classify failures narrowly so callers can tell an absent
/// object ([`crate::Error::NotFound`]) from a transport failure
/// ([`crate::Error::Network`]) or a rejected authorization
/// ([`crate::Error::PermissionDenied`]).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get object metadata; `Error::NotFound` when the key is absent
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo>;

    /// Upload a full object, returning the stored object's metadata
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;
}
