//! ObjectStore trait definition
//!
//! This trait defines the interface for the S3-compatible storage primitives.
//! It allows the session and the CLI to be decoupled from the specific S3 SDK
//! implementation and lets tests substitute an in-memory store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Metadata snapshot for a single object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStat {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// ETag with surrounding quotes trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ObjectStat {
    /// Create a new ObjectStat with only key and size set
    pub fn new(key: impl Into<String>, size_bytes: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
            etag: None,
            last_modified: None,
            content_type: None,
        }
    }
}

/// Options for a single list request
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of keys to return per request
    pub max_keys: Option<i32>,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// One page of keys from a list request
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Keys, in the store's lexicographic order
    pub keys: Vec<String>,

    /// Whether the result is truncated (more pages available)
    pub truncated: bool,

    /// Continuation token for the next page
    pub continuation_token: Option<String>,
}

/// Trait for S3-compatible storage primitives
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
/// Every method is a single remote call; directory-style semantics live in
/// the session layer above it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get object content as bytes
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Upload object content, overwriting any existing object at the key
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectStat>;

    /// Get object metadata
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectStat>;

    /// List one page of keys starting with a prefix
    async fn list_keys(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<ListPage>;
}
