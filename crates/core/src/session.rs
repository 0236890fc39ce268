//! Directory-style session over a flat object store
//!
//! The store's native model is flat key-value; prefixes ending in `/`
//! simulate directories. The session owns the bucket/prefix context set by
//! `cd` and consumed by no-argument `ls`. Every other operation takes an
//! explicit bucket and key and ignores the context.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::path::{child_segment, normalize_key, normalize_prefix, validate_bucket};
use crate::traits::{ListOptions, ObjectStat, ObjectStore};

/// Page size used when `ls` walks a listing to exhaustion
const LIST_PAGE_SIZE: i32 = 1000;

/// Directory-style client over an [`ObjectStore`]
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    bucket: String,
    prefix: String,
}

impl<S: ObjectStore> Session<S> {
    /// Create a session with an empty context
    ///
    /// `ls` requires a bucket in context; call [`Session::cd`] first or use
    /// [`Session::with_context`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            bucket: String::new(),
            prefix: String::new(),
        }
    }

    /// Create a session with the context already set
    pub fn with_context(store: S, bucket: impl Into<String>, prefix: &str) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            prefix: normalize_prefix(prefix),
        }
    }

    /// Current context bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Current context prefix (normalized, trailing `/` unless empty)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Download an object to a local file
    ///
    /// Parent directories are created as needed. Returns the number of bytes
    /// written. When the remote fetch fails no local file is created.
    pub async fn get(&self, bucket: &str, key: &str, local_path: &Path) -> Result<u64> {
        validate_bucket(bucket)?;
        let key = normalize_key(key);
        debug!(bucket, key, local = %local_path.display(), "get");

        if let Some(parent) = local_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = self.store.get_object(bucket, &key).await?;
        std::fs::write(local_path, &data)?;
        Ok(data.len() as u64)
    }

    /// Upload a local file to a remote key
    ///
    /// Overwrites any existing object at the key without warning. The content
    /// type is guessed from the file name.
    pub async fn put(&self, bucket: &str, key: &str, local_path: &Path) -> Result<ObjectStat> {
        validate_bucket(bucket)?;
        let key = normalize_key(key);
        debug!(bucket, key, local = %local_path.display(), "put");

        let data = std::fs::read(local_path)?;
        let content_type = mime_guess::from_path(local_path)
            .first()
            .map(|m| m.essence_str().to_string());

        self.store.put_object(bucket, &key, data, content_type).await
    }

    /// Change the bucket/prefix context
    ///
    /// Pure context mutation: no remote call, no validation that the prefix
    /// exists.
    pub fn cd(&mut self, bucket: impl Into<String>, prefix: &str) {
        self.bucket = bucket.into();
        self.prefix = normalize_prefix(prefix);
        debug!(bucket = %self.bucket, prefix = %self.prefix, "cd");
    }

    /// Create a zero-byte placeholder object at the prefix
    ///
    /// The placeholder key is the delimiter-normalized prefix (`"logs"`
    /// becomes `"logs/"`). Overwrites silently, so repeating the call is a
    /// no-op.
    pub async fn mkdir(&self, bucket: &str, prefix: &str) -> Result<()> {
        validate_bucket(bucket)?;
        let prefix = normalize_prefix(prefix);
        if prefix.is_empty() {
            return Err(Error::InvalidPath("Prefix cannot be empty".into()));
        }
        debug!(bucket, prefix, "mkdir");

        self.store.put_object(bucket, &prefix, Vec::new(), None).await?;
        Ok(())
    }

    /// Report whether any object lives under the directory-normalized prefix
    ///
    /// Listing-based policy: `"logs"` is a directory iff at least one key
    /// starts with `"logs/"`. A `mkdir` placeholder satisfies this, and a
    /// plain object at the exact key does not. Deterministic for unchanged
    /// remote state.
    pub async fn is_dir(&self, bucket: &str, prefix: &str) -> Result<bool> {
        validate_bucket(bucket)?;
        let prefix = normalize_prefix(prefix);
        debug!(bucket, prefix, "is_dir");

        let options = ListOptions {
            max_keys: Some(1),
            continuation_token: None,
        };
        let page = self.store.list_keys(bucket, &prefix, options).await?;
        Ok(!page.keys.is_empty())
    }

    /// Report whether an object exists at the exact key
    ///
    /// `NotFound` from the store maps to `false`; other errors propagate.
    pub async fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        validate_bucket(bucket)?;
        let key = normalize_key(key);
        debug!(bucket, key, "exists");

        match self.store.head_object(bucket, &key).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch the metadata snapshot for an object
    ///
    /// Fails with `NotFound` when the key does not name an existing object
    /// (a bare prefix is not an object unless a placeholder was created).
    pub async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectStat> {
        validate_bucket(bucket)?;
        let key = normalize_key(key);
        debug!(bucket, key, "stat");

        self.store.head_object(bucket, &key).await
    }

    /// List the next path segments under a prefix
    ///
    /// Uses the context prefix when `prefix` is `None`, and always the
    /// context bucket. Pages through the listing to exhaustion; each key is
    /// reduced to its next segment under the prefix, the entry equal to the
    /// prefix itself is excluded, and the result is deduplicated and sorted.
    pub async fn ls(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        if self.bucket.is_empty() {
            return Err(Error::InvalidPath(
                "No bucket in context; use cd first".into(),
            ));
        }
        let prefix = match prefix {
            Some(p) => normalize_prefix(p),
            None => self.prefix.clone(),
        };
        debug!(bucket = %self.bucket, prefix, "ls");

        let mut segments = BTreeSet::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let options = ListOptions {
                max_keys: Some(LIST_PAGE_SIZE),
                continuation_token: continuation_token.clone(),
            };
            let page = self.store.list_keys(&self.bucket, &prefix, options).await?;

            for key in &page.keys {
                if let Some(segment) = child_segment(key, &prefix) {
                    segments.insert(segment);
                }
            }

            match page.continuation_token {
                Some(token) if page.truncated => continuation_token = Some(token),
                _ => break,
            }
        }

        Ok(segments.into_iter().collect())
    }
}
