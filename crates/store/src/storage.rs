//! Object storage backend abstraction (S3/MinIO/local filesystem/memory).

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Maximum number of records returned by one [`Storage::list_page`] call.
pub const PAGE_SIZE: usize = 1000;

/// Maximum number of keys accepted by one [`Storage::delete_batch`] call.
pub const DELETE_BATCH_LIMIT: usize = 1000;

/// One listed object. A snapshot taken at listing time, not a live handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub key: String,
    /// Size in bytes; zero for directory markers.
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// One page of a listing.
///
/// `next_token` is present only when the page filled; pass it back to
/// [`Storage::list_page`] to continue where this page stopped.
#[derive(Debug, Clone)]
pub struct ObjectPage {
    pub records: Vec<ObjectRecord>,
    pub next_token: Option<String>,
}

/// Configuration for the object storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Bucket name
        bucket: String,
        /// Optional region (defaults to "us-east-1")
        region: Option<String>,
    },
}

/// Wrapper around different object storage backends.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
}

impl Storage {
    /// Create a new storage backend from configuration.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let inner: Arc<dyn ObjectStore> = match &config {
            StorageConfig::Memory => Arc::new(InMemory::new()),

            StorageConfig::Local { path } => {
                // Ensure directory exists
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }

            StorageConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let builder = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(endpoint.starts_with("http://"));

                let store: Arc<dyn ObjectStore> = Arc::new(
                    builder
                        .build()
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                );

                // Verify the bucket exists by listing (empty prefix).
                // This will fail fast if the bucket doesn't exist.
                {
                    let prefix = ObjectPath::from("");
                    let mut stream = store.list(Some(&prefix));
                    match stream.try_next().await {
                        Ok(_) => {} // Bucket exists (may or may not have items)
                        Err(object_store::Error::NotFound { .. }) => {
                            return Err(StoreError::BucketNotFound(bucket.clone()));
                        }
                        Err(e) => {
                            let msg = e.to_string();
                            if msg.contains("NoSuchBucket")
                                || msg.contains("bucket") && msg.contains("not")
                            {
                                return Err(StoreError::BucketNotFound(bucket.clone()));
                            }
                            return Err(e.into());
                        }
                    }
                }

                store
            }
        };

        Ok(Self { inner })
    }

    /// Create an in-memory storage backend.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }

    /// Put one object. An empty body creates a directory-marker object.
    pub async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let path = ObjectPath::from(key);
        debug!(key = %path, size = data.len(), "putting object");
        self.inner.put(&path, data.into()).await?;
        Ok(())
    }

    /// List up to [`PAGE_SIZE`] objects under `prefix`, resuming after the
    /// continuation token of the previous page when one is given.
    ///
    /// The token is the last key of the previous page; resumption relies on
    /// the backend listing in lexicographic key order, which S3 and the
    /// in-memory backend guarantee.
    pub async fn list_page(&self, prefix: &str, token: Option<&str>) -> Result<ObjectPage> {
        let prefix_path = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));
        let mut stream = match token {
            Some(t) => {
                let offset = ObjectPath::from(t);
                self.inner.list_with_offset(prefix_path.as_ref(), &offset)
            }
            None => self.inner.list(prefix_path.as_ref()),
        };

        let mut records = Vec::new();
        while let Some(meta) = stream.try_next().await? {
            records.push(ObjectRecord {
                key: meta.location.to_string(),
                size: meta.size as u64,
                modified_at: meta.last_modified,
            });
            if records.len() == PAGE_SIZE {
                break;
            }
        }

        let next_token = if records.len() == PAGE_SIZE {
            records.last().map(|r| r.key.clone())
        } else {
            None
        };

        debug!(prefix = %prefix, count = records.len(), truncated = next_token.is_some(), "listed page");
        Ok(ObjectPage {
            records,
            next_token,
        })
    }

    /// Copy one object. The destination is overwritten if present.
    pub async fn copy(&self, src: &str, dest: &str) -> Result<()> {
        let from = ObjectPath::from(src);
        let to = ObjectPath::from(dest);
        debug!(from = %from, to = %to, "copying object");
        self.inner.copy(&from, &to).await?;
        Ok(())
    }

    /// Delete up to [`DELETE_BATCH_LIMIT`] objects in one batched call.
    ///
    /// Keys that are already gone are treated as deleted.
    pub async fn delete_batch(&self, keys: &[String]) -> Result<()> {
        if keys.len() > DELETE_BATCH_LIMIT {
            return Err(StoreError::BatchTooLarge(keys.len()));
        }

        let locations: Vec<object_store::Result<ObjectPath>> = keys
            .iter()
            .map(|k| Ok(ObjectPath::from(k.as_str())))
            .collect();

        let mut results = self.inner.delete_stream(stream::iter(locations).boxed());
        while let Some(res) = results.next().await {
            match res {
                Ok(_) => {}
                // The key may already be gone; absence is success
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!(count = keys.len(), "deleted batch");
        Ok(())
    }
}
