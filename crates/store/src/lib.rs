//! Object Storage Backend
//!
//! This crate provides the storage capability the bucketfs core drives:
//! a thin wrapper over pluggable object storage (S3/MinIO/local
//! filesystem/memory) exposing exactly the primitives needed to sustain a
//! filesystem illusion over a flat key space.
//!
//! # Features
//!
//! - Token-paginated listing with a fixed page size, so callers can drain
//!   arbitrarily large prefixes
//! - Per-key copy, the building block for synthesized rename/move
//! - Batched, idempotent delete (absent keys are not an error)
//! - Zero-byte puts for directory-marker objects
//!
//! # Example
//!
//! ```rust,no_run
//! use bucketfs_store::{Storage, StorageConfig};
//!
//! # async fn example() -> Result<(), bucketfs_store::StoreError> {
//! // Connect to an S3-compatible endpoint
//! let storage = Storage::new(StorageConfig::S3 {
//!     endpoint: "http://localhost:9000".to_string(),
//!     access_key: "minio".to_string(),
//!     secret_key: "minio123".to_string(),
//!     bucket: "files".to_string(),
//!     region: None,
//! })
//! .await?;
//!
//! let page = storage.list_page("photos/", None).await?;
//! # let _ = page;
//! # Ok(())
//! # }
//! ```

mod error;
mod storage;

pub use error::{Result, StoreError};
pub use storage::{
    ObjectPage, ObjectRecord, Storage, StorageConfig, DELETE_BATCH_LIMIT, PAGE_SIZE,
};
