//! Error types for the storage layer.

/// Errors that can occur when talking to the object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object storage error
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bucket not found - must be created before use
    #[error("bucket '{0}' does not exist. Create it before connecting.")]
    BucketNotFound(String),

    /// Delete batch exceeds the provider bound
    #[error("delete batch of {0} keys exceeds the provider limit")]
    BatchTooLarge(usize),
}

impl StoreError {
    /// Whether the error is the backend's not-found signal.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ObjectStore(object_store::Error::NotFound { .. })
        )
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
