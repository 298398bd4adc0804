use bytes::Bytes;
use futures::future::join_all;
use tracing::{debug, info, warn};

use store::{Storage, StoreError, DELETE_BATCH_LIMIT};

use crate::keys::{normalize, to_relative_key};
use crate::tree::Tree;

use super::listing::{expand, list_all};
use super::transform::{relocate_keys, rename_keys, PathMapping};

#[derive(Debug, thiserror::Error)]
pub enum BucketError {
    #[error("default error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("cannot move {src} into {dest}")]
    MoveIntoSelf { src: String, dest: String },
    #[error("bulk copy partially failed: {} of {attempted} keys", .failed.len())]
    PartialCopy {
        attempted: usize,
        /// Old keys whose copy failed, with the per-key error. Their
        /// sources were left in place.
        failed: Vec<(String, StoreError)>,
    },
}

/// A hierarchical view over one flat object-storage bucket.
///
/// All operations are synthesized from listing, per-key copy, and batched
/// delete; none are atomic. An interrupted move can leave both the old and
/// the new copies present. Re-running [`rm`](Bucket::rm) on the stale side
/// recovers, since every operation here is idempotent to retry.
#[derive(Clone)]
pub struct Bucket {
    storage: Storage,
    name: String,
}

impl Bucket {
    pub fn new(storage: Storage, name: impl Into<String>) -> Self {
        Self {
            storage,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Create an empty folder by putting a zero-byte marker object at
    /// `parent/name`.
    pub async fn create_folder(&self, parent: &str, name: &str) -> Result<(), BucketError> {
        if name.is_empty() || name.contains('/') {
            return Err(BucketError::Default(anyhow::anyhow!(
                "folder name must be a single non-empty path segment"
            )));
        }
        let parent = to_relative_key(parent, &self.name);
        let key = format!("{}/{}", parent, name);
        let key = normalize(&key);
        debug!(key = %key, "creating folder marker");
        self.storage.put(key, Bytes::new()).await?;
        Ok(())
    }

    /// Rename a file or directory: the destination replaces the source path
    /// wholesale, and every nested key keeps its relative suffix.
    ///
    /// Sources are deleted only after their copy succeeded; on partial
    /// failure the error names the keys still at their old location.
    pub async fn rename(&self, old_path: &str, new_path: &str) -> Result<(), BucketError> {
        let old_rel = to_relative_key(old_path, &self.name).to_string();
        let new_rel = to_relative_key(new_path, &self.name).to_string();
        if new_rel.is_empty() {
            return Err(BucketError::Default(anyhow::anyhow!(
                "rename destination must not be empty"
            )));
        }
        Self::check_overlap(&old_rel, &new_rel)?;

        let set = expand(&self.storage, &self.name, &[old_path.to_string()]).await?;
        let selection = match set.selections.first() {
            Some(selection) => selection,
            None => return Ok(()),
        };
        let mapping = rename_keys(new_path, &self.name, selection);

        info!(from = %old_rel, to = %new_rel, keys = mapping.len(), "renaming");
        self.apply_mapping(mapping, false, &implicit_dir_roots(&set)).await
    }

    /// Move (or copy, when `keep_origin` is set) a selection of files and
    /// directories under `target`, preserving each item's internal
    /// structure.
    pub async fn mv(
        &self,
        target: &str,
        paths: &[String],
        keep_origin: bool,
    ) -> Result<(), BucketError> {
        let dest = to_relative_key(target, &self.name).to_string();
        for path in paths {
            Self::check_overlap(to_relative_key(path, &self.name), &dest)?;
        }

        let set = expand(&self.storage, &self.name, paths).await?;
        let mapping = relocate_keys(target, &self.name, &set);

        info!(target = %dest, keys = mapping.len(), keep_origin, "relocating selection");
        self.apply_mapping(mapping, keep_origin, &implicit_dir_roots(&set))
            .await
    }

    /// Copy a selection under `target`, leaving the originals in place.
    pub async fn cp(&self, target: &str, paths: &[String]) -> Result<(), BucketError> {
        self.mv(target, paths, true).await
    }

    /// Remove files and directory subtrees.
    ///
    /// Removing an absent key is a success, so retrying is a no-op.
    pub async fn rm(&self, paths: &[String]) -> Result<(), BucketError> {
        let set = expand(&self.storage, &self.name, paths).await?;
        let keys: Vec<String> = set.keys().map(str::to_string).collect();
        info!(keys = keys.len(), "removing selection");
        self.delete_keys(&keys).await
    }

    /// Build the presentation tree for every key under `prefix`.
    pub async fn tree(&self, prefix: &str) -> Result<Tree, BucketError> {
        let rel = to_relative_key(prefix, &self.name);
        let records = list_all(&self.storage, rel).await?;
        Ok(Tree::build(&self.name, &records))
    }

    /// Reject a destination equal to or nested inside a selected source.
    /// Proceeding would relocate a subtree into itself.
    fn check_overlap(src: &str, dest: &str) -> Result<(), BucketError> {
        if !src.is_empty() && (dest == src || dest.starts_with(&format!("{}/", src))) {
            return Err(BucketError::MoveIntoSelf {
                src: src.to_string(),
                dest: dest.to_string(),
            });
        }
        Ok(())
    }

    /// Copy every pair concurrently, then, unless the origin is kept,
    /// delete the source keys whose copy succeeded.
    ///
    /// Deletion is gated on copy success per key: a source whose copy
    /// failed is never deleted, so a partial failure loses no data. Keys in
    /// `absent_ok` (directories that exist only through their descendants,
    /// with no marker object of their own) may be missing without counting
    /// as a failure.
    async fn apply_mapping(
        &self,
        mapping: PathMapping,
        keep_origin: bool,
        absent_ok: &[String],
    ) -> Result<(), BucketError> {
        let attempted = mapping.len();
        let copies = mapping
            .pairs
            .iter()
            // A key mapped to itself is already in place: copy-to-self is
            // illegal on some providers, and deleting it afterwards would
            // destroy the only copy
            .filter(|(old, new)| old != new)
            .map(|(old, new)| async move {
                let result = self.storage.copy(old, new).await;
                (old, result)
            });
        // Barrier: every copy settles before any delete is issued
        let results = join_all(copies).await;

        let mut migrated = Vec::with_capacity(attempted);
        let mut failed = Vec::new();
        for (old, result) in results {
            match result {
                Ok(()) => migrated.push(old.clone()),
                Err(e) if e.is_not_found() && absent_ok.iter().any(|k| k == old) => {
                    debug!(key = %old, "no marker object at directory root; nothing to copy");
                }
                Err(e) => {
                    warn!(key = %old, error = %e, "copy failed; source will not be deleted");
                    failed.push((old.clone(), e));
                }
            }
        }

        if !keep_origin {
            self.delete_keys(&migrated).await?;
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(BucketError::PartialCopy { attempted, failed })
        }
    }

    /// Batched delete, chunked to the provider ceiling.
    ///
    /// A failed batch is one failure unit; later chunks are not attempted.
    async fn delete_keys(&self, keys: &[String]) -> Result<(), BucketError> {
        for chunk in keys.chunks(DELETE_BATCH_LIMIT) {
            self.storage.delete_batch(chunk).await?;
        }
        Ok(())
    }
}

/// Roots that were expanded into descendants but may have no marker object
/// of their own.
fn implicit_dir_roots(set: &super::SelectionSet) -> Vec<String> {
    set.selections
        .iter()
        .filter(|s| s.keys.len() > 1)
        .map(|s| s.root.clone())
        .collect()
}
