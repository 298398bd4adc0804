//! Flattened listing and selection expansion.

use store::{ObjectRecord, Storage};
use tracing::debug;

use crate::keys::to_relative_key;

use super::BucketError;

/// One selected root together with every concrete key at or beneath it.
///
/// Invariant: `keys[0] == root`, and every later key extends `root + "/"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub root: String,
    pub keys: Vec<String>,
}

/// The ordered expansion of every path a caller selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    /// Every expanded key, in selection order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.selections
            .iter()
            .flat_map(|s| s.keys.iter().map(String::as_str))
    }

    /// Total number of expanded keys.
    pub fn len(&self) -> usize {
        self.selections.iter().map(|s| s.keys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Drain a paginated listing into one ordered sequence.
///
/// Any page failure aborts the whole call; records from earlier pages are
/// discarded rather than returned partially.
pub(crate) async fn list_all(
    storage: &Storage,
    prefix: &str,
) -> Result<Vec<ObjectRecord>, BucketError> {
    let mut records = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = storage.list_page(prefix, token.as_deref()).await?;
        records.extend(page.records);
        match page.next_token {
            Some(t) => token = Some(t),
            None => break,
        }
    }
    debug!(prefix = %prefix, count = records.len(), "listing drained");
    Ok(records)
}

/// Expand logical paths into the concrete keys rooted at each of them.
///
/// A plain file with no descendants expands to exactly itself; a directory
/// expands to itself plus every nested key, in listing order. Input order
/// is preserved across selections.
pub(crate) async fn expand(
    storage: &Storage,
    bucket: &str,
    paths: &[String],
) -> Result<SelectionSet, BucketError> {
    let mut selections = Vec::with_capacity(paths.len());
    for path in paths {
        let root = to_relative_key(path, bucket).to_string();
        let subtree = list_all(storage, &format!("{}/", root)).await?;

        let mut keys = Vec::with_capacity(subtree.len() + 1);
        keys.push(root.clone());
        for record in subtree {
            // Some backends return the marker object at the prefix itself;
            // the root is already first in the expansion
            if record.key != root {
                keys.push(record.key);
            }
        }
        selections.push(Selection { root, keys });
    }
    Ok(SelectionSet { selections })
}
