//! Structure-preserving key relabeling for rename/move/copy.
//!
//! Object storage cannot rename. Every hierarchical rename is a bulk
//! relabeling of flat keys, computed here and applied by the bucket ops.
//! The two relabelings differ only in what happens to a selected root's own
//! name:
//!
//! - [`relocate_keys`] keeps the root's final segment under the destination
//!   (`mv photos/2020 archive` → `archive/2020/...`),
//! - [`rename_keys`] replaces the root wholesale
//!   (`rename photos/2020 photos/2021` → `photos/2021/...`).
//!
//! Both run one root at a time over the explicit selection grouping, so
//! every descendant keeps its suffix relative to its own root and sibling
//! roots sharing a textual prefix can never be confused.

use crate::keys::{normalize, to_relative_key};

use super::{Selection, SelectionSet};

/// A one-to-one, order-preserving old→new key correspondence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMapping {
    pub pairs: Vec<(String, String)>,
}

impl PathMapping {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Old keys, in mapping order.
    pub fn old_keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(old, _)| old.as_str())
    }

    /// New keys, in mapping order.
    pub fn new_keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, new)| new.as_str())
    }
}

/// Join a destination and a relative suffix without doubled separators.
fn join(dest: &str, suffix: &str) -> String {
    let suffix = normalize(suffix);
    if dest.is_empty() {
        suffix.to_string()
    } else if suffix.is_empty() {
        dest.to_string()
    } else {
        format!("{dest}/{suffix}")
    }
}

/// Compute new keys for moving or copying a selection under `target`.
///
/// Each selected root keeps its final path segment; every descendant keeps
/// its suffix relative to the root. Directory markers relabel exactly like
/// regular keys.
pub fn relocate_keys(target: &str, bucket: &str, set: &SelectionSet) -> PathMapping {
    let dest = to_relative_key(target, bucket);
    let mut pairs = Vec::with_capacity(set.len());
    for selection in &set.selections {
        // Everything before the root's final segment is dropped; the
        // segment itself and every deeper suffix are kept
        let prefix = match selection.root.rfind('/') {
            Some(idx) => &selection.root[..idx],
            None => "",
        };
        for key in &selection.keys {
            let suffix = &key[prefix.len()..];
            pairs.push((key.clone(), join(dest, suffix)));
        }
    }
    PathMapping { pairs }
}

/// Compute new keys for renaming a single selection to `new_path`.
///
/// The destination replaces the root wholesale; descendants keep their
/// suffix relative to the full root.
pub fn rename_keys(new_path: &str, bucket: &str, selection: &Selection) -> PathMapping {
    let dest = to_relative_key(new_path, bucket);
    let pairs = selection
        .keys
        .iter()
        .map(|key| (key.clone(), join(dest, &key[selection.root.len()..])))
        .collect();
    PathMapping { pairs }
}
