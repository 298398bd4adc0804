/**
 * Bucket operations over the flat key space.
 *  Expansion of selected paths into concrete keys,
 *  structure-preserving relabeling, and the bulk
 *  copy/delete plumbing behind rename/move/copy/remove.
 */
pub mod bucket;
/**
 * Key normalization.
 *  Every key that enters the crate is reduced to a
 *  bucket-relative, slash-delimited form here.
 */
pub mod keys;
/**
 * Presentation tree.
 *  Builds a hierarchical node tree from one flat
 *  listing, for directory browsing.
 */
pub mod tree;

pub mod prelude {
    pub use crate::bucket::{Bucket, BucketError, PathMapping, Selection, SelectionSet};
    pub use crate::keys::{normalize, strip_bucket, to_relative_key};
    pub use crate::tree::{Tree, TreeNode};
}
