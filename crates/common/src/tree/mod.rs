//! Presentation tree built from one flat listing.
//!
//! The tree exists only to render a directory-browsing response: it is
//! rebuilt from scratch for every listing and never persisted. Node ids are
//! the `/`-joined chain of segments from the root, so lookup by id doubles
//! as lookup by path.

mod node;
mod tree;

pub use node::{NodeInfo, TreeNode};
pub use tree::{PostOrder, PreOrder, Tree};
