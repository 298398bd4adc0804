//! Bucket operations over a flat key space
//!
//! Object storage has no directories and no rename: a bucket is a flat set
//! of keys, and every hierarchical operation has to be synthesized from
//! listing, per-key copy, and batched delete. This module holds the pieces
//! that sustain the illusion:
//!
//! - **[`Bucket`]**: the public surface (`create_folder` / `rename` / `mv` /
//!   `cp` / `rm` / `tree`)
//! - **[`Selection`] / [`SelectionSet`]**: a caller's chosen roots expanded
//!   into every concrete key at or beneath them
//! - **[`PathMapping`]**: a structure-preserving old→new key relabeling,
//!   applied as concurrent copies followed by gated batched deletes
//!
//! # Why relabeling is the hard part
//!
//! Moving `photos/2020` to `archive/2020` must also relocate
//! `photos/2020/jan/a.jpg` to `archive/2020/jan/a.jpg`, while leaving the
//! unrelated sibling `photos/20200101` alone. Selections therefore carry
//! their root boundaries explicitly, and the relabeling runs one root at a
//! time, so a textual-prefix overlap between siblings can never be
//! misparsed as nesting.

mod bucket;
mod listing;
mod transform;

pub use bucket::{Bucket, BucketError};
pub use listing::{Selection, SelectionSet};
pub use transform::{relocate_keys, rename_keys, PathMapping};
