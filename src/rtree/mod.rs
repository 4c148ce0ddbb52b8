//! A static, Hilbert-packed R-tree over 2D axis-aligned boxes.
//!
//! Build one with [`RTreeBuilder`], then query the finished [`RTree`] through [`RTreeIndex`].

#![warn(missing_docs)]

mod builder;
mod index;
pub mod sort;
mod r#trait;
pub mod traversal;
mod util;

pub use builder::{RTreeBuilder, DEFAULT_RTREE_NODE_SIZE};
pub use index::{RTree, RTreeMetadata};
pub use r#trait::RTreeIndex;
