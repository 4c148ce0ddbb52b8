#![doc = include_str!("../README.md")]

mod error;
pub mod rtree;

pub use error::{RTreeError, Result};

#[cfg(test)]
pub(crate) mod test;
