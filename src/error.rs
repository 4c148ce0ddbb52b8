use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RTreeError {
    /// The requested tree shape cannot be built.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// `finish` was called after adding a different number of boxes than was declared up front.
    #[error("Added {added} items when expected {expected}.")]
    CapacityMismatch {
        /// How many times `add` was called.
        added: u32,
        /// The item count the builder was created with.
        expected: u32,
    },

    /// A tree level was requested that does not exist.
    #[error("Level {level} out of bounds for a tree with {num_levels} levels.")]
    LevelOutOfBounds {
        /// The requested level.
        level: usize,
        /// The height of the tree.
        num_levels: usize,
    },
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, RTreeError>;
