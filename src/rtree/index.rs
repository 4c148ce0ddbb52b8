use bytemuck::{cast_slice, cast_slice_mut};

use crate::error::{RTreeError, Result};
use crate::rtree::util::compute_num_nodes;

/// Common metadata to describe a tree.
///
/// This carries the validated configuration of a tree (how many items, how many children per
/// node) together with everything derived from it: the total node count, the level bounds and the
/// layout of the single backing buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RTreeMetadata {
    node_size: u16,
    num_items: u32,
    num_nodes: usize,
    level_bounds: Vec<usize>,
}

impl RTreeMetadata {
    /// Validate a tree configuration.
    ///
    /// `node_size` is clamped to `[2, 65535]`. Fails when `num_items` is zero, or when the packed
    /// tree would be too large to address its boxes with `u32` offsets.
    pub fn try_new(num_items: u32, node_size: u16) -> Result<Self> {
        if num_items == 0 {
            return Err(RTreeError::Configuration(
                "Number of items must be greater than zero.".to_string(),
            ));
        }
        let node_size = node_size.max(2);

        let (num_nodes, level_bounds) = compute_num_nodes(num_items, node_size);
        if num_nodes
            .checked_mul(4)
            .map_or(true, |slots| slots > u32::MAX as usize)
        {
            return Err(RTreeError::Configuration(format!(
                "{} items need {} nodes, which cannot be addressed with u32 offsets.",
                num_items, num_nodes
            )));
        }

        Ok(Self {
            node_size,
            num_items,
            num_nodes,
            level_bounds,
        })
    }

    /// The maximum number of children of each node.
    pub fn node_size(&self) -> u16 {
        self.node_size
    }

    /// The number of items the tree holds.
    pub fn num_items(&self) -> u32 {
        self.num_items
    }

    /// The number of nodes in the tree, including both leaf and intermediate nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The exclusive end offset of each level within the boxes slice, bottom-up.
    pub fn level_bounds(&self) -> &[usize] {
        self.level_bounds.as_slice()
    }

    /// Length of the box region of the buffer, in `f64` slots.
    #[inline]
    pub(crate) fn boxes_length(&self) -> usize {
        self.num_nodes * 4
    }

    /// Total length of the backing buffer, in `f64` slots. Two `u32` indices share one slot.
    pub(crate) fn buffer_length(&self) -> usize {
        self.boxes_length() + self.num_nodes.div_ceil(2)
    }

    pub(crate) fn boxes_slice<'a>(&self, data: &'a [f64]) -> &'a [f64] {
        &data[..self.boxes_length()]
    }

    pub(crate) fn indices_slice<'a>(&self, data: &'a [f64]) -> &'a [u32] {
        let indices: &[u32] = cast_slice(&data[self.boxes_length()..]);
        &indices[..self.num_nodes]
    }

    /// Mutable borrow of boxes and indices
    #[inline]
    pub(crate) fn split_data_borrow<'a>(
        &self,
        data: &'a mut [f64],
    ) -> (&'a mut [f64], &'a mut [u32]) {
        let (boxes, indices_buf) = data.split_at_mut(self.boxes_length());
        let indices: &mut [u32] = cast_slice_mut(indices_buf);
        (boxes, &mut indices[..self.num_nodes])
    }
}

/// A finished, immutable RTree.
///
/// Usually this will be created from scratch via [`RTreeBuilder`][crate::rtree::RTreeBuilder].
/// Query it through the [`RTreeIndex`][crate::rtree::RTreeIndex] trait.
#[derive(Debug, Clone, PartialEq)]
pub struct RTree {
    pub(crate) buffer: Vec<f64>,
    pub(crate) metadata: RTreeMetadata,
}

impl RTree {
    /// Consume the tree, returning its backing buffer: `4 * num_nodes` box coordinates followed by
    /// the node indices packed as `u32` pairs.
    pub fn into_inner(self) -> Vec<f64> {
        self.buffer
    }
}
