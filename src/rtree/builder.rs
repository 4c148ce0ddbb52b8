use geo_traits::{CoordTrait, RectTrait};

use crate::error::{RTreeError, Result};
use crate::rtree::index::{RTree, RTreeMetadata};
use crate::rtree::sort::{hilbert_sort, SortParams};

/// The default node size used by [`RTreeBuilder::new`]
pub const DEFAULT_RTREE_NODE_SIZE: u16 = 16;

/// A builder to create an [`RTree`].
///
/// The number of items is fixed up front; exactly that many boxes must be added before
/// [`finish`][RTreeBuilder::finish] packs them into a tree.
///
/// ```
/// use packed_rtree::rtree::{RTreeBuilder, RTreeIndex};
///
/// let mut builder = RTreeBuilder::new(3).unwrap();
/// builder.add(0., 0., 2., 2.);
/// builder.add(1., 1., 3., 3.);
/// builder.add(2., 2., 4., 4.);
/// let tree = builder.finish().unwrap();
///
/// let mut results = tree.search(2.5, 2.5, 5., 5.);
/// results.sort();
/// assert_eq!(results, vec![1, 2]);
/// ```
///
/// A builder cannot be queried; only the finished tree can.
///
/// ```compile_fail
/// use packed_rtree::rtree::{RTreeBuilder, RTreeIndex};
///
/// let mut builder = RTreeBuilder::new(1).unwrap();
/// builder.add(0., 0., 1., 1.);
/// builder.search(0., 0., 1., 1.);
/// ```
#[derive(Debug, Clone)]
pub struct RTreeBuilder {
    /// data buffer
    data: Vec<f64>,
    metadata: RTreeMetadata,
    pos: usize,
    num_added: u32,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl RTreeBuilder {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn new(num_items: u32) -> Result<Self> {
        Self::new_with_node_size(num_items, DEFAULT_RTREE_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// `node_size` is clamped to `[2, 65535]`. Fails if `num_items` is zero.
    pub fn new_with_node_size(num_items: u32, node_size: u16) -> Result<Self> {
        let metadata = RTreeMetadata::try_new(num_items, node_size)?;
        Ok(Self::from_metadata(metadata))
    }

    /// Create a new builder with the provided metadata
    pub fn from_metadata(metadata: RTreeMetadata) -> Self {
        let data = vec![0.; metadata.buffer_length()];

        Self {
            data,
            metadata,
            pos: 0,
            num_added: 0,
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Access the underlying [RTreeMetadata] of this instance.
    pub fn metadata(&self) -> &RTreeMetadata {
        &self.metadata
    }

    /// The smallest `min_x` of all boxes added so far, or `+∞` before the first one.
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    /// The smallest `min_y` of all boxes added so far, or `+∞` before the first one.
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    /// The largest `max_x` of all boxes added so far, or `-∞` before the first one.
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    /// The largest `max_y` of all boxes added so far, or `-∞` before the first one.
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Add a given rectangle to the RTree.
    ///
    /// This returns the insertion index, which provides a lookup back into the original data.
    ///
    /// `RTreeIndex::search` will return this same insertion index, which allows you to reference
    /// your original collection.
    ///
    /// Boxes beyond the declared number of items are not stored; they only make
    /// [`finish`][RTreeBuilder::finish] fail.
    #[inline]
    pub fn add(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> u32 {
        let index = self.num_added;
        self.num_added = self.num_added.saturating_add(1);

        if index >= self.metadata.num_items() {
            log::warn!(
                "ignoring box #{} added to a builder sized for {} items",
                index,
                self.metadata.num_items()
            );
            return index;
        }

        let (boxes, indices) = self.metadata.split_data_borrow(&mut self.data);

        indices[self.pos >> 2] = index;
        boxes[self.pos] = min_x;
        self.pos += 1;
        boxes[self.pos] = min_y;
        self.pos += 1;
        boxes[self.pos] = max_x;
        self.pos += 1;
        boxes[self.pos] = max_y;
        self.pos += 1;

        if min_x < self.min_x {
            self.min_x = min_x
        };
        if min_y < self.min_y {
            self.min_y = min_y
        };
        if max_x > self.max_x {
            self.max_x = max_x
        };
        if max_y > self.max_y {
            self.max_y = max_y
        };

        index
    }

    /// Add a given rectangle to the RTree.
    ///
    /// This returns the insertion index, which provides a lookup back into the original data.
    #[inline]
    pub fn add_rect(&mut self, rect: &impl RectTrait<T = f64>) -> u32 {
        self.add(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Consume this builder, sorting the boxes along a Hilbert curve and packing the tree levels
    /// above them.
    ///
    /// Fails if the number of added boxes differs from the number the builder was created with.
    pub fn finish(mut self) -> Result<RTree> {
        let num_items = self.metadata.num_items();
        if self.num_added != num_items {
            return Err(RTreeError::CapacityMismatch {
                added: self.num_added,
                expected: num_items,
            });
        }

        let num_items = num_items as usize;
        let node_size = self.metadata.node_size() as usize;
        log::debug!(
            "packing {} items into {} nodes over {} levels (node size {})",
            num_items,
            self.metadata.num_nodes(),
            self.metadata.level_bounds().len(),
            node_size
        );

        let (boxes, indices) = self.metadata.split_data_borrow(&mut self.data);

        if num_items == 1 {
            // Only one item, we don't even have a root node to fill
            return Ok(RTree {
                buffer: self.data,
                metadata: self.metadata,
            });
        }

        if num_items <= node_size {
            // only one node, skip sorting and just fill the root box
            indices[self.pos >> 2] = 0;
            boxes[self.pos..self.pos + 4].copy_from_slice(&[
                self.min_x, self.min_y, self.max_x, self.max_y,
            ]);

            return Ok(RTree {
                buffer: self.data,
                metadata: self.metadata,
            });
        }

        let sort_params = SortParams {
            num_items,
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        };
        hilbert_sort(&sort_params, boxes, indices);

        // generate nodes at each tree level, bottom-up
        let level_bounds = self.metadata.level_bounds();
        let mut pos = 0;
        for &end in &level_bounds[..level_bounds.len() - 1] {
            while pos < end {
                let node_index = pos;
                let node_end = (pos + node_size * 4).min(end);

                // calculate bbox for the new node
                let mut node_min_x = boxes[pos];
                let mut node_min_y = boxes[pos + 1];
                let mut node_max_x = boxes[pos + 2];
                let mut node_max_y = boxes[pos + 3];
                for child in (pos + 4..node_end).step_by(4) {
                    if boxes[child] < node_min_x {
                        node_min_x = boxes[child];
                    }
                    if boxes[child + 1] < node_min_y {
                        node_min_y = boxes[child + 1];
                    }
                    if boxes[child + 2] > node_max_x {
                        node_max_x = boxes[child + 2];
                    }
                    if boxes[child + 3] > node_max_y {
                        node_max_y = boxes[child + 3];
                    }
                }
                pos = node_end;

                // add the new node to the tree data
                indices[self.pos >> 2] = node_index as u32;
                boxes[self.pos..self.pos + 4]
                    .copy_from_slice(&[node_min_x, node_min_y, node_max_x, node_max_y]);
                self.pos += 4;
            }
        }
        debug_assert_eq!(self.pos, boxes.len());

        Ok(RTree {
            buffer: self.data,
            metadata: self.metadata,
        })
    }
}
