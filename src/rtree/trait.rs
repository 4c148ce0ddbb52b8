use geo_traits::{CoordTrait, RectTrait};
use tinyvec::TinyVec;

use crate::error::{RTreeError, Result};
use crate::rtree::index::{RTree, RTreeMetadata};
use crate::rtree::traversal::Node;

/// A trait for searching and accessing data out of an RTree.
pub trait RTreeIndex: Sized {
    /// A slice representing all the bounding boxes of all elements contained within this tree,
    /// including the bounding boxes of each internal node.
    fn boxes(&self) -> &[f64];

    /// A slice representing the indices within the `boxes` slice, including internal nodes.
    ///
    /// Leaf entries hold the insertion index of their item; internal entries hold the offset into
    /// `boxes` of their first child.
    fn indices(&self) -> &[u32];

    /// Access the metadata describing this RTree
    fn metadata(&self) -> &RTreeMetadata;

    /// The total number of items contained in this RTree.
    fn num_items(&self) -> u32 {
        self.metadata().num_items()
    }

    /// The total number of nodes in this RTree, including both leaf and intermediate nodes.
    fn num_nodes(&self) -> usize {
        self.metadata().num_nodes()
    }

    /// The maximum number of elements in each node.
    fn node_size(&self) -> u16 {
        self.metadata().node_size()
    }

    /// The offsets into [RTreeIndex::boxes] where each level's boxes end. The tree is laid out
    /// bottom-up, and there's an implicit initial 0. So the boxes of the lowest level of the tree
    /// are located from `boxes[0..self.level_bounds()[0]]`.
    fn level_bounds(&self) -> &[usize] {
        self.metadata().level_bounds()
    }

    /// The number of levels (height) of the tree.
    fn num_levels(&self) -> usize {
        self.level_bounds().len()
    }

    /// The tree is laid out from bottom to top. Level 0 is the _base_ of the tree. Each integer
    /// higher is one level higher of the tree.
    fn boxes_at_level(&self, level: usize) -> Result<&[f64]> {
        let level_bounds = self.level_bounds();
        if level >= level_bounds.len() {
            return Err(RTreeError::LevelOutOfBounds {
                level,
                num_levels: level_bounds.len(),
            });
        }
        let start = if level == 0 {
            0
        } else {
            level_bounds[level - 1]
        };
        Ok(&self.boxes()[start..level_bounds[level]])
    }

    /// The minimum `x` over all items, taken from the root box.
    fn min_x(&self) -> f64 {
        self.root().min_x()
    }

    /// The minimum `y` over all items, taken from the root box.
    fn min_y(&self) -> f64 {
        self.root().min_y()
    }

    /// The maximum `x` over all items, taken from the root box.
    fn max_x(&self) -> f64 {
        self.root().max_x()
    }

    /// The maximum `y` over all items, taken from the root box.
    fn max_y(&self) -> f64 {
        self.root().max_y()
    }

    /// Search an RTree given the provided bounding box.
    ///
    /// Results are the insertion indexes of every item whose box intersects the query box,
    /// boundaries included, in traversal order.
    fn search(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u32> {
        let mut results = vec![];
        self.visit(min_x, min_y, max_x, max_y, |index| {
            results.push(index);
            true
        });
        results
    }

    /// Search an RTree given the provided rectangle.
    fn search_rect(&self, rect: &impl RectTrait<T = f64>) -> Vec<u32> {
        self.search(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Like [`search`][RTreeIndex::search], but only keeps the indexes for which `filter` returns
    /// `true`.
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
    /// let results = tree.search_with_filter(1.5, 1.5, 1.5, 1.5, |index| index != 0);
    /// assert_eq!(results, vec![1]);
    /// ```
    fn search_with_filter<F: FnMut(u32) -> bool>(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        mut filter: F,
    ) -> Vec<u32> {
        let mut results = vec![];
        self.visit(min_x, min_y, max_x, max_y, |index| {
            if filter(index) {
                results.push(index);
            }
            true
        });
        results
    }

    /// Call `visitor` with the insertion index of every item whose box intersects the query box,
    /// in the same order [`search`][RTreeIndex::search] would return them.
    ///
    /// The search stops as soon as `visitor` returns `false`.
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
    /// let mut first = None;
    /// tree.visit(0., 0., 4., 4., |index| {
    ///     first = Some(index);
    ///     false
    /// });
    /// assert!(first.is_some());
    /// ```
    fn visit<F: FnMut(u32) -> bool>(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        mut visitor: F,
    ) {
        let boxes = self.boxes();
        let indices = self.indices();
        let level_bounds = self.level_bounds();
        let node_size = self.node_size() as usize;
        let leaves_end = self.num_items() as usize * 4;

        // deferred (node offset, level) pairs
        let mut queue: TinyVec<[(usize, usize); 32]> = TinyVec::new();
        let mut outer_node = boxes
            .len()
            .checked_sub(4)
            .map(|root| (root, level_bounds.len() - 1));

        while let Some((node_index, level)) = outer_node {
            // find the end index of the node
            let end = (node_index + node_size * 4).min(level_bounds[level]);

            // search through child nodes
            for pos in (node_index..end).step_by(4) {
                // check if node bbox intersects with query bbox
                if max_x < boxes[pos] {
                    continue; // maxX < nodeMinX
                }
                if max_y < boxes[pos + 1] {
                    continue; // maxY < nodeMinY
                }
                if min_x > boxes[pos + 2] {
                    continue; // minX > nodeMaxX
                }
                if min_y > boxes[pos + 3] {
                    continue; // minY > nodeMaxY
                }

                let index = indices[pos >> 2];

                if node_index >= leaves_end {
                    queue.push((index as usize, level - 1)); // node; add it to the search queue
                } else if !visitor(index) {
                    return; // leaf item, and the visitor is done
                }
            }

            outer_node = queue.pop();
        }
    }

    /// Access the root node of the RTree for manual traversal.
    fn root(&self) -> Node<'_, Self> {
        Node::from_root(self)
    }
}

impl RTreeIndex for RTree {
    fn boxes(&self) -> &[f64] {
        self.metadata.boxes_slice(&self.buffer)
    }

    fn indices(&self) -> &[u32] {
        self.metadata.indices_slice(&self.buffer)
    }

    fn metadata(&self) -> &RTreeMetadata {
        &self.metadata
    }
}
