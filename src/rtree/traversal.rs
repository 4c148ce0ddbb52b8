//! Utilities to traverse the RTree structure by hand.

use geo_traits::{
    CoordTrait, GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection,
    UnimplementedLine, UnimplementedLineString, UnimplementedMultiLineString,
    UnimplementedMultiPoint, UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon,
    UnimplementedTriangle,
};

use crate::rtree::RTreeIndex;

/// A node in the RTree, either a leaf referring to one item or an internal node with children.
#[derive(Debug, Clone)]
pub struct Node<'a, T: RTreeIndex> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    /// This points to the position in the full `boxes` slice of the **first** coordinate of
    /// this node. So
    /// ```notest
    /// self.tree.boxes()[self.pos]
    /// ```
    /// accesses the `min_x` coordinate of this node.
    ///
    /// When this is `< self.tree.num_items() * 4` it's a leaf, and `indices()[self.pos >> 2]` is
    /// the original insertion index. Otherwise `indices()[self.pos >> 2]` is the `pos` of the
    /// first of its children.
    pos: usize,

    /// The tree level this node sits on, 0 being the leaves.
    level: usize,
}

impl<'a, T: RTreeIndex> Node<'a, T> {
    fn new(tree: &'a T, pos: usize, level: usize) -> Self {
        Self { tree, pos, level }
    }

    pub(crate) fn from_root(tree: &'a T) -> Self {
        let root_index = tree.boxes().len() - 4;
        Self::new(tree, root_index, tree.num_levels() - 1)
    }

    /// Get the minimum `x` value of this node.
    pub fn min_x(&self) -> f64 {
        self.tree.boxes()[self.pos]
    }

    /// Get the minimum `y` value of this node.
    pub fn min_y(&self) -> f64 {
        self.tree.boxes()[self.pos + 1]
    }

    /// Get the maximum `x` value of this node.
    pub fn max_x(&self) -> f64 {
        self.tree.boxes()[self.pos + 2]
    }

    /// Get the maximum `y` value of this node.
    pub fn max_y(&self) -> f64 {
        self.tree.boxes()[self.pos + 3]
    }

    /// The level of the tree this node is on. Leaves are on level 0, the root on the highest.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns `true` if this is a leaf node without children.
    pub fn is_leaf(&self) -> bool {
        self.pos < self.tree.num_items() as usize * 4
    }

    /// Returns `true` if this is an intermediate node with children.
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// Returns `true` if this node intersects another node. Touching boxes intersect.
    pub fn intersects<T2: RTreeIndex>(&self, other: &Node<'_, T2>) -> bool {
        self.max_x() >= other.min_x()
            && self.max_y() >= other.min_y()
            && self.min_x() <= other.max_x()
            && self.min_y() <= other.max_y()
    }

    /// Returns an iterator over the child nodes of this node. This must only be called if
    /// `is_parent` is `true`.
    pub fn children(&self) -> impl Iterator<Item = Node<'a, T>> {
        debug_assert!(self.is_parent());

        let tree = self.tree;
        let child_level = self.level - 1;

        // the children sit contiguously on the level below, but never past its end
        let start_child_pos = tree.indices()[self.pos >> 2] as usize;
        let end_children_pos = (start_child_pos + tree.node_size() as usize * 4)
            .min(tree.level_bounds()[child_level]);

        (start_child_pos..end_children_pos)
            .step_by(4)
            .map(move |pos| Node::new(tree, pos, child_level))
    }

    /// The original insertion index. This is only valid when this is a leaf node, which you can
    /// check with `Self::is_leaf`.
    pub fn index(&self) -> u32 {
        debug_assert!(self.is_leaf());
        self.tree.indices()[self.pos >> 2]
    }
}

/// A single coordinate.
///
/// Used in the implementation of RectTrait for Node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    x: f64,
    y: f64,
}

impl CoordTrait for Coord {
    type T = f64;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

impl<'a, T: RTreeIndex> GeometryTrait for Node<'a, T> {
    type T = f64;
    type PointType<'b>
        = UnimplementedPoint<f64>
    where
        Self: 'b;
    type LineStringType<'b>
        = UnimplementedLineString<f64>
    where
        Self: 'b;
    type PolygonType<'b>
        = UnimplementedPolygon<f64>
    where
        Self: 'b;
    type MultiPointType<'b>
        = UnimplementedMultiPoint<f64>
    where
        Self: 'b;
    type MultiLineStringType<'b>
        = UnimplementedMultiLineString<f64>
    where
        Self: 'b;
    type MultiPolygonType<'b>
        = UnimplementedMultiPolygon<f64>
    where
        Self: 'b;
    type GeometryCollectionType<'b>
        = UnimplementedGeometryCollection<f64>
    where
        Self: 'b;
    type RectType<'b>
        = Node<'a, T>
    where
        Self: 'b;
    type TriangleType<'b>
        = UnimplementedTriangle<f64>
    where
        Self: 'b;
    type LineType<'b>
        = UnimplementedLine<f64>
    where
        Self: 'b;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<f64>,
        UnimplementedLineString<f64>,
        UnimplementedPolygon<f64>,
        UnimplementedMultiPoint<f64>,
        UnimplementedMultiLineString<f64>,
        UnimplementedMultiPolygon<f64>,
        UnimplementedGeometryCollection<f64>,
        Node<'a, T>,
        UnimplementedTriangle<f64>,
        UnimplementedLine<f64>,
    > {
        GeometryType::Rect(self)
    }
}

impl<T: RTreeIndex> RectTrait for Node<'_, T> {
    type CoordType<'b>
        = Coord
    where
        Self: 'b;

    fn min(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.min_x(),
            y: self.min_y(),
        }
    }

    fn max(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.max_x(),
            y: self.max_y(),
        }
    }
}
