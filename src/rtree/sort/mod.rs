//! Spatial ordering of leaf boxes before the tree is packed.

mod hilbert;
mod util;

pub use hilbert::hilbert;
pub(crate) use hilbert::hilbert_sort;

/// What the sort needs to know about the items it orders.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SortParams {
    pub(crate) num_items: usize,
    pub(crate) min_x: f64,
    pub(crate) min_y: f64,
    pub(crate) max_x: f64,
    pub(crate) max_y: f64,
}
