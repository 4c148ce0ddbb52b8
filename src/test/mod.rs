//! Shared fixtures for the crate's tests.

use rand::Rng;

use crate::rtree::{RTree, RTreeBuilder};

mod integration;

/// Four boxes around the origin and one far away, inserted in this order.
pub(crate) fn five_boxes() -> Vec<[f64; 4]> {
    vec![
        [-1.1, -1.1, 1.1, 1.1],
        [-5.2, -5.3, 5.4, 5.5],
        [-5.2, -5.3, 1.4, 1.5],
        [1.7, 1.6, 2.2, 5.0],
        [9.9, 10.1, 20.2, 20.9],
    ]
}

pub(crate) fn five_box_index() -> RTree {
    build_tree(&five_boxes(), 16)
}

pub(crate) fn build_tree(boxes: &[[f64; 4]], node_size: u16) -> RTree {
    let mut builder = RTreeBuilder::new_with_node_size(boxes.len() as u32, node_size).unwrap();
    for b in boxes {
        builder.add(b[0], b[1], b[2], b[3]);
    }
    builder.finish().unwrap()
}

/// Boxes of up to 5x5 with their lower corner in `[0, 95)`.
pub(crate) fn random_boxes(rng: &mut impl Rng, num_items: usize) -> Vec<[f64; 4]> {
    (0..num_items)
        .map(|_| {
            let min_x = rng.gen_range(0.0..95.0);
            let min_y = rng.gen_range(0.0..95.0);
            [
                min_x,
                min_y,
                min_x + rng.gen_range(0.0..5.0),
                min_y + rng.gen_range(0.0..5.0),
            ]
        })
        .collect()
}

/// A query box of up to 20x20 somewhere in (or slightly outside) the data area.
pub(crate) fn random_query(rng: &mut impl Rng) -> [f64; 4] {
    let min_x = rng.gen_range(-10.0..100.0);
    let min_y = rng.gen_range(-10.0..100.0);
    [
        min_x,
        min_y,
        min_x + rng.gen_range(0.0..20.0),
        min_y + rng.gen_range(0.0..20.0),
    ]
}

/// Sorted insertion indexes of every box intersecting `query`, boundaries included.
pub(crate) fn brute_force_search(boxes: &[[f64; 4]], query: &[f64; 4]) -> Vec<u32> {
    boxes
        .iter()
        .enumerate()
        .filter(|(_, b)| {
            query[2] >= b[0] && query[3] >= b[1] && query[0] <= b[2] && query[1] <= b[3]
        })
        .map(|(i, _)| i as u32)
        .collect()
}
