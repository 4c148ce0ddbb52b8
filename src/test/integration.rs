use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::AABB;

use crate::rtree::RTreeIndex;
use crate::test::{build_tree, random_boxes, random_query};

type IndexedRect = GeomWithData<Rectangle<[f64; 2]>, u32>;

fn rstar_tree(boxes: &[[f64; 4]]) -> rstar::RTree<IndexedRect> {
    let rects = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let aabb = AABB::from_corners([b[0], b[1]], [b[2], b[3]]);
            GeomWithData::new(Rectangle::from_aabb(aabb), i as u32)
        })
        .collect();
    rstar::RTree::bulk_load(rects)
}

#[test]
fn agrees_with_rstar() {
    let mut rng = StdRng::seed_from_u64(1234);
    let boxes = random_boxes(&mut rng, 10_000);
    let reference = rstar_tree(&boxes);

    for node_size in [2, 9, 16, 100] {
        let tree = build_tree(&boxes, node_size);
        for _ in 0..100 {
            let query = random_query(&mut rng);
            let envelope = AABB::from_corners([query[0], query[1]], [query[2], query[3]]);
            let expected: HashSet<u32> = reference
                .locate_in_envelope_intersecting(&envelope)
                .map(|rect| rect.data)
                .collect();

            let results = tree.search(query[0], query[1], query[2], query[3]);
            assert_eq!(results.len(), expected.len(), "duplicate or missing results");
            assert_eq!(results.into_iter().collect::<HashSet<_>>(), expected);
        }
    }
}

#[test]
fn tree_is_shareable_across_threads() {
    let mut rng = StdRng::seed_from_u64(77);
    let boxes = random_boxes(&mut rng, 2_000);
    let tree = build_tree(&boxes, 16);
    let queries: Vec<[f64; 4]> = (0..8).map(|_| random_query(&mut rng)).collect();

    let expected: Vec<Vec<u32>> = queries
        .iter()
        .map(|q| tree.search(q[0], q[1], q[2], q[3]))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = queries
            .iter()
            .map(|q| {
                let tree = &tree;
                scope.spawn(move || tree.search(q[0], q[1], q[2], q[3]))
            })
            .collect();
        for (handle, expected) in handles.into_iter().zip(expected) {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
