use tinyvec::TinyVec;

/// Sort `values` ascending in place, applying every swap to the matching box (four slots in
/// `boxes`) and entry of `indices` as well.
///
/// Hoare partition around the middle key. The range stack keeps the larger half for later and
/// works on the smaller one first, so it never grows beyond `log2(len)` entries.
pub(super) fn sort(values: &mut [u32], boxes: &mut [f64], indices: &mut [u32]) {
    if values.len() < 2 {
        return;
    }
    debug_assert!(boxes.len() >= values.len() * 4);
    debug_assert!(indices.len() >= values.len());

    let mut stack: TinyVec<[(usize, usize); 32]> = TinyVec::new();
    stack.push((0, values.len() - 1));

    while let Some((mut left, mut right)) = stack.pop() {
        while left < right {
            let j = partition(values, boxes, indices, left, right);

            // [left, j] and [j + 1, right] are both non-empty
            if j - left < right - j {
                stack.push((j + 1, right));
                right = j;
            } else {
                stack.push((left, j));
                left = j + 1;
            }
        }
    }
}

/// Hoare partition of `values[left..=right]`. Returns `j` such that every key in `left..=j` is
/// `<=` every key in `j + 1..=right`, with `left <= j < right`.
#[inline]
fn partition(
    values: &mut [u32],
    boxes: &mut [f64],
    indices: &mut [u32],
    left: usize,
    right: usize,
) -> usize {
    let pivot = values[(left + right) >> 1];
    let mut i = left.wrapping_sub(1);
    let mut j = right.wrapping_add(1);

    loop {
        loop {
            i = i.wrapping_add(1);
            if values[i] >= pivot {
                break;
            }
        }

        loop {
            j = j.wrapping_sub(1);
            if values[j] <= pivot {
                break;
            }
        }

        if i >= j {
            return j;
        }

        swap(values, boxes, indices, i, j);
    }
}

/// Swap two values and two corresponding boxes.
#[inline]
fn swap(values: &mut [u32], boxes: &mut [f64], indices: &mut [u32], i: usize, j: usize) {
    values.swap(i, j);

    let k = 4 * i;
    let m = 4 * j;
    boxes.swap(k, m);
    boxes.swap(k + 1, m + 1);
    boxes.swap(k + 2, m + 2);
    boxes.swap(k + 3, m + 3);

    indices.swap(i, j);
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::sort;

    /// Give each item a box derived from its key so the co-permutation can be checked afterwards.
    fn items(values: &[u32]) -> (Vec<f64>, Vec<u32>) {
        let boxes = values
            .iter()
            .flat_map(|v| {
                let v = *v as f64;
                [v, v + 0.25, v + 0.5, v + 0.75]
            })
            .collect();
        let indices = (0..values.len() as u32).collect();
        (boxes, indices)
    }

    fn check_sorted(original: &[u32], values: &[u32], boxes: &[f64], indices: &[u32]) {
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "keys not sorted");
        for (i, value) in values.iter().enumerate() {
            assert_eq!(original[indices[i] as usize], *value, "index moved apart from key");
            assert_eq!(boxes[4 * i], *value as f64, "box moved apart from key");
            assert_eq!(boxes[4 * i + 3], *value as f64 + 0.75);
        }
        let mut seen = indices.to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..original.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn sorts_random_keys() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [2, 3, 10, 257, 5000] {
            let original: Vec<u32> = (0..len).map(|_| rng.gen()).collect();
            let mut values = original.clone();
            let (mut boxes, mut indices) = items(&values);
            sort(&mut values, &mut boxes, &mut indices);
            check_sorted(&original, &values, &boxes, &indices);
        }
    }

    #[test]
    fn sorts_duplicate_heavy_keys() {
        let mut rng = StdRng::seed_from_u64(11);
        let original: Vec<u32> = (0..10_000).map(|_| rng.gen_range(0..3)).collect();
        let mut values = original.clone();
        let (mut boxes, mut indices) = items(&values);
        sort(&mut values, &mut boxes, &mut indices);
        check_sorted(&original, &values, &boxes, &indices);
    }

    #[test]
    fn sorts_presorted_and_reversed_keys() {
        let ascending: Vec<u32> = (0..1000).collect();
        let descending: Vec<u32> = (0..1000).rev().collect();
        let constant = vec![42; 1000];
        for original in [ascending, descending, constant] {
            let mut values = original.clone();
            let (mut boxes, mut indices) = items(&values);
            sort(&mut values, &mut boxes, &mut indices);
            check_sorted(&original, &values, &boxes, &indices);
        }
    }

    #[test]
    fn leaves_trailing_slots_alone() {
        let mut values = vec![3, 1, 2];
        let (mut boxes, mut indices) = items(&values);
        boxes.extend([-1.; 4]);
        indices.push(99);
        sort(&mut values, &mut boxes, &mut indices);
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(&boxes[12..], &[-1.; 4]);
        assert_eq!(indices[3], 99);
    }
}
