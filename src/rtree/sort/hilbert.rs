#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::rtree::sort::util::sort;
use crate::rtree::sort::SortParams;

/// Largest coordinate on each axis of the Hilbert grid.
const HILBERT_MAX: f64 = ((1 << 16) - 1) as f64;

/// Sort the first `num_items` boxes (and their indices) by the Hilbert value of their centers.
///
/// The hilbert calculations are originally derived from [a C++
/// implementation](https://github.com/rawrunprotected/hilbert_curves).
pub(crate) fn hilbert_sort(params: &SortParams, boxes: &mut [f64], indices: &mut [u32]) {
    let mut hilbert_values = hilbert_values(params, &boxes[..params.num_items * 4]);
    log::trace!("computed {} hilbert values", hilbert_values.len());

    // sort items by their Hilbert value (for packing later)
    sort(&mut hilbert_values, boxes, indices);
}

/// Map item centers into Hilbert coordinate space and calculate Hilbert values.
fn hilbert_values(params: &SortParams, boxes: &[f64]) -> Vec<u32> {
    let value = |item: &[f64]| {
        let x = grid_coord(item[0] / 2. + item[2] / 2., params.min_x, params.max_x);
        let y = grid_coord(item[1] / 2. + item[3] / 2., params.min_y, params.max_y);
        hilbert(x, y)
    };

    #[cfg(feature = "rayon")]
    let values: Vec<u32> = boxes.par_chunks_exact(4).map(value).collect();

    #[cfg(not(feature = "rayon"))]
    let values: Vec<u32> = boxes.chunks_exact(4).map(value).collect();

    values
}

/// Scale `center` from `[min, max]` onto `[0, 65535]`.
///
/// An axis with no usable extent (every item shares the same coordinate, or the bounds are not
/// finite) maps everything onto 0.
#[inline]
fn grid_coord(center: f64, min: f64, max: f64) -> u32 {
    // halved, so that bounds near ±f64::MAX still have a finite extent
    let extent = max / 2. - min / 2.;
    if extent > 0. && extent.is_finite() {
        ((center / 2. - min / 2.) / extent * HILBERT_MAX).floor() as u32
    } else {
        0
    }
}

/// Distance along a Hilbert curve of order 16 of the grid cell `(x, y)`.
///
/// Both coordinates must be in `[0, 65535]`. The curve starts at `(0, 0)` and ends at
/// `(65535, 0)`.
///
/// ```
/// use packed_rtree::rtree::sort::hilbert;
///
/// assert_eq!(hilbert(0, 0), 0);
/// assert_eq!(hilbert(0, 1), 3);
/// assert_eq!(hilbert(65535, 0), u32::MAX);
/// ```
// Fast Hilbert curve algorithm by http://threadlocalmutex.com/
// Ported from C++ https://github.com/rawrunprotected/hilbert_curves (public domain)
#[inline]
pub fn hilbert(x: u32, y: u32) -> u32 {
    let mut a_1 = x ^ y;
    let mut b_1 = 0xFFFF ^ a_1;
    let mut c_1 = 0xFFFF ^ (x | y);
    let mut d_1 = x & (y ^ 0xFFFF);

    let mut a_2 = a_1 | (b_1 >> 1);
    let mut b_2 = (a_1 >> 1) ^ a_1;
    let mut c_2 = ((c_1 >> 1) ^ (b_1 & (d_1 >> 1))) ^ c_1;
    let mut d_2 = ((a_1 & (c_1 >> 1)) ^ (d_1 >> 1)) ^ d_1;

    for shift in [2, 4] {
        a_1 = a_2;
        b_1 = b_2;
        c_1 = c_2;
        d_1 = d_2;
        a_2 = (a_1 & (a_1 >> shift)) ^ (b_1 & (b_1 >> shift));
        b_2 = (a_1 & (b_1 >> shift)) ^ (b_1 & ((a_1 ^ b_1) >> shift));
        c_2 ^= (a_1 & (c_1 >> shift)) ^ (b_1 & (d_1 >> shift));
        d_2 ^= (b_1 & (c_1 >> shift)) ^ ((a_1 ^ b_1) & (d_1 >> shift));
    }

    a_1 = a_2;
    b_1 = b_2;
    c_1 = c_2;
    d_1 = d_2;
    c_2 ^= (a_1 & (c_1 >> 8)) ^ (b_1 & (d_1 >> 8));
    d_2 ^= (b_1 & (c_1 >> 8)) ^ ((a_1 ^ b_1) & (d_1 >> 8));

    a_1 = c_2 ^ (c_2 >> 1);
    b_1 = d_2 ^ (d_2 >> 1);

    let i0 = x ^ y;
    let i1 = b_1 | (0xFFFF ^ (i0 | a_1));

    (interleave(i1) << 1) | interleave(i0)
}

/// Spread the low 16 bits of `v` onto the even bit positions.
#[inline]
fn interleave(mut v: u32) -> u32 {
    v = (v | (v << 8)) & 0x00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333;
    (v | (v << 1)) & 0x5555_5555
}
