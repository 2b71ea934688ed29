//! Primitive mass functions expressed exactly as leaf lists: the uniform
//! (`constant`) and linear-ramp (`linear`) priors/likelihoods (spec.md
//! §4.4).

use crate::geometry::{Leaf, Side};
use crate::leaflist::LeafList;

/// One leaf with `multiplicity = 0` and one full-range side per axis
/// bit-depth: uniform mass over the grid.
pub fn constant(bit_depths: &[u32]) -> LeafList {
    let sides = bit_depths.iter().map(|&d| Side::new(0, d)).collect();
    LeafList(vec![Leaf::new(0, sides)])
}

/// A one-axis leaf list encoding the ramp `f(x) = x` (or `f(x) = 2^bit_depth
/// - 1 - x` when `reverse`), exactly, as a sum of overlapping dyadic blocks:
/// position `x` is covered by one leaf per set bit in `x`'s binary
/// representation (or its complement, under `reverse`), each contributing
/// `2^multiplicity` to the total weight at `x`.
///
/// For each `j` in `0..bit_depth`, for each `i` in `0..2^(bit_depth-j-1)`,
/// emits a leaf of `multiplicity = j` and one side of `bit_depth = j` at
/// `endpoint = 2^j * (2*i + r)` where `r = 0` if `reverse` else `1`.
pub fn linear(bit_depth: u32, reverse: bool) -> LeafList {
    let r: u64 = if reverse { 0 } else { 1 };
    let mut leaves = Vec::new();
    for j in 0..bit_depth {
        let count = 1u64 << (bit_depth - j - 1);
        for i in 0..count {
            let endpoint = (1u64 << j) * (2 * i + r);
            leaves.push(Leaf::new(j, vec![Side::new(endpoint, j)]));
        }
    }
    LeafList(leaves)
}
