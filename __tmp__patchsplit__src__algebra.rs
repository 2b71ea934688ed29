//! Exact Bayesian multiplication: cartesian intersection of two leaf lists
//! with multiplicity addition (spec.md §4.5).

use itertools::iproduct;

use crate::geometry::{Leaf, Side};
use crate::leaflist::LeafList;

/// Decomposes the half-open segment `[endpoint, endpoint + length)` into a
/// list of dyadic `Side`s, one per set bit of `length`, ordered from the
/// smallest bit to the largest.
///
/// Relies on `endpoint` being aligned such that each emitted side is itself
/// dyadic-aligned; this always holds for the intersection of two dyadic
/// intervals, since any two dyadic intervals are nested or disjoint, but the
/// decomposition itself works for any non-negative `length`.
fn line_segment_to_sides(mut endpoint: u64, length: u64) -> Vec<Side> {
    let mut sides = Vec::new();
    if length == 0 {
        return sides;
    }
    let n_bits = u64::BITS - length.leading_zeros();
    for i in 0..n_bits {
        if (length >> i) & 1 == 1 {
            sides.push(Side::new(endpoint, i));
            endpoint += 1u64 << i;
        }
    }
    sides
}

/// Dyadic decomposition of the intersection of two sides, empty if they
/// don't overlap.
fn intersect_sides(a: &Side, b: &Side) -> Vec<Side> {
    let left = a.endpoint.max(b.endpoint);
    let right = a.right().min(b.right());
    if right <= left {
        return Vec::new();
    }
    line_segment_to_sides(left, right - left)
}

/// Per-axis intersection followed by the cartesian product across axes;
/// empty if any axis fails to overlap.
fn intersect_leaves(a: &Leaf, b: &Leaf) -> Vec<Leaf> {
    let mut sides_by_axis: Vec<Vec<Side>> = Vec::with_capacity(a.sides.len());
    for (sa, sb) in a.sides.iter().zip(b.sides.iter()) {
        let intersection = intersect_sides(sa, sb);
        if intersection.is_empty() {
            return Vec::new();
        }
        sides_by_axis.push(intersection);
    }

    let multiplicity = a.multiplicity + b.multiplicity;
    cartesian_product(&sides_by_axis)
        .into_iter()
        .map(|sides| Leaf::new(multiplicity, sides))
        .collect()
}

/// Cartesian product of a list of per-axis side choices, preserving axis
/// order in each resulting combination.
fn cartesian_product(sides_by_axis: &[Vec<Side>]) -> Vec<Vec<Side>> {
    let mut combinations = vec![Vec::new()];
    for axis_sides in sides_by_axis {
        combinations = iproduct!(combinations.into_iter(), axis_sides.iter())
            .map(|(mut combo, &side)| {
                combo.push(side);
                combo
            })
            .collect();
    }
    combinations
}

/// Exact cartesian intersection of two leaf lists, multiplicities added.
/// Result is not compacted: callers must run [`LeafList::combine`] (and
/// usually `drop_small`/`reduce_multiplicity`) before using it further.
pub fn multiply(a: &LeafList, b: &LeafList) -> LeafList {
    let mut leaves = Vec::new();
    for (la, lb) in iproduct!(a.iter(), b.iter()) {
        leaves.extend(intersect_leaves(la, lb));
    }
    LeafList(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(mult: u32, sides: &[(u64, u32)]) -> Leaf {
        Leaf::new(mult, sides.iter().map(|&(e, d)| Side::new(e, d)).collect())
    }

    #[test]
    fn s4_decomposition_of_a_non_dyadic_interval() {
        let a = Side::new(0, 3); // [0, 8)
        let b = Side::new(2, 2); // [2, 6)
        let sides = intersect_sides(&a, &b);
        assert_eq!(sides, vec![Side::new(2, 2)]);
    }

    #[test]
    fn line_segment_decomposes_a_non_power_of_two_length() {
        // length 6 = 0b110: bit1 set (width 2) then bit2 set (width 4).
        let sides = line_segment_to_sides(2, 6);
        assert_eq!(sides, vec![Side::new(2, 1), Side::new(4, 2)]);
    }

    #[test]
    fn line_segment_of_zero_length_is_empty() {
        assert!(line_segment_to_sides(5, 0).is_empty());
    }

    #[test]
    fn intersect_sides_disjoint_is_empty() {
        let a = Side::new(0, 1); // [0, 2)
        let b = Side::new(4, 1); // [4, 6)
        assert!(intersect_sides(&a, &b).is_empty());
    }

    #[test]
    fn intersect_leaves_adds_multiplicities() {
        let a = leaf(1, &[(0, 3)]);
        let b = leaf(2, &[(2, 2)]);
        let result = intersect_leaves(&a, &b);
        assert_eq!(result, vec![leaf(3, &[(2, 2)])]);
    }

    #[test]
    fn intersect_leaves_on_disjoint_axis_is_empty() {
        let a = leaf(0, &[(0, 1)]);
        let b = leaf(0, &[(4, 1)]);
        assert!(intersect_leaves(&a, &b).is_empty());
    }

    #[test]
    fn multiply_constant_is_identity_up_to_combine() {
        let prior = LeafList(vec![leaf(0, &[(0, 3)])]);
        let other = LeafList(vec![leaf(1, &[(0, 1)]), leaf(0, &[(2, 2)])]);
        let mut result = multiply(&prior, &other);
        result.combine();
        let mut expected = other;
        expected.combine();
        let mass_result = result.total_mass();
        let mass_expected = expected.total_mass();
        assert_eq!(mass_result, mass_expected);
    }

    #[test]
    fn multiply_is_commutative_as_a_multiset_up_to_side_order() {
        let a = LeafList(vec![leaf(0, &[(0, 2), (0, 1)]), leaf(1, &[(4, 2), (0, 1)])]);
        let b = LeafList(vec![leaf(2, &[(0, 3), (0, 1)])]);

        let mut forward: Vec<(u32, Vec<(u64, u32)>)> = multiply(&a, &b)
            .iter()
            .map(|l| (l.multiplicity, l.sides.iter().map(|s| (s.endpoint, s.bit_depth)).collect()))
            .collect();
        let mut backward: Vec<(u32, Vec<(u64, u32)>)> = multiply(&b, &a)
            .iter()
            .map(|l| (l.multiplicity, l.sides.iter().map(|s| (s.endpoint, s.bit_depth)).collect()))
            .collect();
        forward.sort();
        backward.sort();
        assert_eq!(forward, backward);
    }

    #[test]
    fn multiply_total_mass_bounds_and_disjoint_product_gives_empty() {
        let a = LeafList(vec![leaf(0, &[(0, 1)])]); // [0,2)
        let b = LeafList(vec![leaf(0, &[(4, 1)])]); // [4,6)
        let result = multiply(&a, &b);
        assert!(result.is_empty());
    }

    #[test]
    fn property_1_multiply_output_is_dyadically_aligned() {
        // Every Side multiply() emits (via line_segment_to_sides) satisfies
        // endpoint % 2^bit_depth == 0 (spec.md §8 Property 1), even for
        // non-dyadic intersections like S4's.
        let a = LeafList(vec![leaf(0, &[(0, 3)])]); // [0, 8)
        let b = LeafList(vec![leaf(0, &[(2, 2)])]); // [2, 6)
        let result = multiply(&a, &b);
        for l in result.iter() {
            for side in &l.sides {
                assert_eq!(side.endpoint % (1u64 << side.bit_depth), 0);
            }
        }
    }
}


