//! Labelled prefix tree over a leaf list: assigns each leaf a variable-length
//! binary label proportional to its share of the total mass, then samples
//! integer block coordinates by drawing a random fixed-width label and
//! matching it against progressively longer prefixes (spec.md §4.6).

use std::collections::HashMap;

use rand::Rng;

use crate::bitlabel::Label;
use crate::error::Error;
use crate::geometry::Leaf;
use crate::leaflist::LeafList;

/// Safety cap on retries inside a single draw (spec.md §4.6, §9).
pub const SAMPLING_MAX_RETRIES: usize = 100_000;

/// A labelled prefix tree built from a [`LeafList`]'s leaves.
pub struct Tree {
    depth: u32,
    leaves_labeled: HashMap<Label, Leaf>,
}

impl Tree {
    /// Builds a tree from the given leaves, each reachable by a distinct
    /// binary prefix of `depth` bits or fewer.
    ///
    /// `depth` is `total_n_blocks.bit_length()`: when the total is an exact
    /// power of two this is one bit short of "enough to address every
    /// block", a discrepancy carried over unchanged rather than special-cased
    /// (spec.md §9). The effect is a small, bounded chance that a draw lands
    /// on an unassigned prefix and must retry.
    pub fn new(leaves: Vec<Leaf>) -> Self {
        let depth = Self::required_depth(&leaves);
        let leaves_labeled = Self::label_leaves(leaves, depth);
        Tree { depth, leaves_labeled }
    }

    pub fn from_leaf_list(leaf_list: LeafList) -> Self {
        Self::new(leaf_list.0)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn leaves_labeled(&self) -> &HashMap<Label, Leaf> {
        &self.leaves_labeled
    }

    fn required_depth(leaves: &[Leaf]) -> u32 {
        let total_blocks: u128 = leaves.iter().map(|l| l.n_blocks()).sum();
        u128::BITS - total_blocks.leading_zeros()
    }

    /// Canonical-code style assignment: leaves are visited from the deepest
    /// (smallest share of mass, longest label) to the shallowest (largest
    /// share, shortest label), each getting the previous label plus one,
    /// shifted to the new label's width.
    fn label_leaves(mut leaves: Vec<Leaf>, depth: u32) -> HashMap<Label, Leaf> {
        leaves.sort_by_key(|l| std::cmp::Reverse(l.total_bit_depth()));

        let mut labeled = HashMap::with_capacity(leaves.len());
        let mut last_bit_depth_leaf = depth;
        let mut last_label: i64 = -1;
        for leaf in leaves {
            let bit_depth_leaf = leaf.total_bit_depth();
            let bit_depth_label = depth - bit_depth_leaf;
            let label = (last_label + 1) << (last_bit_depth_leaf - bit_depth_leaf);
            labeled.insert(Label::new(label as u64, bit_depth_label), leaf);
            last_bit_depth_leaf = bit_depth_leaf;
            last_label = label;
        }
        labeled
    }

    /// Draws one sample: a uniformly random `depth`-bit label, matched
    /// against the labelled leaves by trying each prefix length in turn.
    /// Retries up to [`SAMPLING_MAX_RETRIES`] times if no prefix matches
    /// (spec.md §9's `bit_length` quirk makes some labels unassigned).
    pub fn sample_once(&self, rng: &mut impl Rng) -> Result<Vec<u64>, Error> {
        for _ in 0..SAMPLING_MAX_RETRIES {
            let value = if self.depth == 0 { 0 } else { rng.gen_range(0..(1u64 << self.depth)) };
            let label = Label::new(value, self.depth);

            for i in 0..self.depth {
                let (label_leaf, label_block) = label.pop_left(i + 1);
                if let Some(leaf) = self.leaves_labeled.get(&label_leaf) {
                    return Ok(leaf.block_coordinates(label_block));
                }
            }
        }
        Err(Error::SamplingExhausted { retries: SAMPLING_MAX_RETRIES })
    }

    pub fn sample(&self, n_samples: usize, rng: &mut impl Rng) -> Result<Vec<Vec<u64>>, Error> {
        (0..n_samples).map(|_| self.sample_once(rng)).collect()
    }

    pub fn histogram(
        &self,
        n_samples: usize,
        rng: &mut impl Rng,
    ) -> Result<HashMap<Vec<u64>, u64>, Error> {
        let mut histogram = HashMap::new();
        for _ in 0..n_samples {
            let sample = self.sample_once(rng)?;
            *histogram.entry(sample).or_insert(0) += 1;
        }
        Ok(histogram)
    }
}
