//! The Bayesian driver: exact `update` and the `sample` entry point that
//! turns a posterior leaf list into rescaled parameter draws (spec.md §4.7,
//! grounded on `bayes.py`).

use log::{debug, info};
use rand::Rng;

use crate::algebra::multiply;
use crate::domain::Domain;
use crate::elements::{DataPoint, Parameter};
use crate::error::Error;
use crate::leaflist::LeafList;
use crate::tree::Tree;

/// A datum's pointwise likelihood function on the parameter grid. Implemented
/// per model (see [`crate::models`]).
pub trait Likelihood {
    fn domain(&self) -> &Domain;
    fn leaves(&self, datum: &DataPoint) -> Result<LeafList, Error>;
}

/// Iteratively folds each datum's likelihood into the prior via `multiply`,
/// compacting and pruning after each step (spec.md §4.7).
///
/// Partial failure aborts the whole update: if any datum is malformed, no
/// prior state is returned and no later datum is processed.
pub fn update(
    prior: LeafList,
    likelihood: &dyn Likelihood,
    data: &[DataPoint],
    leaf_bit_depth_range: u32,
) -> Result<LeafList, Error> {
    let mut leaves = prior;
    for datum in data {
        info!("updating prior with datum: {datum:?}");
        let datum_leaves = likelihood.leaves(datum)?;
        leaves = multiply(&datum_leaves, &leaves);
        leaves.combine_on_multiplicity();

        let Some(m) = leaves.iter().map(|l| l.total_bit_depth()).max() else {
            debug!("update: leaf list emptied out on datum {datum:?}");
            continue;
        };
        let threshold = m.saturating_sub(leaf_bit_depth_range);
        leaves.drop_small(threshold);
        leaves.reduce_multiplicity();
        debug!("update: {} leaves after datum {datum:?}", leaves.len());
    }
    Ok(leaves)
}

/// Builds a [`Tree`] over the posterior and draws `n` rescaled parameter
/// samples.
pub fn sample(
    posterior: LeafList,
    domain: &Domain,
    n: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Parameter>, Error> {
    info!("sampling posterior: n={n}");
    let tree = Tree::from_leaf_list(posterior);
    debug!("sampling posterior: tree.depth={}", tree.depth());
    let mut samples = Vec::with_capacity(n);
    for _ in 0..n {
        let coords = tree.sample_once(rng)?;
        let scaled = domain.scale(&coords)?;
        samples.push(Parameter::new(scaled)?);
    }
    Ok(samples)
}
