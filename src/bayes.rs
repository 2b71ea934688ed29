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
        // Signed: leaf_bit_depth_range > m is a legitimate no-op threshold
        // (every total_bit_depth is >= 0), not a clamp to 0 (gfs/sample/leaf.py
        // drop_small takes a plain, possibly-negative int).
        let threshold = m as i64 - leaf_bit_depth_range as i64;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Axis;
    use crate::functions::{constant, linear};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct ConstantLikelihood {
        domain: Domain,
        leaves: LeafList,
    }

    impl Likelihood for ConstantLikelihood {
        fn domain(&self) -> &Domain {
            &self.domain
        }
        fn leaves(&self, _datum: &DataPoint) -> Result<LeafList, Error> {
            Ok(self.leaves.clone())
        }
    }

    #[test]
    fn s2_empty_data_is_the_identity_law() {
        let domain = Domain::new(vec![Axis::new("p", 0.0, 1.0, 4)]);
        let prior = linear(4, false);
        let likelihood =
            ConstantLikelihood { domain: domain.clone(), leaves: constant(&[4]) };
        let posterior = update(prior.clone(), &likelihood, &[], 10).unwrap();
        assert_eq!(posterior.total_mass(), prior.total_mass());
    }

    #[test]
    fn update_with_one_datum_narrows_the_posterior_mass() {
        let domain = Domain::new(vec![Axis::new("p", 0.0, 1.0, 4)]);
        let prior = constant(&[4]);
        let likelihood = ConstantLikelihood { domain, leaves: linear(4, false) };
        let datum = DataPoint { id: 0, value: vec![1] };
        let posterior = update(prior, &likelihood, &[datum], 10).unwrap();
        assert!(!posterior.is_empty());
    }

    #[test]
    fn sample_rescales_into_the_domain_bounds() {
        let domain = Domain::new(vec![Axis::new("p", 0.0, 1.0, 4)]);
        let posterior = constant(&[4]);
        let mut rng = StdRng::seed_from_u64(11);
        let samples = sample(posterior, &domain, 20, &mut rng).unwrap();
        assert_eq!(samples.len(), 20);
        for s in &samples {
            assert!(s.values()[0] >= 0.0 && s.values()[0] < 1.0);
        }
    }
}
