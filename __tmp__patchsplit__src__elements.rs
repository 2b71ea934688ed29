//! Value types at the model/IO boundary: parameter points, category
//! distributions, and the sample/prediction collections built from them
//! (SPEC_FULL.md §3, grounded on `elements.py`).

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One observation: an identifier plus a tuple of discrete integer values
/// (e.g. number of successes, trials).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: u64,
    pub value: Vec<i64>,
}

/// A point in the (rescaled, floating-point) parameter space. Never empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter(Vec<f64>);

impl Parameter {
    pub fn new(values: Vec<f64>) -> Result<Self, Error> {
        if values.is_empty() {
            return Err(Error::Domain("Parameter cannot be empty.".into()));
        }
        Ok(Parameter(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

/// A probability distribution over an ordered set of categories: each entry
/// non-negative, summing to 1 within a `1e-6` tolerance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution(Vec<f64>);

impl Distribution {
    pub fn new(values: Vec<f64>) -> Result<Self, Error> {
        let sum: f64 = values.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(Error::Domain(format!("Distribution must sum to 1, got {sum}")));
        }
        Ok(Distribution(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

/// Posterior parameter samples plus the axis names they're drawn over.
#[derive(Clone, Debug)]
pub struct PosteriorSamples {
    pub axes: Vec<String>,
    pub samples: Vec<Parameter>,
}

impl PosteriorSamples {
    pub fn new(axes: Vec<String>, samples: Vec<Parameter>) -> Self {
        PosteriorSamples { axes, samples }
    }

    /// Frequency count of each distinct parameter tuple. Parameter floats are
    /// compared bit-for-bit, which is exact for values produced by the
    /// domain's rescale since it is a deterministic function of the integer
    /// grid coordinate.
    pub fn histogram(&self) -> std::collections::HashMap<Vec<u64>, u64> {
        let mut hist = std::collections::HashMap::new();
        for sample in &self.samples {
            let key: Vec<u64> = sample.values().iter().map(|v| v.to_bits()).collect();
            *hist.entry(key).or_insert(0) += 1;
        }
        hist
    }
}

/// One predictive distribution per posterior sample, plus the category names
/// shared across all of them.
#[derive(Clone, Debug)]
pub struct PredictiveDists {
    pub categories: Vec<String>,
    pub dists: Vec<Distribution>,
}

impl PredictiveDists {
    pub fn new(categories: Vec<String>, dists: Vec<Distribution>) -> Self {
        PredictiveDists { categories, dists }
    }

    /// The per-category mean across all predictive distributions.
    pub fn mean(&self) -> Result<Distribution, Error> {
        let n = self.dists.len();
        if n == 0 {
            return Err(Error::Domain("cannot average zero predictive distributions".into()));
        }
        let n_cats = self.categories.len();
        let mut means = vec![0.0; n_cats];
        for dist in &self.dists {
            for (i, v) in dist.values().iter().enumerate() {
                means[i] += v / n as f64;
            }
        }
        Distribution::new(means)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_rejects_empty() {
        assert!(Parameter::new(vec![]).is_err());
    }

    #[test]
    fn distribution_rejects_non_unit_sum() {
        assert!(Distribution::new(vec![0.2, 0.2]).is_err());
        assert!(Distribution::new(vec![0.5, 0.5]).is_ok());
    }

    #[test]
    fn distribution_accepts_within_tolerance() {
        assert!(Distribution::new(vec![0.3333335, 0.3333335, 0.333333]).is_ok());
    }

    #[test]
    fn predictive_dists_mean_averages_each_category() {
        let categories = vec!["a".to_string(), "b".to_string()];
        let dists = vec![
            Distribution::new(vec![1.0, 0.0]).unwrap(),
            Distribution::new(vec![0.0, 1.0]).unwrap(),
        ];
        let predictions = PredictiveDists::new(categories, dists);
        let mean = predictions.mean().unwrap();
        assert_eq!(mean.values(), &[0.5, 0.5]);
    }

    #[test]
    fn posterior_samples_histogram_counts_duplicates() {
        let p = Parameter::new(vec![1.0, 2.0]).unwrap();
        let samples = PosteriorSamples::new(vec!["x".into(), "y".into()], vec![p.clone(), p]);
        let hist = samples.histogram();
        assert_eq!(hist.len(), 1);
        assert_eq!(*hist.values().next().unwrap(), 2);
    }
}


