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
        if let Some(&v) = values.iter().find(|&&v| v < 0.0) {
            return Err(Error::Domain(format!("Distribution entries must be non-negative, got {v}")));
        }
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
