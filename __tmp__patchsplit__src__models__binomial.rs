//! The one concrete model: a biased-coin binomial, grounded on
//! `gfs/models/binomial.py` and `gfs/sample/io.py::BinomialPreprocessor`.

use crate::bayes::Likelihood;
use crate::domain::{Axis, Domain};
use crate::elements::{DataPoint, Distribution, Parameter};
use crate::error::Error;
use crate::functions::{constant, linear};
use crate::leaflist::LeafList;

use super::Model;

/// `y=1` (heads) favours high bias values via an increasing ramp; `y=0`
/// (tails) favours low values via the mirrored ramp.
pub struct BinomialLikelihood {
    domain: Domain,
}

impl BinomialLikelihood {
    pub fn new(domain: Domain) -> Self {
        BinomialLikelihood { domain }
    }
}

impl Likelihood for BinomialLikelihood {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn leaves(&self, datum: &DataPoint) -> Result<LeafList, Error> {
        let bit_depth = self.domain.bit_depth();
        match datum.value.as_slice() {
            [0] => Ok(linear(bit_depth, true)),
            [1] => Ok(linear(bit_depth, false)),
            other => {
                Err(Error::Data(format!("invalid binomial observation: {other:?}")))
            }
        }
    }
}

/// Bias towards heads on `[0, 1]`, discretised to `bit_depth` bits, with a
/// uniform prior and the two-category `("tails", "heads")` predictive.
pub struct BinomialModel {
    pub param_domain: Domain,
    pub prior: LeafList,
    pub likelihood: BinomialLikelihood,
    pub categories: Vec<String>,
}

impl BinomialModel {
    pub fn new(bit_depth: u32) -> Self {
        let axis = Axis::new("bias_towards_heads", 0.0, 1.0, bit_depth);
        let param_domain = Domain::new(vec![axis]);
        BinomialModel {
            prior: constant(&[param_domain.bit_depth()]),
            likelihood: BinomialLikelihood::new(param_domain.clone()),
            param_domain,
            categories: vec!["tails".to_string(), "heads".to_string()],
        }
    }
}

impl Model for BinomialModel {
    fn param_domain(&self) -> &Domain {
        &self.param_domain
    }

    fn prior(&self) -> &LeafList {
        &self.prior
    }

    fn likelihood(&self) -> &dyn Likelihood {
        &self.likelihood
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn dist(&self, param: &Parameter) -> Result<Distribution, Error> {
        let bias_towards_heads = param.values()[0];
        Distribution::new(vec![1.0 - bias_towards_heads, bias_towards_heads])
    }
}

/// `(id, y)` CSV rows, `y` the number of successes (0 or 1).
pub struct BinomialPreprocessor;

impl BinomialPreprocessor {
    pub fn process_row(&self, row: &csv::StringRecord) -> Result<DataPoint, Error> {
        let id = row
            .get(0)
            .ok_or_else(|| Error::Data("missing id column".into()))?
            .parse::<u64>()
            .map_err(|e| Error::Data(format!("invalid id: {e}")))?;

        // y is empty on predict-only rows (spec.md §6 "Training data CSV").
        let y_field = row.get(1).unwrap_or("").trim();
        let value = if y_field.is_empty() {
            Vec::new()
        } else {
            let y = y_field
                .parse::<i64>()
                .map_err(|e| Error::Data(format!("invalid y: {e}")))?;
            vec![y]
        };
        Ok(DataPoint { id, value })
    }
}
