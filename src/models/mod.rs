//! Model and preprocessor registries.
//!
//! The source dispatches on model/preprocessor name through two plain
//! `dict[str, Type[...]]` tables (`gfs/app/io.py::MODELS, PREPROCESSORS`).
//! Rust has no open class registry to mirror 1:1, so this closes the
//! dispatch over a fixed enum instead: adding a model means adding a variant
//! here, not registering a new dynamic entry (spec.md §9 redesign note).

pub mod binomial;

use crate::bayes::Likelihood;
use crate::domain::Domain;
use crate::elements::{DataPoint, Distribution, Parameter};
use crate::error::Error;
use crate::leaflist::LeafList;

use binomial::{BinomialModel, BinomialPreprocessor};

/// A model bundles a parameter domain, a prior, a likelihood, and the
/// category names of its predictive distribution (spec.md §4.7).
///
/// `Sync`: `commands::predict` fans `dist` out over posterior samples with
/// `rayon`, which needs `&dyn Model` to cross the thread boundary.
pub trait Model: Sync {
    fn param_domain(&self) -> &Domain;
    fn prior(&self) -> &LeafList;
    fn likelihood(&self) -> &dyn Likelihood;
    fn categories(&self) -> &[String];
    fn dist(&self, param: &Parameter, x: Option<&DataPoint>) -> Result<Distribution, Error>;
}

/// The closed set of models this crate knows how to build, keyed by the
/// `[model].name` config field.
pub enum ModelKind {
    Binomial(BinomialModel),
}

impl ModelKind {
    pub fn resolve(name: &str, bit_depth: u32) -> Result<Self, Error> {
        match name {
            "binomial" => Ok(ModelKind::Binomial(BinomialModel::new(bit_depth))),
            other => Err(Error::Config(format!("unknown model: {other}"))),
        }
    }

    pub fn as_model(&self) -> &dyn Model {
        match self {
            ModelKind::Binomial(m) => m,
        }
    }
}

/// A training-data CSV row decoder, resolved by `[io.preprocessor].name`.
pub enum PreprocessorKind {
    Binomial(BinomialPreprocessor),
}

impl PreprocessorKind {
    pub fn resolve(name: &str) -> Result<Self, Error> {
        match name {
            "binomial" => Ok(PreprocessorKind::Binomial(BinomialPreprocessor)),
            other => Err(Error::Config(format!("unknown preprocessor: {other}"))),
        }
    }

    pub fn process_row(&self, row: &csv::StringRecord) -> Result<DataPoint, Error> {
        match self {
            PreprocessorKind::Binomial(p) => p.process_row(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_resolves_binomial_by_name() {
        let model = ModelKind::resolve("binomial", 6).unwrap();
        assert_eq!(model.as_model().categories(), &["tails", "heads"]);
    }

    #[test]
    fn model_kind_rejects_unknown_name() {
        assert!(ModelKind::resolve("nonexistent", 6).is_err());
    }

    #[test]
    fn preprocessor_kind_resolves_binomial_by_name() {
        assert!(PreprocessorKind::resolve("binomial").is_ok());
        assert!(PreprocessorKind::resolve("nonexistent").is_err());
    }
}
