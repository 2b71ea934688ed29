//! `gfs_sample`: exact Bayesian inference on discretised parameter domains,
//! represented as unions of dyadic hyper-rectangular blocks with integer
//! multiplicities (spec.md §1).
//!
//! Modules, bottom-up (spec.md §2):
//! - `bitlabel`: fixed-width bit-label arithmetic.
//! - `geometry`: `Side`/`Leaf` block geometry.
//! - `leaflist`: `LeafList`, the multiset of leaves, plus compaction passes.
//! - `functions`: primitive mass functions (`constant`, `linear`).
//! - `algebra`: exact cartesian `multiply`.
//! - `tree`: labelled prefix tree and uniform-blockwise sampler.
//! - `domain`: named axes and integer-to-float rescale.
//! - `bayes`: the Bayesian driver (`update`, `sample`) and `Likelihood`.
//! - `models`: the model/preprocessor registry and the binomial model.
//! - `elements`: value types at the model/IO boundary.
//! - `config`, `project`: TOML config loading and path templating.
//! - `io`: leaf-list JSON and CSV encode/decode.
//! - `commands`: the four CLI subcommands.
//! - `error`: the crate-wide error type.

pub mod algebra;
pub mod bayes;
pub mod bitlabel;
pub mod commands;
pub mod config;
pub mod domain;
pub mod elements;
pub mod error;
pub mod functions;
pub mod geometry;
pub mod io;
pub mod leaflist;
pub mod models;
pub mod project;
pub mod tree;

pub use error::{Error, Result};


