//! Crate-wide error type (spec.md §7).
//!
//! `CombineExhausted` is logged and otherwise non-fatal (spec.md §9) and so
//! never appears here; it is not something callers recover from, it is
//! something the compaction loop in [`crate::leaflist`] already recovered
//! from on the caller's behalf.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("domain error: {0}")]
    Domain(String),

    #[error("sampling exhausted after {retries} retries")]
    SamplingExhausted { retries: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
