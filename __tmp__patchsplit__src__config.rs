//! TOML config parsing (spec.md §6 "Config (TOML)"; grounded on
//! `gfs/app/io.py::load_project`'s flat table reads).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Default `leaf_bit_depth_range` when the config omits it
/// (`gfs/constants.py::LEAF_BIT_DEPTH_RANGE`).
pub const DEFAULT_LEAF_BIT_DEPTH_RANGE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub model: ModelConfig,
    pub params: ParamsConfig,
    pub io: IoConfig,
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    #[serde(default)]
    pub kwargs: HashMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ParamsConfig {
    pub n_posterior_samples: usize,
    pub n_data_points: usize,
    pub leaf_bit_depth_range: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct IoConfig {
    pub training_data_file: String,
    pub input_data_file: String,
    pub prior_file: Option<String>,
    pub posterior_file: String,
    pub posterior_samples_file: String,
    pub prediction_file: String,
    pub preprocessor: PreprocessorConfig,
}

#[derive(Debug, Deserialize)]
pub struct PreprocessorConfig {
    pub name: String,
    #[serde(default)]
    pub kwargs: HashMap<String, toml::Value>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: ConfigFile = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The model's `bit_depth` kwarg, the only model-specific parameter the
    /// binomial model needs.
    pub fn model_bit_depth(&self) -> Result<u32, Error> {
        self.model
            .kwargs
            .get("bit_depth")
            .and_then(|v| v.as_integer())
            .map(|v| v as u32)
            .ok_or_else(|| Error::Config("model.kwargs.bit_depth is required".into()))
    }
}
