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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_config() {
        let toml = r#"
            name = "coin-toss"
            tags = ["demo"]

            [model]
            name = "binomial"
            [model.kwargs]
            bit_depth = 12

            [params]
            n_posterior_samples = 1000
            n_data_points = 20

            [io]
            training_data_file = "data/<< project_name >>_train.csv"
            input_data_file = "data/<< project_name >>_input.csv"
            posterior_file = "out/<< project_name >>_posterior.json"
            posterior_samples_file = "out/<< project_name >>_samples.csv"
            prediction_file = "out/<< project_name >>_prediction.csv"

            [io.preprocessor]
            name = "binomial"
        "#;
        let config: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(config.name, "coin-toss");
        assert_eq!(config.model_bit_depth().unwrap(), 12);
        assert_eq!(config.params.leaf_bit_depth_range, None);
        assert!(config.io.prior_file.is_none());
    }

    #[test]
    fn missing_bit_depth_is_a_config_error() {
        let config = ConfigFile {
            name: "x".into(),
            tags: vec![],
            model: ModelConfig { name: "binomial".into(), kwargs: HashMap::new() },
            params: ParamsConfig {
                n_posterior_samples: 1,
                n_data_points: 1,
                leaf_bit_depth_range: None,
            },
            io: IoConfig {
                training_data_file: "a".into(),
                input_data_file: "b".into(),
                prior_file: None,
                posterior_file: "c".into(),
                posterior_samples_file: "d".into(),
                prediction_file: "e".into(),
                preprocessor: PreprocessorConfig { name: "binomial".into(), kwargs: HashMap::new() },
            },
        };
        assert!(config.model_bit_depth().is_err());
    }
}
