//! A fully resolved project: config file merged with CLI overrides, path
//! templates substituted, model/preprocessor resolved to concrete types
//! (spec.md §6 "Config (TOML)"; grounded on `gfs/app/project.py::Project`).

use std::path::Path;

use crate::config::{ConfigFile, DEFAULT_LEAF_BIT_DEPTH_RANGE};
use crate::error::Error;
use crate::models::{ModelKind, PreprocessorKind};

/// Per-subcommand flag overrides, applied over the config file's fields
/// (spec.md §6 "Per-subcommand flags override config fields").
#[derive(Debug, Default)]
pub struct Overrides {
    pub tags: Option<Vec<String>>,
    pub prior_file: Option<String>,
    pub posterior_file: Option<String>,
    pub posterior_samples_file: Option<String>,
    pub n_data_points: Option<usize>,
    pub n_posterior_samples: Option<usize>,
    pub input_data_file: Option<String>,
}

pub struct Project {
    pub name: String,
    pub tags: Vec<String>,
    pub model: ModelKind,
    pub preprocessor: PreprocessorKind,
    pub n_posterior_samples: usize,
    pub n_data_points: usize,
    pub leaf_bit_depth_range: u32,
    training_data_file: String,
    input_data_file: String,
    prior_file: Option<String>,
    posterior_file: String,
    posterior_samples_file: String,
    prediction_file: String,
}

impl Project {
    pub fn load(config_path: &Path, overrides: Overrides) -> Result<Self, Error> {
        let config = ConfigFile::load(config_path)?;
        Self::from_config(config, overrides)
    }

    fn from_config(config: ConfigFile, overrides: Overrides) -> Result<Self, Error> {
        let bit_depth = config.model_bit_depth()?;
        let model = ModelKind::resolve(&config.model.name, bit_depth)?;
        let preprocessor = PreprocessorKind::resolve(&config.io.preprocessor.name)?;

        let tags = overrides.tags.unwrap_or(config.tags);
        let n_posterior_samples =
            overrides.n_posterior_samples.unwrap_or(config.params.n_posterior_samples);
        let n_data_points = overrides.n_data_points.unwrap_or(config.params.n_data_points);
        let leaf_bit_depth_range =
            config.params.leaf_bit_depth_range.unwrap_or(DEFAULT_LEAF_BIT_DEPTH_RANGE);

        let mut project = Project {
            name: config.name,
            tags,
            model,
            preprocessor,
            n_posterior_samples,
            n_data_points,
            leaf_bit_depth_range,
            training_data_file: config.io.training_data_file,
            input_data_file: overrides.input_data_file.unwrap_or(config.io.input_data_file),
            prior_file: overrides.prior_file.or(config.io.prior_file),
            posterior_file: overrides.posterior_file.unwrap_or(config.io.posterior_file),
            posterior_samples_file: overrides
                .posterior_samples_file
                .unwrap_or(config.io.posterior_samples_file),
            prediction_file: config.io.prediction_file,
        };
        project.render_paths();
        Ok(project)
    }

    fn template_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("project_name", self.name.clone()),
            ("tags", self.tags.join("_")),
            ("n_posterior_samples", self.n_posterior_samples.to_string()),
            ("n_data_points", self.n_data_points.to_string()),
        ]
    }

    fn render(&self, input: &str) -> String {
        let mut output = input.to_string();
        for (token, value) in self.template_values() {
            output = output.replace(&format!("<< {token} >>"), &value);
        }
        output
    }

    fn render_paths(&mut self) {
        self.training_data_file = self.render(&self.training_data_file);
        self.input_data_file = self.render(&self.input_data_file);
        self.prior_file = self.prior_file.as_deref().map(|p| self.render(p));
        self.posterior_file = self.render(&self.posterior_file);
        self.posterior_samples_file = self.render(&self.posterior_samples_file);
        self.prediction_file = self.render(&self.prediction_file);
    }

    pub fn training_data_file(&self) -> &str {
        &self.training_data_file
    }
    pub fn input_data_file(&self) -> &str {
        &self.input_data_file
    }
    pub fn prior_file(&self) -> Option<&str> {
        self.prior_file.as_deref()
    }
    pub fn posterior_file(&self) -> &str {
        &self.posterior_file
    }
    pub fn posterior_samples_file(&self) -> &str {
        &self.posterior_samples_file
    }
    pub fn posterior_histogram_file(&self) -> String {
        self.posterior_samples_file.replace(".csv", "_histogram.csv")
    }
    pub fn prediction_file(&self) -> &str {
        &self.prediction_file
    }

    /// One prediction CSV per input row (spec.md §6 "predict"): the
    /// configured `prediction_file` with the row's datum id spliced in
    /// before the extension, the same way `posterior_histogram_file`
    /// derives its name from `posterior_samples_file`.
    pub fn prediction_file_for(&self, id: u64) -> String {
        match self.prediction_file.rsplit_once('.') {
            Some((base, ext)) => format!("{base}_{id}.{ext}"),
            None => format!("{}_{id}", self.prediction_file),
        }
    }
}
