//! The four CLI subcommands (spec.md §6): `update_prior`, `sample_posterior`,
//! `histogram`, `predict`. Each takes a resolved [`Project`] and does exactly
//! the read/compute/write the spec's table describes; `main.rs` only parses
//! flags and builds the `Project`.

use std::path::Path;

use log::info;
use rand::Rng;
use rayon::prelude::*;

use crate::bayes;
use crate::elements::{Distribution, PosteriorSamples, PredictiveDists};
use crate::error::Error;
use crate::io;
use crate::project::Project;

/// Reads training data and an optional prior, folds every datum into the
/// prior via `bayes::update`, and writes the posterior leaf list.
pub fn update_prior(project: &Project) -> Result<(), Error> {
    let model = project.model.as_model();

    let prior = match project.prior_file() {
        Some(path) => io::load_leaves(Path::new(path))?,
        None => model.prior().clone(),
    };

    let mut data =
        io::load_training_data(Path::new(project.training_data_file()), &project.preprocessor)?;
    data.truncate(project.n_data_points);
    info!("update_prior: updating on {} data points", data.len());

    let posterior = bayes::update(prior, model.likelihood(), &data, project.leaf_bit_depth_range)?;
    info!("update_prior: posterior has {} leaves", posterior.len());

    io::export_leaves(&posterior, Path::new(project.posterior_file()))
}

/// Draws `n_posterior_samples` rescaled parameter samples from the posterior
/// leaf list and writes them as CSV.
pub fn sample_posterior(project: &Project, rng: &mut impl Rng) -> Result<(), Error> {
    let model = project.model.as_model();
    let posterior = io::load_leaves(Path::new(project.posterior_file()))?;

    let samples =
        bayes::sample(posterior, model.param_domain(), project.n_posterior_samples, rng)?;
    let axes = model.param_domain().names().into_iter().map(str::to_string).collect();
    let posterior_samples = PosteriorSamples::new(axes, samples);

    io::export_posterior_samples(
        &posterior_samples,
        Path::new(project.posterior_samples_file()),
    )
}

/// Reads posterior samples and writes the count of each distinct grid point
/// that occurred.
pub fn histogram(project: &Project) -> Result<(), Error> {
    let samples = io::load_posterior_samples(Path::new(project.posterior_samples_file()))?;
    io::export_histogram(&samples, Path::new(&project.posterior_histogram_file()))
}

/// For each input row, averages the model's predictive distribution over
/// every posterior sample and writes one prediction CSV per row (spec.md §6
/// "predict": "one prediction CSV per input row").
pub fn predict(project: &Project) -> Result<(), Error> {
    let model = project.model.as_model();
    let samples = io::load_posterior_samples(Path::new(project.posterior_samples_file()))?;
    let inputs =
        io::load_input_data(Path::new(project.input_data_file()), &project.preprocessor)?;
    info!("predict: averaging over {} posterior samples for {} input rows", samples.samples.len(), inputs.len());

    for datum in &inputs {
        let dists: Result<Vec<Distribution>, Error> = samples
            .samples
            .par_iter()
            .map(|param| model.dist(param, Some(datum)))
            .collect();
        let predictive = PredictiveDists::new(model.categories().to_vec(), dists?);
        let mean = predictive.mean()?;

        let path = project.prediction_file_for(datum.id);
        io::export_prediction(&mean, model.categories(), Path::new(&path))?;
    }
    Ok(())
}
