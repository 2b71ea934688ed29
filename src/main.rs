//! CLI entry point: four subcommands over a project config (spec.md §6),
//! each resolving a [`Project`] from the config file plus per-subcommand
//! overrides and handing it to [`gfs_sample::commands`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;

use gfs_sample::commands;
use gfs_sample::project::{Overrides, Project};
use gfs_sample::Error;

#[derive(Parser, Debug)]
#[command(
    name = "gfs-sample",
    version,
    about = "Exact Bayesian inference on discretised parameter domains",
    rename_all = "snake_case"
)]
struct Cli {
    /// Path to the project's TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise the log level to Debug and seed the sampler deterministically
    /// (spec.md §6 "Environment"; SPEC_FULL.md §6 "--debug").
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
enum Command {
    /// Update a prior leaf list on training data, writing a posterior.
    UpdatePrior(OverrideArgs),
    /// Draw samples from a posterior leaf list.
    SamplePosterior(OverrideArgs),
    /// Count distinct grid points in a posterior samples CSV.
    Histogram(OverrideArgs),
    /// Average the predictive distribution over a posterior, per input row.
    Predict(OverrideArgs),
}

/// Per-subcommand flags overriding config fields (spec.md §6).
#[derive(Args, Debug, Default)]
#[command(rename_all = "snake_case")]
struct OverrideArgs {
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    prior_file: Option<String>,
    #[arg(long)]
    posterior_file: Option<String>,
    #[arg(long)]
    posterior_samples_file: Option<String>,
    #[arg(long)]
    n_data_points: Option<usize>,
    #[arg(long)]
    n_posterior_samples: Option<usize>,
    #[arg(long)]
    input_data_file: Option<String>,
}

impl From<OverrideArgs> for Overrides {
    fn from(a: OverrideArgs) -> Self {
        Overrides {
            tags: a.tags.map(|t| t.split(',').map(str::to_string).collect()),
            prior_file: a.prior_file,
            posterior_file: a.posterior_file,
            posterior_samples_file: a.posterior_samples_file,
            n_data_points: a.n_data_points,
            n_posterior_samples: a.n_posterior_samples,
            input_data_file: a.input_data_file,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new().filter_level(resolve_log_level(cli.debug)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `LOGGING` sets the level (`DEBUG`, `INFO`, `WARNING`, `ERROR`; default
/// `INFO`), matching the Python source's `logging` level names rather than
/// `log`'s Rust-native spellings; `--debug` overrides it unconditionally.
fn resolve_log_level(debug: bool) -> LevelFilter {
    if debug {
        return LevelFilter::Debug;
    }
    match std::env::var("LOGGING").ok().map(|v| v.to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => LevelFilter::Debug,
        Some("WARNING") | Some("WARN") => LevelFilter::Warn,
        Some("ERROR") | Some("CRITICAL") => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config_path = cli
        .config
        .ok_or_else(|| Error::Config("--config <path> is required".into()))?;

    // --debug seeds the sampler deterministically for reproducible runs
    // (spec.md §5 "tests must be able to seed it"; SPEC_FULL.md §6).
    let mut rng = if cli.debug { StdRng::seed_from_u64(0) } else { StdRng::from_entropy() };

    match cli.command {
        Command::UpdatePrior(args) => {
            let project = Project::load(&config_path, args.into())?;
            commands::update_prior(&project)
        }
        Command::SamplePosterior(args) => {
            let project = Project::load(&config_path, args.into())?;
            commands::sample_posterior(&project, &mut rng)
        }
        Command::Histogram(args) => {
            let project = Project::load(&config_path, args.into())?;
            commands::histogram(&project)
        }
        Command::Predict(args) => {
            let project = Project::load(&config_path, args.into())?;
            commands::predict(&project)
        }
    }
}
