use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use burstpair_core::align::EccEstimator;
use burstpair_core::pipeline::config::PipelineConfig;
use burstpair_core::pipeline::run_pipeline_reported;
use clap::Args;
use tracing::info;

use super::register::RegistrationArgs;
use crate::progress::BarReporter;
use crate::summary::{print_pipeline_summary, print_run_report};

#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the burst
    pub input: PathBuf,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output root; pairs go to <output>/noisy and <output>/gt
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Side length of the centered crop
    #[arg(long)]
    pub crop: Option<usize>,

    /// Comma-separated input extensions
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Output image extension (tif, png, ...)
    #[arg(long)]
    pub extension: Option<String>,

    /// Skip the comparison image
    #[arg(long)]
    pub no_preview: bool,

    #[command(flatten)]
    pub registration: RegistrationArgs,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;
    print_pipeline_summary(&config);

    let estimator = Arc::new(EccEstimator::new(config.registration.clone())?);
    let reporter = Arc::new(BarReporter::new());

    let output = run_pipeline_reported(&config, estimator, reporter.clone())
        .with_context(|| format!("Pipeline failed for {}", config.input.display()))?;
    reporter.finish();

    print_run_report(&output.report);
    Ok(())
}

/// Start from the config file (if any) and overlay command-line flags.
fn load_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: PipelineConfig =
            toml::from_str(&contents).context("Invalid pipeline config")?;
        info!(path = %config_path.display(), "Loaded pipeline config");
        config.input = args.input.clone();
        config
    } else {
        PipelineConfig::new(args.input.clone(), PathBuf::from("output"))
    };

    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    if let Some(crop) = args.crop {
        config.crop_size = crop;
    }
    if let Some(ref exts) = args.extensions {
        config.loader.extensions = exts.clone();
    }
    if let Some(ref ext) = args.extension {
        config.persistence.extension = ext.clone();
    }
    if args.no_preview {
        config.preview = false;
    }
    args.registration.apply(&mut config.registration);

    Ok(config)
}
