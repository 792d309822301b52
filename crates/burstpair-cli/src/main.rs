mod commands;
mod progress;
mod summary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "burstpair",
    about = "Build noisy / ground-truth training pairs from image bursts"
)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for registration (default: all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the frames that would be loaded from a directory
    Info(commands::info::InfoArgs),
    /// Estimate the transform between two images
    Register(commands::register::RegisterArgs),
    /// Register, fuse and crop a burst into a training pair
    Run(commands::pipeline::RunArgs),
    /// Print or save the default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the thread pool")?;
    }

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Register(args) => commands::register::run(args),
        Commands::Run(args) => commands::pipeline::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
