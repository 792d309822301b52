use std::path::PathBuf;

use anyhow::{Context, Result};
use burstpair_core::align::{EccEstimator, TransformEstimator};
use burstpair_core::io::image_io::load_image;
use burstpair_core::pipeline::config::RegistrationConfig;
use clap::Args;

#[derive(Args)]
pub struct RegisterArgs {
    /// Reference image
    pub reference: PathBuf,

    /// Image to align to the reference
    pub moving: PathBuf,

    #[command(flatten)]
    pub registration: RegistrationArgs,
}

/// ECC settings shared by `register` and `run`.
#[derive(Args, Clone)]
pub struct RegistrationArgs {
    /// Downscale factor for the registration proxy, in (0, 1]
    #[arg(long)]
    pub scale: Option<f64>,

    /// ECC iteration cap
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// ECC convergence tolerance on the correlation coefficient
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Gaussian pre-smoothing kernel size (0 disables)
    #[arg(long)]
    pub gauss_filter_size: Option<usize>,
}

impl RegistrationArgs {
    /// Overlay any flags that were given onto `base`.
    pub fn apply(&self, base: &mut RegistrationConfig) {
        if let Some(scale) = self.scale {
            base.scale = scale;
        }
        if let Some(n) = self.max_iterations {
            base.max_iterations = n;
        }
        if let Some(eps) = self.epsilon {
            base.epsilon = eps;
        }
        if let Some(k) = self.gauss_filter_size {
            base.gauss_filter_size = k;
        }
    }
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    let mut config = RegistrationConfig::default();
    args.registration.apply(&mut config);
    let estimator = EccEstimator::new(config)?;

    let reference = load_image(&args.reference)
        .with_context(|| format!("Failed to load {}", args.reference.display()))?;
    let moving = load_image(&args.moving)
        .with_context(|| format!("Failed to load {}", args.moving.display()))?;

    let scale = estimator.config().scale;
    let proxy = estimator.estimate_proxy(&reference, &moving)?;
    let full = proxy.transform.proxy_to_full(scale);

    println!("Estimator:    {}", estimator.name());
    println!("Scale:        {}", scale);
    println!("Iterations:   {}", proxy.iterations);
    println!("Correlation:  {:.6}", proxy.correlation);
    println!("Proxy:        {}", proxy.transform);
    println!("Full-res:     {}", full);
    let m = full.matrix;
    println!(
        "Matrix:       [{:.6} {:.6} {:.3}; {:.6} {:.6} {:.3}]",
        m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2]
    );
    Ok(())
}
