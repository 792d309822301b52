use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::align::downscale::validate_scale;
use crate::align::ecc::EccParams;
use crate::consts::{
    DEFAULT_CROP_SIZE, DEFAULT_ECC_EPSILON, DEFAULT_GAUSS_FILTER_SIZE, DEFAULT_INPUT_EXTENSIONS,
    DEFAULT_MAX_ITERATIONS, DEFAULT_OUTPUT_EXTENSION, DEFAULT_REGISTRATION_SCALE, GT_DIR_NAME,
    NOISY_DIR_NAME,
};
use crate::error::{BurstError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the burst.
    pub input: PathBuf,
    /// Root directory for the `noisy/` and `gt/` outputs.
    pub output: PathBuf,
    /// Side length of the centered square crop.
    #[serde(default = "default_crop_size")]
    pub crop_size: usize,
    /// Write the three-panel comparison image next to the pair.
    #[serde(default = "default_preview")]
    pub preview: bool,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

fn default_crop_size() -> usize {
    DEFAULT_CROP_SIZE
}

fn default_preview() -> bool {
    true
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            crop_size: DEFAULT_CROP_SIZE,
            preview: true,
            loader: LoaderConfig::default(),
            registration: RegistrationConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }

    /// Checks that do not depend on the input images.
    pub fn validate(&self) -> Result<()> {
        if self.crop_size == 0 {
            return Err(BurstError::InvalidConfig("crop_size must be > 0".into()));
        }
        if self.loader.extensions.is_empty() {
            return Err(BurstError::InvalidConfig(
                "loader.extensions must not be empty".into(),
            ));
        }
        if self.persistence.noisy_dir == self.persistence.gt_dir {
            return Err(BurstError::InvalidConfig(format!(
                "noisy and gt directories must differ (both '{}')",
                self.persistence.noisy_dir
            )));
        }
        self.registration.validate()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// File extensions (without the dot) accepted as input, case-insensitive.
    pub extensions: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_INPUT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Settings for ECC registration on the downscaled proxy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Linear downscale factor for the proxy, in (0, 1].
    pub scale: f64,
    pub max_iterations: usize,
    /// Convergence tolerance on the correlation coefficient.
    pub epsilon: f64,
    /// Gaussian pre-smoothing kernel size; 0 disables.
    pub gauss_filter_size: usize,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_REGISTRATION_SCALE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: DEFAULT_ECC_EPSILON,
            gauss_filter_size: DEFAULT_GAUSS_FILTER_SIZE,
        }
    }
}

impl RegistrationConfig {
    pub fn validate(&self) -> Result<()> {
        validate_scale(self.scale)?;
        if self.max_iterations == 0 {
            return Err(BurstError::InvalidConfig(
                "max_iterations must be >= 1".into(),
            ));
        }
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return Err(BurstError::InvalidConfig(format!(
                "epsilon must be a finite non-negative number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    pub fn ecc_params(&self) -> EccParams {
        EccParams {
            max_iterations: self.max_iterations,
            epsilon: self.epsilon,
            gauss_filter_size: self.gauss_filter_size,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub noisy_dir: String,
    pub gt_dir: String,
    /// Output image extension; also selects the encoder.
    pub extension: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            noisy_dir: NOISY_DIR_NAME.into(),
            gt_dir: GT_DIR_NAME.into(),
            extension: DEFAULT_OUTPUT_EXTENSION.into(),
        }
    }
}
