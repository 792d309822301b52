use tracing::debug;

use crate::error::{RegistrationError, RegistrationFailure, Result};
use crate::frame::Frame;
use crate::pipeline::config::RegistrationConfig;

use super::downscale::resample_proxy;
use super::ecc::find_transform_ecc;
use super::transform::AffineTransform;

/// A successful registration of one frame against the reference.
#[derive(Clone, Debug)]
pub struct Registration {
    /// Full-resolution transform, reference coordinates to moving coordinates.
    pub transform: AffineTransform,
    pub correlation: f64,
    pub iterations: usize,
}

/// Estimates the geometric transform between a reference and a moving frame.
///
/// Implementations must be pure: the pipeline calls them concurrently from
/// the rayon pool with a shared reference frame.
pub trait TransformEstimator: Send + Sync {
    fn name(&self) -> &str;

    fn estimate(
        &self,
        reference: &Frame,
        moving: &Frame,
    ) -> std::result::Result<Registration, RegistrationError>;
}

/// ECC registration on a downscaled proxy with a Euclidean motion model.
#[derive(Clone, Debug)]
pub struct EccEstimator {
    config: RegistrationConfig,
}

impl EccEstimator {
    pub fn new(config: RegistrationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Run ECC on the proxies and return the estimate in proxy coordinates.
    pub fn estimate_proxy(
        &self,
        reference: &Frame,
        moving: &Frame,
    ) -> std::result::Result<Registration, RegistrationError> {
        let scale = self.config.scale;
        let small_ref = resample_proxy(&reference.to_f32(), scale);
        let small_mov = resample_proxy(&moving.to_f32(), scale);

        let outcome = find_transform_ecc(
            &small_ref,
            &small_mov,
            AffineTransform::IDENTITY,
            &self.config.ecc_params(),
        )?;

        Ok(Registration {
            transform: outcome.transform,
            correlation: outcome.correlation,
            iterations: outcome.iterations,
        })
    }
}

impl Default for EccEstimator {
    fn default() -> Self {
        Self {
            config: RegistrationConfig::default(),
        }
    }
}

impl TransformEstimator for EccEstimator {
    fn name(&self) -> &str {
        "ECC (Euclidean)"
    }

    fn estimate(
        &self,
        reference: &Frame,
        moving: &Frame,
    ) -> std::result::Result<Registration, RegistrationError> {
        let proxy = self.estimate_proxy(reference, moving)?;
        // The proxy translation is in downscaled pixels and must be rescaled
        // before the resampler applies it at full resolution.
        let transform = proxy.transform.proxy_to_full(self.config.scale);
        debug!(
            frame = moving.index(),
            proxy = %proxy.transform,
            full = %transform,
            "Converted proxy transform to full resolution"
        );
        Ok(Registration { transform, ..proxy })
    }
}

/// Estimate the transform for `moving`, tagging any failure with its identity.
pub fn estimate_transform(
    estimator: &dyn TransformEstimator,
    reference: &Frame,
    moving: &Frame,
) -> std::result::Result<Registration, RegistrationFailure> {
    estimator
        .estimate(reference, moving)
        .map_err(|error| RegistrationFailure {
            frame_index: moving.index(),
            source_path: moving.metadata.source.clone(),
            error,
        })
}
