use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BurstError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Dimension mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, BurstError>;

/// Numerical failure while estimating a transform between two frames.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    #[error("Proxy size mismatch: {reference_width}x{reference_height} vs {moving_width}x{moving_height}")]
    SizeMismatch {
        reference_width: usize,
        reference_height: usize,
        moving_width: usize,
        moving_height: usize,
    },

    #[error("Image content is flat (zero variance), correlation is undefined")]
    FlatContent,

    #[error("Only {valid} pixels overlap after warping")]
    InsufficientOverlap { valid: usize },

    #[error("Hessian is singular at iteration {iteration}")]
    SingularHessian { iteration: usize },

    #[error("Diverged at iteration {iteration}: {reason}")]
    Diverged { iteration: usize, reason: String },
}

/// A registration error tagged with the frame it came from.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Registration failed for frame {frame_index}: {error}")]
pub struct RegistrationFailure {
    pub frame_index: usize,
    pub source_path: Option<PathBuf>,
    #[source]
    pub error: RegistrationError,
}
