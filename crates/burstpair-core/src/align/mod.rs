mod dispatcher;
pub mod downscale;
pub mod ecc;
mod estimator;
pub mod transform;
pub mod warp;

pub use dispatcher::{align_frame, align_to_reference, AlignedFrame, FrameOutcome};
pub use estimator::{estimate_transform, EccEstimator, Registration, TransformEstimator};
pub use transform::AffineTransform;
pub use warp::{apply_transform, bilinear_sample};
