use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::RegistrationFailure;
use crate::frame::Frame;

use super::estimator::{estimate_transform, Registration, TransformEstimator};
use super::warp::apply_transform;

/// How a frame entered the fusion stack.
#[derive(Clone, Debug)]
pub enum FrameOutcome {
    /// Registered and resampled into the reference geometry.
    Registered(Registration),
    /// Registration failed; the raw frame is used instead.
    Fallback(RegistrationFailure),
}

impl FrameOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// A frame ready for fusion, aligned or substituted.
#[derive(Clone, Debug)]
pub struct AlignedFrame {
    pub frame: Frame,
    pub outcome: FrameOutcome,
}

/// Register and resample one frame, falling back to the raw frame on failure.
pub fn align_frame(
    reference: &Frame,
    frame: &Frame,
    estimator: &dyn TransformEstimator,
) -> AlignedFrame {
    match estimate_transform(estimator, reference, frame) {
        Ok(registration) => {
            debug!(
                frame = frame.index(),
                transform = %registration.transform,
                correlation = registration.correlation,
                iterations = registration.iterations,
                "Registered frame"
            );
            let aligned = apply_transform(frame, &registration.transform, reference.dim());
            AlignedFrame {
                frame: aligned,
                outcome: FrameOutcome::Registered(registration),
            }
        }
        Err(failure) => {
            warn!(
                frame = failure.frame_index,
                error = %failure.error,
                "Registration failed, fusing the unaligned frame"
            );
            AlignedFrame {
                frame: frame.clone(),
                outcome: FrameOutcome::Fallback(failure),
            }
        }
    }
}

/// Align every frame in `frames` to `reference`, preserving sequence order.
///
/// Frames are independent of each other, so large batches run on the rayon
/// pool. `on_frame_done` receives the running count of finished frames.
pub fn align_to_reference<F>(
    reference: &Frame,
    frames: &[Frame],
    estimator: &dyn TransformEstimator,
    on_frame_done: F,
) -> Vec<AlignedFrame>
where
    F: Fn(usize) + Send + Sync,
{
    let counter = AtomicUsize::new(0);
    let process = |frame: &Frame| {
        let aligned = align_frame(reference, frame, estimator);
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done);
        aligned
    };

    if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames.par_iter().map(process).collect()
    } else {
        frames.iter().map(process).collect()
    }
}
