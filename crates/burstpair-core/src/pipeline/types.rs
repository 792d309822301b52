use std::path::PathBuf;

use crate::align::FrameOutcome;
use crate::error::RegistrationError;
use crate::frame::{Frame, OutputPair};
use crate::io::output::WrittenPair;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PipelineStage {
    Loading,
    Registration,
    Fusion,
    Cropping,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading frames"),
            Self::Registration => write!(f, "Registering frames"),
            Self::Fusion => write!(f, "Fusing"),
            Self::Cropping => write!(f, "Cropping"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A recoverable problem the pipeline worked around.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// The file could not be decoded and was skipped.
    DecodeFailed { path: PathBuf, reason: String },
    /// The frame's shape differs from the reference and was left out of fusion.
    DimensionMismatch {
        frame_index: usize,
        path: Option<PathBuf>,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Registration failed; the unaligned frame was fused instead.
    RegistrationFallback {
        frame_index: usize,
        path: Option<PathBuf>,
        error: RegistrationError,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecodeFailed { path, reason } => {
                write!(f, "{}: decode failed: {reason}", path.display())
            }
            Self::DimensionMismatch {
                frame_index,
                expected,
                actual,
                ..
            } => write!(
                f,
                "frame {frame_index}: size {}x{} differs from reference {}x{}, skipped",
                actual.1, actual.0, expected.1, expected.0
            ),
            Self::RegistrationFallback {
                frame_index, error, ..
            } => write!(f, "frame {frame_index}: registration failed ({error}), fused unaligned"),
        }
    }
}

/// Per-frame record of the registration stage.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub frame_index: usize,
    pub path: Option<PathBuf>,
    pub outcome: FrameOutcome,
}

/// What happened during a run. Every skip or fallback appears in `diagnostics`.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub reference: Option<PathBuf>,
    /// Frames that decoded successfully, reference included.
    pub frames_loaded: usize,
    /// Frames that went into the mean, reference included.
    pub frames_fused: usize,
    pub frames: Vec<FrameReport>,
    pub diagnostics: Vec<Diagnostic>,
    pub written: Option<WrittenPair>,
    pub comparison: Option<PathBuf>,
}

impl RunReport {
    /// True when any frame was skipped or fused without alignment.
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn registered_count(&self) -> usize {
        self.frames.iter().filter(|f| !f.outcome.is_fallback()).count()
    }

    pub fn fallback_count(&self) -> usize {
        self.frames.iter().filter(|f| f.outcome.is_fallback()).count()
    }
}

/// Result of the pipeline.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub pair: OutputPair,
    /// Full-resolution fused frame, before cropping.
    pub fused: Frame,
    pub report: RunReport,
}
