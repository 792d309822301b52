use std::sync::Arc;

use tracing::{info, warn};

use crate::align::{align_to_reference, EccEstimator, FrameOutcome, TransformEstimator};
use crate::error::{BurstError, Result};
use crate::frame::{Frame, OutputPair};
use crate::io::crop::{crop_frame, CropRect};
use crate::io::output::OutputLayout;
use crate::io::preview::save_comparison;
use crate::io::sequence::load_sequence;
use crate::stack::mean::fuse;

use super::config::PipelineConfig;
use super::types::{
    Diagnostic, FrameReport, NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter,
    RunReport,
};

/// Stem used for output names when the reference has no source path.
const FALLBACK_STEM: &str = "frame";

/// Run the full pipeline with ECC registration and no progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    let estimator = Arc::new(EccEstimator::new(config.registration.clone())?);
    run_pipeline_reported(config, estimator, Arc::new(NoOpReporter))
}

/// Run the full pipeline: load, register, fuse, crop, write.
///
/// Fatal conditions (invalid config, empty input, oversize crop, I/O errors)
/// abort before anything is written. Per-file and per-frame problems are
/// recorded in the report instead.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    estimator: Arc<dyn TransformEstimator>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Loading, None);
    let loaded = load_sequence(&config.input, &config.loader.extensions)?;
    info!(
        frames = loaded.frames.len(),
        skipped = loaded.failures.len(),
        dir = %config.input.display(),
        "Loaded burst"
    );
    reporter.finish_stage();

    let stem = loaded.frames[0]
        .stem()
        .unwrap_or_else(|| FALLBACK_STEM.to_string());

    let mut output =
        build_training_pair(loaded.frames, estimator.as_ref(), config.crop_size, &reporter)?;
    let mut diagnostics = loaded.failures;
    diagnostics.append(&mut output.report.diagnostics);
    output.report.diagnostics = diagnostics;

    reporter.begin_stage(PipelineStage::Writing, None);
    let layout = OutputLayout::new(&config.output, &config.persistence);
    output.report.written = Some(layout.write_pair(&output.pair, &stem)?);
    if config.preview {
        let path = save_comparison(&output.pair, &config.output)?;
        info!(path = %path.display(), "Saved comparison");
        output.report.comparison = Some(path);
    }
    reporter.finish_stage();

    if output.report.is_degraded() {
        warn!(
            diagnostics = output.report.diagnostics.len(),
            "Run completed with degraded frames"
        );
    }

    Ok(output)
}

/// Register, fuse and crop an in-memory burst. Performs no I/O.
///
/// `frames[0]` is the reference. Frames whose shape differs from it are
/// dropped with a diagnostic; the crop size is validated against the
/// reference before any registration work starts.
pub fn build_training_pair(
    frames: Vec<Frame>,
    estimator: &dyn TransformEstimator,
    crop_size: usize,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    let mut frames = frames.into_iter();
    let reference = frames.next().ok_or(BurstError::EmptySequence)?;
    let rect = CropRect::centered(reference.width(), reference.height(), crop_size)?;

    let mut report = RunReport {
        reference: reference.metadata.source.clone(),
        frames_loaded: 1,
        ..Default::default()
    };

    let mut others = Vec::new();
    for frame in frames {
        report.frames_loaded += 1;
        if frame.dim() != reference.dim() {
            warn!(
                frame = frame.index(),
                width = frame.width(),
                height = frame.height(),
                "Frame size differs from reference, skipping"
            );
            report.diagnostics.push(Diagnostic::DimensionMismatch {
                frame_index: frame.index(),
                path: frame.metadata.source.clone(),
                expected: reference.dim(),
                actual: frame.dim(),
            });
            continue;
        }
        others.push(frame);
    }

    reporter.begin_stage(PipelineStage::Registration, Some(others.len()));
    info!(
        frames = others.len(),
        estimator = estimator.name(),
        "Registering frames to reference"
    );
    let r = reporter.clone();
    let aligned = align_to_reference(&reference, &others, estimator, move |done| {
        r.advance(done);
    });
    reporter.finish_stage();

    let mut stack = Vec::with_capacity(aligned.len());
    for item in aligned {
        if let FrameOutcome::Fallback(ref failure) = item.outcome {
            report.diagnostics.push(Diagnostic::RegistrationFallback {
                frame_index: failure.frame_index,
                path: failure.source_path.clone(),
                error: failure.error.clone(),
            });
        }
        report.frames.push(FrameReport {
            frame_index: item.frame.index(),
            path: item.frame.metadata.source.clone(),
            outcome: item.outcome,
        });
        stack.push(item.frame);
    }

    reporter.begin_stage(PipelineStage::Fusion, Some(stack.len() + 1));
    let fused = fuse(&reference, &stack)?;
    report.frames_fused = stack.len() + 1;
    info!(
        frames = report.frames_fused,
        registered = report.registered_count(),
        fallbacks = report.fallback_count(),
        "Fusion complete"
    );
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Cropping, None);
    let pair = OutputPair {
        noisy: crop_frame(&reference, &rect),
        ground_truth: crop_frame(&fused, &rect),
    };
    reporter.finish_stage();

    Ok(PipelineOutput {
        pair,
        fused,
        report,
    })
}
