pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{build_training_pair, run_pipeline, run_pipeline_reported};
pub use types::{
    Diagnostic, FrameReport, NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter,
    RunReport,
};
