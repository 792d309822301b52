use std::sync::Mutex;

use burstpair_core::pipeline::{PipelineStage, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Drives one indicatif bar per pipeline stage.
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    /// Clear any bar left over from an unfinished stage.
    pub fn finish(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let bar = match total_items {
            Some(total) => {
                let bar = ProgressBar::new(total as u64);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{msg:20} [{bar:40}] {pos}/{len}")
                {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar
            }
            None => ProgressBar::new_spinner(),
        };
        bar.set_message(stage.to_string());

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(bar) {
                old.finish_and_clear();
            }
        }
    }

    fn advance(&self, items_done: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.set_position(items_done as u64);
            }
        }
    }

    fn finish_stage(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}
