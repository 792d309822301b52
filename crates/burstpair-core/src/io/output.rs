use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::frame::OutputPair;
use crate::pipeline::config::PersistenceConfig;

use super::image_io::save_image;

/// Where the noisy / ground-truth pair is written.
///
/// Directories are created lazily by [`OutputLayout::write_pair`], never at
/// construction.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub noisy_dir: PathBuf,
    pub gt_dir: PathBuf,
    pub extension: String,
}

/// Paths of a written pair.
#[derive(Clone, Debug, PartialEq)]
pub struct WrittenPair {
    pub noisy: PathBuf,
    pub ground_truth: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path, config: &PersistenceConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            noisy_dir: root.join(&config.noisy_dir),
            gt_dir: root.join(&config.gt_dir),
            extension: config.extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn noisy_path(&self, stem: &str) -> PathBuf {
        self.noisy_dir
            .join(format!("{stem}_noisy.{}", self.extension))
    }

    pub fn gt_path(&self, stem: &str) -> PathBuf {
        self.gt_dir.join(format!("{stem}_gt.{}", self.extension))
    }

    /// Write `{stem}_noisy.{ext}` and `{stem}_gt.{ext}`, creating the
    /// subdirectories if needed.
    pub fn write_pair(&self, pair: &OutputPair, stem: &str) -> Result<WrittenPair> {
        std::fs::create_dir_all(&self.noisy_dir)?;
        std::fs::create_dir_all(&self.gt_dir)?;

        let written = WrittenPair {
            noisy: self.noisy_path(stem),
            ground_truth: self.gt_path(stem),
        };
        save_image(&pair.noisy, &written.noisy)?;
        save_image(&pair.ground_truth, &written.ground_truth)?;

        info!(
            noisy = %written.noisy.display(),
            gt = %written.ground_truth.display(),
            "Saved training pair"
        );
        Ok(written)
    }
}
