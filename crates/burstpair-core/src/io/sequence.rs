use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BurstError, Result};
use crate::frame::Frame;
use crate::pipeline::Diagnostic;

use super::image_io::load_image;

/// Frames decoded from an input directory, in filename order.
#[derive(Clone, Debug)]
pub struct LoadedSequence {
    pub frames: Vec<Frame>,
    /// One `DecodeFailed` entry per file that could not be read.
    pub failures: Vec<Diagnostic>,
}

/// List the files in `dir` whose extension is in `extensions`, sorted by file name.
///
/// Extension matching is case-insensitive. Subdirectories are not searched.
pub fn list_inputs(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Decode every recognized image in `dir`.
///
/// Undecodable files are skipped and reported; the ordinal of each frame is
/// its position among the successfully decoded files. Returns
/// [`BurstError::EmptySequence`] when nothing could be decoded.
pub fn load_sequence(dir: &Path, extensions: &[String]) -> Result<LoadedSequence> {
    let paths = list_inputs(dir, extensions)?;
    debug!(dir = %dir.display(), files = paths.len(), "Found input files");

    let mut frames = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        match load_image(&path) {
            Ok(mut frame) => {
                frame.metadata.frame_index = frames.len();
                debug!(
                    file = %path.display(),
                    width = frame.width(),
                    height = frame.height(),
                    "Loaded frame"
                );
                frames.push(frame);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping undecodable image");
                failures.push(Diagnostic::DecodeFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    if frames.is_empty() {
        warn!(dir = %dir.display(), "No decodable images found");
        return Err(BurstError::EmptySequence);
    }

    Ok(LoadedSequence { frames, failures })
}
