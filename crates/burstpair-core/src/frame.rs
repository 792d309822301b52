use std::path::{Path, PathBuf};

use ndarray::Array2;

/// A single 8-bit grayscale frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<u8>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    pub fn with_metadata(data: Array2<u8>, metadata: FrameMetadata) -> Self {
        Self { data, metadata }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn index(&self) -> usize {
        self.metadata.frame_index
    }

    pub fn source(&self) -> Option<&Path> {
        self.metadata.source.as_deref()
    }

    /// File stem of the source path, used to name outputs.
    pub fn stem(&self) -> Option<String> {
        self.metadata
            .source
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Pixel data as f32 in the original 0..=255 range.
    pub fn to_f32(&self) -> Array2<f32> {
        self.data.mapv(f32::from)
    }

    /// Same metadata, new pixel data.
    pub fn derive(&self, data: Array2<u8>) -> Self {
        Self {
            data,
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    /// Ordinal position in the loaded sequence.
    pub frame_index: usize,
    pub source: Option<PathBuf>,
}

/// The noisy sample and its fused ground truth, cropped to the same window.
#[derive(Clone, Debug)]
pub struct OutputPair {
    pub noisy: Frame,
    pub ground_truth: Frame,
}
