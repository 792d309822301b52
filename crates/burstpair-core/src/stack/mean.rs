use ndarray::Array2;

use crate::error::{BurstError, Result};
use crate::frame::Frame;

/// Fuse the reference and its aligned frames into a per-pixel mean.
///
/// Sums are accumulated as integers in a fixed order (reference first, then
/// `aligned` in sequence order) and divided with truncation toward zero, so
/// the output is byte-identical across runs and thread counts.
pub fn fuse(reference: &Frame, aligned: &[Frame]) -> Result<Frame> {
    let mut acc = MeanAccumulator::new(reference.height(), reference.width());
    acc.add(reference)?;
    for frame in aligned {
        acc.add(frame)?;
    }
    let data = acc.finalize_array();
    Ok(reference.derive(data))
}

/// Incremental mean over u8 frames, one frame in memory at a time.
pub struct MeanAccumulator {
    sum: Array2<u32>,
    count: u32,
}

impl MeanAccumulator {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            sum: Array2::<u32>::zeros((height, width)),
            count: 0,
        }
    }

    pub fn add(&mut self, frame: &Frame) -> Result<()> {
        let (h, w) = self.sum.dim();
        if frame.dim() != (h, w) {
            return Err(BurstError::DimensionMismatch {
                expected_width: w,
                expected_height: h,
                width: frame.width(),
                height: frame.height(),
            });
        }
        self.sum
            .zip_mut_with(&frame.data, |s, &v| *s += u32::from(v));
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Mean frame, or `None` when nothing was added.
    pub fn finalize(self) -> Option<Frame> {
        if self.count == 0 {
            return None;
        }
        Some(Frame::new(self.finalize_array()))
    }

    fn finalize_array(&self) -> Array2<u8> {
        let n = self.count.max(1);
        // A mean of u8 values never exceeds 255.
        self.sum.mapv(|s| (s / n) as u8)
    }
}
