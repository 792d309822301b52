use ndarray::s;

use crate::error::{BurstError, Result};
use crate::frame::Frame;

/// A rectangle in image coordinates for cropping.
#[derive(Clone, Debug, PartialEq)]
pub struct CropRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CropRect {
    /// Square `size x size` window centered in a `src_w x src_h` source.
    ///
    /// Offsets use floor division, `(dim - size) / 2`. A zero size or one
    /// larger than the shorter side is rejected rather than clamped.
    pub fn centered(src_w: usize, src_h: usize, size: usize) -> Result<CropRect> {
        if size == 0 {
            return Err(BurstError::InvalidCrop("Crop size must be > 0".into()));
        }
        if size > src_w.min(src_h) {
            return Err(BurstError::InvalidCrop(format!(
                "Crop size {size} exceeds source dimensions ({src_w}x{src_h})"
            )));
        }

        Ok(CropRect {
            x: (src_w - size) / 2,
            y: (src_h - size) / 2,
            width: size,
            height: size,
        })
    }

    /// Half-open row range `[y, y + height)`.
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.y..self.y + self.height
    }

    /// Half-open column range `[x, x + width)`.
    pub fn cols(&self) -> std::ops::Range<usize> {
        self.x..self.x + self.width
    }
}

/// Extract the centered `size x size` window of `image`.
pub fn center_crop(image: &Frame, size: usize) -> Result<Frame> {
    let rect = CropRect::centered(image.width(), image.height(), size)?;
    Ok(crop_frame(image, &rect))
}

/// Copy the window described by an already validated `rect`.
pub fn crop_frame(image: &Frame, rect: &CropRect) -> Frame {
    let window = image.data.slice(s![rect.rows(), rect.cols()]).to_owned();
    image.derive(window)
}
