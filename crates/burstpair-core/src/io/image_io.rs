use std::path::Path;

use image::{GrayImage, ImageFormat};
use ndarray::Array2;

use crate::error::Result;
use crate::frame::{Frame, FrameMetadata};

/// Convert a frame into an 8-bit grayscale image buffer.
pub fn to_gray_image(frame: &Frame) -> GrayImage {
    let h = frame.height();
    let w = frame.width();
    GrayImage::from_fn(w as u32, h as u32, |col, row| {
        image::Luma([frame.data[[row as usize, col as usize]]])
    })
}

/// Convert an 8-bit grayscale image buffer into pixel data.
pub fn from_gray_image(img: &GrayImage) -> Array2<u8> {
    let (w, h) = img.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        img.get_pixel(col as u32, row as u32).0[0]
    })
}

/// Save a frame as 8-bit grayscale, choosing the format from the file extension.
///
/// Unknown extensions fall back to TIFF.
pub fn save_image(frame: &Frame, path: &Path) -> Result<()> {
    let img = to_gray_image(frame);
    match ImageFormat::from_path(path) {
        Ok(format) => img.save_with_format(path, format)?,
        Err(_) => img.save_with_format(path, ImageFormat::Tiff)?,
    }
    Ok(())
}

/// Load an image file as an 8-bit grayscale frame.
///
/// Color images are converted to luma; 16-bit data is reduced to 8 bits.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let gray = img.to_luma8();
    let data = from_gray_image(&gray);
    Ok(Frame::with_metadata(
        data,
        FrameMetadata {
            frame_index: 0,
            source: Some(path.to_path_buf()),
        },
    ))
}
