//! Side-by-side visual check of a training pair.

use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};

use crate::consts::{COMPARISON_FILE_NAME, COMPARISON_GUTTER};
use crate::error::Result;
use crate::frame::{Frame, OutputPair};

/// Render noisy | ground truth | 50/50 blend, separated by white gutters.
pub fn render_comparison(pair: &OutputPair) -> GrayImage {
    let w = pair.noisy.width() as u32;
    let h = pair.noisy.height() as u32;
    let panel_stride = w + COMPARISON_GUTTER;
    let mut canvas = GrayImage::from_pixel(3 * w + 2 * COMPARISON_GUTTER, h, Luma([255]));

    let overlay = blend(&pair.noisy, &pair.ground_truth);
    for (i, panel) in [&pair.noisy, &pair.ground_truth, &overlay].iter().enumerate() {
        let x0 = i as u32 * panel_stride;
        for ((row, col), &v) in panel.data.indexed_iter() {
            canvas.put_pixel(x0 + col as u32, row as u32, Luma([v]));
        }
    }

    canvas
}

/// Render the comparison and save it as `{dir}/comparison.png`.
pub fn save_comparison(pair: &OutputPair, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(COMPARISON_FILE_NAME);
    render_comparison(pair).save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}

/// Equal-weight blend, rounded to nearest.
fn blend(a: &Frame, b: &Frame) -> Frame {
    let mut data = a.data.clone();
    data.zip_mut_with(&b.data, |x, &y| {
        *x = ((u16::from(*x) + u16::from(y) + 1) / 2) as u8;
    });
    a.derive(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn panels_and_gutters() {
        let pair = OutputPair {
            noisy: Frame::new(Array2::from_elem((4, 4), 10u8)),
            ground_truth: Frame::new(Array2::from_elem((4, 4), 21u8)),
        };
        let img = render_comparison(&pair);
        assert_eq!(img.dimensions(), (12 + 2 * COMPARISON_GUTTER, 4));
        assert_eq!(img.get_pixel(0, 0).0[0], 10);
        assert_eq!(img.get_pixel(4, 0).0[0], 255);
        assert_eq!(img.get_pixel(4 + COMPARISON_GUTTER, 2).0[0], 21);
        // (10 + 21 + 1) / 2
        assert_eq!(img.get_pixel(2 * (4 + COMPARISON_GUTTER), 3).0[0], 16);
    }
}
