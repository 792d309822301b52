//! Inverse-mapped affine resampling.
//!
//! Every output pixel is mapped through the transform into source coordinates
//! and sampled bilinearly. Neighbors that fall outside the source contribute
//! [`BORDER_VALUE`], so a coordinate entirely outside the frame produces the
//! border value and one straddling the edge blends toward it.

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{BORDER_VALUE, PARALLEL_PIXEL_THRESHOLD};
use crate::frame::Frame;

use super::transform::AffineTransform;

/// Resample `frame` through `transform` into an `output_shape` (height, width) grid.
pub fn apply_transform(
    frame: &Frame,
    transform: &AffineTransform,
    output_shape: (usize, usize),
) -> Frame {
    let source = frame.to_f32();
    let border = f32::from(BORDER_VALUE);
    let (h, w) = output_shape;

    let warp_row = |row: usize| -> Vec<u8> {
        (0..w)
            .map(|col| {
                let (src_x, src_y) = transform.apply(col as f64, row as f64);
                let v = bilinear_sample(&source, src_y, src_x, border);
                v.round().clamp(0.0, 255.0) as u8
            })
            .collect()
    };

    let rows: Vec<Vec<u8>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(warp_row).collect()
    } else {
        (0..h).map(warp_row).collect()
    };

    let mut result = Array2::<u8>::from_elem((h, w), BORDER_VALUE);
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }

    frame.derive(result)
}

/// Bilinear sample at `(y, x)`; neighbors outside the array read as `border`.
pub fn bilinear_sample(data: &Array2<f32>, y: f64, x: f64, border: f32) -> f32 {
    let (h, w) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let sample = |r: i64, c: i64| -> f32 {
        if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
            data[[r as usize, c as usize]]
        } else {
            border
        }
    };

    let v00 = sample(y0, x0);
    let v10 = sample(y0, x1);
    let v01 = sample(y1, x0);
    let v11 = sample(y1, x1);

    v00 * (1.0 - fx) * (1.0 - fy)
        + v10 * fx * (1.0 - fy)
        + v01 * (1.0 - fx) * fy
        + v11 * fx * fy
}

/// Warp several same-shaped f32 planes through one transform.
///
/// Returns the warped planes plus a mask of output pixels whose source
/// coordinate lies inside the source frame. Used by the ECC loop, which warps
/// the image and both of its gradients with the same geometry.
pub(crate) fn warp_planes<const N: usize>(
    planes: [&Array2<f32>; N],
    transform: &AffineTransform,
) -> ([Array2<f32>; N], Array2<bool>) {
    let (h, w) = planes[0].dim();
    let max_x = (w - 1) as f64;
    let max_y = (h - 1) as f64;

    let mut warped: [Array2<f32>; N] = std::array::from_fn(|_| Array2::<f32>::zeros((h, w)));
    let mut mask = Array2::<bool>::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            let (src_x, src_y) = transform.apply(col as f64, row as f64);
            if !(0.0..=max_x).contains(&src_x) || !(0.0..=max_y).contains(&src_y) {
                continue;
            }
            mask[[row, col]] = true;
            for (out, plane) in warped.iter_mut().zip(planes.iter()) {
                out[[row, col]] = bilinear_sample(plane, src_y, src_x, 0.0);
            }
        }
    }

    (warped, mask)
}
