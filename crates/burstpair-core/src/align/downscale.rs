//! Reduced-resolution proxies for the registration search.
//!
//! Output pixel `(r, c)` samples the source at `((r + 0.5) / scale - 0.5,
//! (c + 0.5) / scale - 0.5)`, which is the pixel-center convention that
//! [`AffineTransform::proxy_to_full`](super::transform::AffineTransform::proxy_to_full)
//! inverts. At `scale = 0.5` every output pixel is the exact mean of a 2x2 block.

use ndarray::Array2;

use crate::error::{BurstError, Result};

/// Downscale `data` by a linear factor in `(0, 1]`.
pub fn downscale(data: &Array2<f32>, scale: f64) -> Result<Array2<f32>> {
    validate_scale(scale)?;
    Ok(resample_proxy(data, scale))
}

/// Downscale with an already validated factor.
pub(crate) fn resample_proxy(data: &Array2<f32>, scale: f64) -> Array2<f32> {
    if scale == 1.0 {
        return data.clone();
    }

    let (h, w) = data.dim();
    let (new_h, new_w) = proxy_dims(h, w, scale);
    let mut result = Array2::<f32>::zeros((new_h, new_w));

    for r in 0..new_h {
        let src_y = (r as f64 + 0.5) / scale - 0.5;
        for c in 0..new_w {
            let src_x = (c as f64 + 0.5) / scale - 0.5;
            result[[r, c]] = sample_clamped(data, src_y, src_x);
        }
    }

    result
}

/// Proxy dimensions for a `h x w` source, never smaller than 1x1.
pub fn proxy_dims(h: usize, w: usize, scale: f64) -> (usize, usize) {
    let new_h = ((h as f64 * scale).floor() as usize).max(1);
    let new_w = ((w as f64 * scale).floor() as usize).max(1);
    (new_h, new_w)
}

pub fn validate_scale(scale: f64) -> Result<()> {
    if !(scale > 0.0 && scale <= 1.0) {
        return Err(BurstError::InvalidConfig(format!(
            "registration scale must be in (0, 1], got {scale}"
        )));
    }
    Ok(())
}

/// Bilinear sample with coordinates clamped to the frame edge.
fn sample_clamped(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();
    let y = y.clamp(0.0, (h - 1) as f64);
    let x = x.clamp(0.0, (w - 1) as f64);

    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);
    let fy = (y - y0 as f64) as f32;
    let fx = (x - x0 as f64) as f32;

    let top = data[[y0, x0]] * (1.0 - fx) + data[[y0, x1]] * fx;
    let bottom = data[[y1, x0]] * (1.0 - fx) + data[[y1, x1]] * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_scale_is_block_average() {
        let data = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as f32);
        let small = downscale(&data, 0.5).unwrap();
        assert_eq!(small.dim(), (2, 2));
        // (0 + 1 + 4 + 5) / 4
        assert!((small[[0, 0]] - 2.5).abs() < 1e-6);
        // (10 + 11 + 14 + 15) / 4
        assert!((small[[1, 1]] - 12.5).abs() < 1e-6);
    }

    #[test]
    fn odd_dimensions_floor() {
        assert_eq!(proxy_dims(601, 599, 0.5), (300, 299));
        assert_eq!(proxy_dims(1, 1, 0.25), (1, 1));
    }

    #[test]
    fn rejects_out_of_range_scale() {
        let data = Array2::<f32>::zeros((4, 4));
        assert!(downscale(&data, 0.0).is_err());
        assert!(downscale(&data, 1.5).is_err());
        assert!(downscale(&data, f64::NAN).is_err());
    }
}
