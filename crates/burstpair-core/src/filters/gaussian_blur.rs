use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Smooth with a separable Gaussian of `kernel_size` taps (odd, >= 3).
///
/// Sigma follows the usual size-derived rule `0.3 * ((k - 1) * 0.5 - 1) + 0.8`,
/// so a 5-tap kernel uses sigma 1.1. Kernel sizes below 3 return a copy.
pub fn gaussian_smooth(data: &Array2<f32>, kernel_size: usize) -> Array2<f32> {
    if kernel_size < 3 {
        return data.clone();
    }
    let size = kernel_size | 1;
    let sigma = 0.3 * ((size - 1) as f32 * 0.5 - 1.0) + 0.8;
    let kernel = make_gaussian_kernel(size, sigma);
    let row_pass = convolve(data, &kernel, Direction::Rows);
    convolve(&row_pass, &kernel, Direction::Cols)
}

fn make_gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let radius = size / 2;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

#[derive(Clone, Copy)]
enum Direction {
    Rows,
    Cols,
}

/// 1D convolution along one axis with edge clamping.
fn convolve(data: &Array2<f32>, kernel: &[f32], direction: Direction) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() as isize / 2;

    let convolve_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let offset = ki as isize - radius;
                    let v = match direction {
                        Direction::Rows => {
                            let c = (col as isize + offset).clamp(0, w as isize - 1) as usize;
                            data[[row, c]]
                        }
                        Direction::Cols => {
                            let r = (row as isize + offset).clamp(0, h as isize - 1) as usize;
                            data[[r, col]]
                        }
                    };
                    sum += v * kv;
                }
                sum
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(convolve_row).collect()
    } else {
        (0..h).map(convolve_row).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}
