//! Enhanced correlation coefficient (ECC) maximization.
//!
//! Estimates a Euclidean warp (rotation + translation) that maximizes the
//! zero-mean normalized cross-correlation between a template and a warped
//! input image. Each iteration linearizes the warp around the current
//! estimate and solves the resulting 3x3 Gauss-Newton system in closed form.
//!
//! Reference: Evangelidis & Psarakis, "Parametric Image Alignment Using
//! Enhanced Correlation Coefficient Maximization", IEEE TPAMI 30(10), 2008.

use nalgebra::{Matrix3, Vector3};
use ndarray::Array2;
use tracing::debug;

use crate::consts::{FLAT_STD_THRESHOLD, MIN_OVERLAP_PIXELS};
use crate::error::RegistrationError;
use crate::filters::gaussian_blur::gaussian_smooth;

use super::transform::AffineTransform;
use super::warp::warp_planes;

/// Termination and preprocessing settings for one ECC run.
#[derive(Clone, Debug)]
pub struct EccParams {
    /// Hard cap on Gauss-Newton iterations (>= 1).
    pub max_iterations: usize,
    /// Stop once the correlation changes by less than this between iterations.
    pub epsilon: f64,
    /// Gaussian pre-smoothing kernel size; 0 disables smoothing.
    pub gauss_filter_size: usize,
}

/// Result of a converged (or iteration-capped) ECC run.
#[derive(Clone, Debug)]
pub struct EccOutcome {
    pub transform: AffineTransform,
    /// Correlation coefficient measured at the last iteration.
    pub correlation: f64,
    pub iterations: usize,
}

type EccResult<T> = std::result::Result<T, RegistrationError>;

/// Find the Euclidean warp mapping `template` coordinates into `input`.
///
/// Both arrays must have the same shape. `initial` seeds the search; its
/// linear part is interpreted as a pure rotation.
pub fn find_transform_ecc(
    template: &Array2<f32>,
    input: &Array2<f32>,
    initial: AffineTransform,
    params: &EccParams,
) -> EccResult<EccOutcome> {
    let (h, w) = template.dim();
    let (ih, iw) = input.dim();
    if h != ih || w != iw {
        return Err(RegistrationError::SizeMismatch {
            reference_width: w,
            reference_height: h,
            moving_width: iw,
            moving_height: ih,
        });
    }

    let template = gaussian_smooth(template, params.gauss_filter_size);
    let input = gaussian_smooth(input, params.gauss_filter_size);
    let (grad_x, grad_y) = central_gradients(&input);

    let mut theta = initial.rotation();
    let mut tx = initial.tx();
    let mut ty = initial.ty();
    let mut warp = AffineTransform::euclidean(theta, tx, ty);

    let mut rho = -1.0f64;
    let mut iterations = 0;

    while iterations < params.max_iterations.max(1) {
        iterations += 1;
        let last_rho = rho;

        let step = ecc_step(&template, &input, &grad_x, &grad_y, &warp, iterations)?;
        rho = step.rho;

        theta += step.delta[0];
        tx += step.delta[1];
        ty += step.delta[2];
        warp = AffineTransform::euclidean(theta, tx, ty);

        if !warp.is_finite() {
            return Err(RegistrationError::Diverged {
                iteration: iterations,
                reason: "warp parameters became non-finite".into(),
            });
        }

        if (rho - last_rho).abs() < params.epsilon {
            break;
        }
    }

    debug!(iterations, correlation = rho, %warp, "ECC finished");

    Ok(EccOutcome {
        transform: warp,
        correlation: rho,
        iterations,
    })
}

struct EccStep {
    rho: f64,
    delta: Vector3<f64>,
}

/// One linearized ECC update at the current warp.
fn ecc_step(
    template: &Array2<f32>,
    input: &Array2<f32>,
    grad_x: &Array2<f32>,
    grad_y: &Array2<f32>,
    warp: &AffineTransform,
    iteration: usize,
) -> EccResult<EccStep> {
    let ([image_w, gx_w, gy_w], mask) = warp_planes([input, grad_x, grad_y], warp);

    // Means over the overlap region
    let mut valid = 0usize;
    let mut sum_t = 0.0f64;
    let mut sum_i = 0.0f64;
    for ((&m, &t), &i) in mask.iter().zip(template.iter()).zip(image_w.iter()) {
        if m {
            valid += 1;
            sum_t += t as f64;
            sum_i += i as f64;
        }
    }
    if valid < MIN_OVERLAP_PIXELS {
        return Err(RegistrationError::InsufficientOverlap { valid });
    }
    let mean_t = sum_t / valid as f64;
    let mean_i = sum_i / valid as f64;

    let cos = warp.matrix[0][0];
    let sin = warp.matrix[1][0];

    // Upper triangle of J^T J, row-major: (00, 01, 02, 11, 12, 22)
    let mut hess = [0.0f64; 6];
    let mut image_proj = Vector3::<f64>::zeros();
    let mut template_proj = Vector3::<f64>::zeros();
    let mut correlation = 0.0f64;
    let mut image_norm2 = 0.0f64;
    let mut template_norm2 = 0.0f64;

    for ((row, col), &m) in mask.indexed_iter() {
        if !m {
            continue;
        }
        let tz = template[[row, col]] as f64 - mean_t;
        let iz = image_w[[row, col]] as f64 - mean_i;
        let gx = gx_w[[row, col]] as f64;
        let gy = gy_w[[row, col]] as f64;

        let x = col as f64;
        let y = row as f64;
        let hat_x = -(x * sin) - (y * cos);
        let hat_y = x * cos - y * sin;
        let j = [gx * hat_x + gy * hat_y, gx, gy];

        hess[0] += j[0] * j[0];
        hess[1] += j[0] * j[1];
        hess[2] += j[0] * j[2];
        hess[3] += j[1] * j[1];
        hess[4] += j[1] * j[2];
        hess[5] += j[2] * j[2];

        for k in 0..3 {
            image_proj[k] += j[k] * iz;
            template_proj[k] += j[k] * tz;
        }

        correlation += tz * iz;
        image_norm2 += iz * iz;
        template_norm2 += tz * tz;
    }

    let n = valid as f64;
    if (template_norm2 / n).sqrt() < FLAT_STD_THRESHOLD || (image_norm2 / n).sqrt() < FLAT_STD_THRESHOLD
    {
        return Err(RegistrationError::FlatContent);
    }

    let rho = correlation / (image_norm2.sqrt() * template_norm2.sqrt());
    if !rho.is_finite() {
        return Err(RegistrationError::Diverged {
            iteration,
            reason: "correlation coefficient is not finite".into(),
        });
    }

    let hessian = Matrix3::new(
        hess[0], hess[1], hess[2], hess[1], hess[3], hess[4], hess[2], hess[4], hess[5],
    );
    let hessian_inv = hessian
        .try_inverse()
        .filter(|m| m.iter().all(|v| v.is_finite()))
        .ok_or(RegistrationError::SingularHessian { iteration })?;

    let image_proj_hess = hessian_inv * image_proj;
    let lambda_n = image_norm2 - image_proj.dot(&image_proj_hess);
    let lambda_d = correlation - template_proj.dot(&image_proj_hess);
    if lambda_d <= 0.0 {
        return Err(RegistrationError::Diverged {
            iteration,
            reason: "correlation would be minimized; images may be uncorrelated or non-overlapping"
                .into(),
        });
    }
    let lambda = lambda_n / lambda_d;

    // J^T (lambda * template_zm - image_zm)
    let error_proj = template_proj * lambda - image_proj;
    let delta = hessian_inv * error_proj;

    Ok(EccStep { rho, delta })
}

/// Central-difference gradients `0.5 * (I[x+1] - I[x-1])`, clamped at the edges.
fn central_gradients(data: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
    let (h, w) = data.dim();
    let mut gx = Array2::<f32>::zeros((h, w));
    let mut gy = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        let up = row.saturating_sub(1);
        let down = (row + 1).min(h - 1);
        for col in 0..w {
            let left = col.saturating_sub(1);
            let right = (col + 1).min(w - 1);
            gx[[row, col]] = 0.5 * (data[[row, right]] - data[[row, left]]);
            gy[[row, col]] = 0.5 * (data[[down, col]] - data[[up, col]]);
        }
    }

    (gx, gy)
}
