use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// A 2x3 affine transform.
///
/// The matrix maps reference (output) pixel coordinates onto moving (source)
/// pixel coordinates: `[x_m, y_m] = M * [x_r, y_r, 1]`. The resampler reads it
/// in that direction, so applying it pulls moving-frame content into the
/// reference frame's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub matrix: [[f64; 3]; 2],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            matrix: [[1.0, 0.0, tx], [0.0, 1.0, ty]],
        }
    }

    /// Rotation by `theta` radians followed by a translation.
    pub fn euclidean(theta: f64, tx: f64, ty: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            matrix: [[cos, -sin, tx], [sin, cos, ty]],
        }
    }

    pub fn tx(&self) -> f64 {
        self.matrix[0][2]
    }

    pub fn ty(&self) -> f64 {
        self.matrix[1][2]
    }

    /// Rotation angle in radians of the linear part.
    pub fn rotation(&self) -> f64 {
        self.matrix[1][0].atan2(self.matrix[0][0])
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.matrix;
        (
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
        )
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.iter().flatten().all(|v| v.is_finite())
    }

    /// The inverse mapping (moving coordinates onto reference coordinates).
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.matrix;
        let full = Matrix3::new(
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], 0.0, 0.0, 1.0,
        );
        let inv = full.try_inverse()?;
        Some(Self {
            matrix: [
                [inv[(0, 0)], inv[(0, 1)], inv[(0, 2)]],
                [inv[(1, 0)], inv[(1, 1)], inv[(1, 2)]],
            ],
        })
    }

    /// Convert a transform estimated on a proxy downscaled by `scale` into
    /// full-resolution pixel coordinates.
    ///
    /// The linear part is resolution invariant. The translation is not: proxy
    /// pixel `p` covers full-resolution pixel `(p + 0.5) / scale - 0.5`, so a
    /// proxy shift of `t` is a full-resolution shift of roughly `t / scale`.
    /// Applying the proxy matrix unchanged at full resolution leaves the
    /// alignment off by exactly that factor.
    pub fn proxy_to_full(&self, scale: f64) -> Self {
        let m = &self.matrix;
        let k = 0.5 - 0.5 / scale;
        let tx = (m[0][0] + m[0][1]) * k + (m[0][2] + 0.5) / scale - 0.5;
        let ty = (m[1][0] + m[1][1]) * k + (m[1][2] + 0.5) / scale - 0.5;
        Self {
            matrix: [[m[0][0], m[0][1], tx], [m[1][0], m[1][1], ty]],
        }
    }
}

impl std::fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rot={:.4}deg tx={:.3} ty={:.3}",
            self.rotation().to_degrees(),
            self.tx(),
            self.ty()
        )
    }
}
