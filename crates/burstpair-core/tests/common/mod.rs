use std::path::Path;

use ndarray::Array2;

use burstpair_core::frame::{Frame, FrameMetadata};
use burstpair_core::io::image_io::save_image;

/// Smooth synthetic scene, roughly 23..233, defined at any real coordinate.
pub fn scene(x: f64, y: f64) -> f64 {
    128.0
        + 50.0 * (x / 11.0).sin() * (y / 14.0).cos()
        + 35.0 * ((x + 2.0 * y) / 25.0).sin()
        + 20.0 * ((x - y) / 9.0).cos()
}

/// Clean scene sampled on a grid, content translated by `(dx, dy)`.
pub fn clean_shifted(h: usize, w: usize, dx: f64, dy: f64) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| scene(c as f64 - dx, r as f64 - dy))
}

/// Scene rotated by `theta` about the origin, then translated by `(tx, ty)`.
pub fn clean_euclidean(h: usize, w: usize, theta: f64, tx: f64, ty: f64) -> Array2<f64> {
    let (sin, cos) = theta.sin_cos();
    Array2::from_shape_fn((h, w), |(r, c)| {
        let qx = c as f64 - tx;
        let qy = r as f64 - ty;
        // Inverse rotation
        let px = cos * qx + sin * qy;
        let py = -sin * qx + cos * qy;
        scene(px, py)
    })
}

/// Deterministic zero-mean noise in `[-amplitude, amplitude]`.
pub fn noise(seed: u64, r: usize, c: usize, amplitude: f64) -> f64 {
    let mut z = seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((r as u64) << 32 | c as u64);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    let unit = (z >> 11) as f64 / (1u64 << 53) as f64;
    (unit * 2.0 - 1.0) * amplitude
}

pub fn quantize(data: &Array2<f64>) -> Array2<u8> {
    data.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

/// Quantized clean scene plus per-frame noise.
pub fn noisy_frame(clean: &Array2<f64>, seed: u64, amplitude: f64) -> Array2<u8> {
    let mut noisy = clean.clone();
    for ((r, c), v) in noisy.indexed_iter_mut() {
        *v += noise(seed, r, c, amplitude);
    }
    quantize(&noisy)
}

pub fn frame(data: Array2<u8>, index: usize) -> Frame {
    Frame::with_metadata(
        data,
        FrameMetadata {
            frame_index: index,
            source: Some(format!("frame_{index:03}.tif").into()),
        },
    )
}

/// A noisy burst; `shifts[i]` is the content translation of frame i.
pub fn burst(h: usize, w: usize, shifts: &[(f64, f64)], amplitude: f64) -> Vec<Frame> {
    shifts
        .iter()
        .enumerate()
        .map(|(i, &(dx, dy))| {
            let clean = clean_shifted(h, w, dx, dy);
            frame(noisy_frame(&clean, i as u64 + 1, amplitude), i)
        })
        .collect()
}

/// Write frames into `dir` under the given file names.
pub fn write_burst(dir: &Path, names: &[&str], frames: &[Frame]) {
    for (name, frame) in names.iter().zip(frames) {
        save_image(frame, &dir.join(name)).expect("write test frame");
    }
}

/// Mean squared error between an 8-bit image and a reference grid.
pub fn mse(image: &Array2<u8>, reference: &Array2<f64>) -> f64 {
    let n = image.len() as f64;
    image
        .iter()
        .zip(reference.iter())
        .map(|(&a, &b)| (a as f64 - b).powi(2))
        .sum::<f64>()
        / n
}
