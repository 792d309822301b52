use ndarray::Array2;

use burstpair_core::filters::gaussian_blur::gaussian_smooth;

#[test]
fn test_smooth_preserves_mean() {
    let data = Array2::from_shape_fn((32, 32), |(r, c)| ((r * 17 + c * 31) % 97) as f32);
    let smoothed = gaussian_smooth(&data, 5);
    let before = data.sum() / data.len() as f32;
    let after = smoothed.sum() / smoothed.len() as f32;
    // Edge clamping shifts the mean slightly
    assert!((before - after).abs() < 1.0);
}

#[test]
fn test_smooth_reduces_variance() {
    let data = Array2::from_shape_fn((40, 40), |(r, c)| if (r + c) % 2 == 0 { 200.0 } else { 0.0 });
    let smoothed = gaussian_smooth(&data, 5);
    let var = |a: &Array2<f32>| {
        let m = a.sum() / a.len() as f32;
        a.iter().map(|v| (v - m).powi(2)).sum::<f32>() / a.len() as f32
    };
    assert!(var(&smoothed) < var(&data) * 0.25);
}

#[test]
fn test_smooth_impulse_is_symmetric() {
    let mut data = Array2::<f32>::zeros((11, 11));
    data[[5, 5]] = 100.0;
    let smoothed = gaussian_smooth(&data, 5);
    assert!((smoothed[[5, 4]] - smoothed[[5, 6]]).abs() < 1e-5);
    assert!((smoothed[[4, 5]] - smoothed[[6, 5]]).abs() < 1e-5);
    assert!((smoothed[[4, 5]] - smoothed[[5, 4]]).abs() < 1e-5);
    assert!(smoothed[[5, 5]] < 100.0);
    assert_eq!(smoothed[[0, 0]], 0.0);
}

#[test]
fn test_zero_kernel_disables_smoothing() {
    let data = Array2::from_shape_fn((8, 8), |(r, c)| (r * c) as f32);
    assert_eq!(gaussian_smooth(&data, 0), data);
}
