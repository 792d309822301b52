use ndarray::Array2;

use burstpair_core::error::BurstError;
use burstpair_core::frame::Frame;
use burstpair_core::io::crop::{center_crop, crop_frame, CropRect};

/// Frame whose pixel value encodes its position.
fn position_frame(h: usize, w: usize) -> Frame {
    Frame::new(Array2::from_shape_fn((h, w), |(r, c)| ((r * 7 + c * 13) % 256) as u8))
}

#[test]
fn test_centered_rect_offsets() {
    let rect = CropRect::centered(1000, 1000, 512).unwrap();
    assert_eq!(rect.x, 244);
    assert_eq!(rect.y, 244);
    assert_eq!(rect.rows(), 244..756);
    assert_eq!(rect.cols(), 244..756);
}

#[test]
fn test_centered_rect_odd_remainder_floors() {
    // (601 - 512) / 2 = 44, (700 - 512) / 2 = 94
    let rect = CropRect::centered(601, 700, 512).unwrap();
    assert_eq!(rect.x, 44);
    assert_eq!(rect.y, 94);
}

#[test]
fn test_crop_equal_to_image_is_identity() {
    let frame = position_frame(64, 64);
    let cropped = center_crop(&frame, 64).unwrap();
    assert_eq!(cropped.data, frame.data);
}

#[test]
fn test_center_crop_takes_middle_window() {
    let frame = position_frame(1000, 1000);
    let cropped = center_crop(&frame, 512).unwrap();
    assert_eq!(cropped.dim(), (512, 512));
    assert_eq!(cropped.data[[0, 0]], frame.data[[244, 244]]);
    assert_eq!(cropped.data[[511, 511]], frame.data[[755, 755]]);
    assert_eq!(cropped.data[[10, 300]], frame.data[[254, 544]]);
}

#[test]
fn test_crop_rectangular_source() {
    let frame = position_frame(600, 800);
    let rect = CropRect::centered(frame.width(), frame.height(), 512).unwrap();
    assert_eq!((rect.x, rect.y), (144, 44));
    let cropped = crop_frame(&frame, &rect);
    assert_eq!(cropped.data[[0, 0]], frame.data[[44, 144]]);
}

#[test]
fn test_oversize_crop_fails() {
    let frame = position_frame(400, 1000);
    let err = center_crop(&frame, 512).unwrap_err();
    assert!(matches!(err, BurstError::InvalidCrop(_)));
}

#[test]
fn test_zero_crop_fails() {
    assert!(matches!(
        CropRect::centered(100, 100, 0),
        Err(BurstError::InvalidCrop(_))
    ));
}

#[test]
fn test_crop_keeps_metadata() {
    let mut frame = position_frame(32, 32);
    frame.metadata.frame_index = 3;
    frame.metadata.source = Some("burst/IMG_0003.tif".into());
    let cropped = center_crop(&frame, 16).unwrap();
    assert_eq!(cropped.metadata, frame.metadata);
}
