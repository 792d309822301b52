mod common;

use ndarray::Array2;

use burstpair_core::error::BurstError;
use burstpair_core::frame::Frame;
use burstpair_core::stack::mean::{fuse, MeanAccumulator};

fn uniform(h: usize, w: usize, value: u8) -> Frame {
    Frame::new(Array2::from_elem((h, w), value))
}

#[test]
fn test_fuse_truncates() {
    let reference = uniform(4, 4, 1);
    let fused = fuse(&reference, &[uniform(4, 4, 2)]).unwrap();
    // (1 + 2) / 2 = 1.5 -> 1
    assert!(fused.data.iter().all(|&v| v == 1));

    let fused = fuse(&uniform(2, 2, 255), &[uniform(2, 2, 254), uniform(2, 2, 254)]).unwrap();
    // 763 / 3 = 254.33 -> 254
    assert!(fused.data.iter().all(|&v| v == 254));
}

#[test]
fn test_fuse_reference_only() {
    let clean = common::clean_shifted(24, 32, 0.0, 0.0);
    let reference = Frame::new(common::noisy_frame(&clean, 3, 15.0));
    let fused = fuse(&reference, &[]).unwrap();
    assert_eq!(fused.data, reference.data);
}

#[test]
fn test_fuse_no_overflow_at_full_scale() {
    let frames: Vec<Frame> = (0..40).map(|_| uniform(3, 3, 255)).collect();
    let fused = fuse(&uniform(3, 3, 255), &frames).unwrap();
    assert!(fused.data.iter().all(|&v| v == 255));
}

#[test]
fn test_fuse_within_input_bounds() {
    let frames = common::burst(40, 50, &[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)], 40.0);
    let fused = fuse(&frames[0], &frames[1..]).unwrap();

    for ((r, c), &v) in fused.data.indexed_iter() {
        let values: Vec<u8> = frames.iter().map(|f| f.data[[r, c]]).collect();
        let lo = *values.iter().min().unwrap();
        let hi = *values.iter().max().unwrap();
        assert!(lo <= v && v <= hi, "pixel ({r},{c}) = {v} outside [{lo},{hi}]");
    }
}

#[test]
fn test_fuse_is_deterministic() {
    let frames = common::burst(64, 64, &[(0.0, 0.0), (1.0, 0.0), (0.0, 2.0)], 25.0);
    let a = fuse(&frames[0], &frames[1..]).unwrap();
    let b = fuse(&frames[0], &frames[1..]).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn test_fuse_keeps_reference_metadata() {
    let mut reference = uniform(4, 4, 10);
    reference.metadata.source = Some("IMG_0001.tif".into());
    let fused = fuse(&reference, &[uniform(4, 4, 20)]).unwrap();
    assert_eq!(fused.stem().as_deref(), Some("IMG_0001"));
}

#[test]
fn test_fuse_dimension_mismatch() {
    let err = fuse(&uniform(4, 4, 0), &[uniform(4, 5, 0)]).unwrap_err();
    assert!(matches!(
        err,
        BurstError::DimensionMismatch {
            expected_width: 4,
            width: 5,
            ..
        }
    ));
}

#[test]
fn test_accumulator_matches_fuse() {
    let frames = common::burst(30, 30, &[(0.0, 0.0), (0.5, 0.0), (0.0, 0.5)], 20.0);
    let mut acc = MeanAccumulator::new(30, 30);
    for frame in &frames {
        acc.add(frame).unwrap();
    }
    assert_eq!(acc.count(), 3);
    let streamed = acc.finalize().unwrap();
    let batch = fuse(&frames[0], &frames[1..]).unwrap();
    assert_eq!(streamed.data, batch.data);
}

#[test]
fn test_accumulator_empty_finalizes_to_none() {
    let acc = MeanAccumulator::new(8, 8);
    assert_eq!(acc.count(), 0);
    assert!(acc.finalize().is_none());
}

#[test]
fn test_accumulator_rejects_wrong_size() {
    let mut acc = MeanAccumulator::new(8, 8);
    assert!(acc.add(&uniform(8, 9, 1)).is_err());
    assert_eq!(acc.count(), 0);
}
