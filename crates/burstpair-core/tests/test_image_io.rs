mod common;

use ndarray::Array2;
use tempfile::TempDir;

use burstpair_core::error::BurstError;
use burstpair_core::frame::{Frame, OutputPair};
use burstpair_core::io::image_io::{load_image, save_image};
use burstpair_core::io::output::OutputLayout;
use burstpair_core::io::preview::save_comparison;
use burstpair_core::io::sequence::{list_inputs, load_sequence};
use burstpair_core::pipeline::config::PersistenceConfig;
use burstpair_core::pipeline::Diagnostic;

fn tif_extensions() -> Vec<String> {
    vec!["tif".into(), "tiff".into()]
}

fn gradient_frame(h: usize, w: usize, offset: usize) -> Frame {
    Frame::new(Array2::from_shape_fn((h, w), |(r, c)| ((r * 3 + c + offset) % 256) as u8))
}

#[test]
fn test_tiff_round_trip_is_lossless() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.tif");
    let frame = gradient_frame(37, 53, 0);
    save_image(&frame, &path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.data, frame.data);
    assert_eq!(loaded.source(), Some(path.as_path()));
    assert_eq!(loaded.stem().as_deref(), Some("frame"));
}

#[test]
fn test_png_round_trip_is_lossless() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.png");
    let frame = gradient_frame(20, 30, 5);
    save_image(&frame, &path).unwrap();
    assert_eq!(load_image(&path).unwrap().data, frame.data);
}

#[test]
fn test_color_input_is_converted_to_gray() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("color.png");
    image::RgbImage::from_pixel(8, 6, image::Rgb([120, 120, 120]))
        .save(&path)
        .unwrap();
    let frame = load_image(&path).unwrap();
    assert_eq!(frame.dim(), (6, 8));
    assert!(frame.data.iter().all(|&v| v.abs_diff(120) <= 1));
}

#[test]
fn test_list_inputs_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    for name in ["b.tif", "a.tiff", "c.TIF", "notes.txt", "d.png"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("sub.tif")).unwrap();

    let names: Vec<String> = list_inputs(dir.path(), &tif_extensions())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.tiff", "b.tif", "c.TIF"]);
}

#[test]
fn test_load_sequence_orders_by_name() {
    let dir = TempDir::new().unwrap();
    let frames = [gradient_frame(16, 16, 0), gradient_frame(16, 16, 1), gradient_frame(16, 16, 2)];
    common::write_burst(dir.path(), &["img_10.tif", "img_02.tif", "img_01.tif"], &frames);

    let loaded = load_sequence(dir.path(), &tif_extensions()).unwrap();
    assert!(loaded.failures.is_empty());
    let stems: Vec<String> = loaded.frames.iter().map(|f| f.stem().unwrap()).collect();
    assert_eq!(stems, vec!["img_01", "img_02", "img_10"]);
    let indices: Vec<usize> = loaded.frames.iter().map(|f| f.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(loaded.frames[0].data, frames[2].data);
}

#[test]
fn test_load_sequence_skips_undecodable() {
    let dir = TempDir::new().unwrap();
    common::write_burst(
        dir.path(),
        &["a.tif", "c.tif"],
        &[gradient_frame(8, 8, 0), gradient_frame(8, 8, 9)],
    );
    std::fs::write(dir.path().join("b.tif"), b"not a tiff").unwrap();

    let loaded = load_sequence(dir.path(), &tif_extensions()).unwrap();
    assert_eq!(loaded.frames.len(), 2);
    // Ordinals count decoded frames only
    assert_eq!(loaded.frames[1].index(), 1);
    assert_eq!(loaded.frames[1].stem().as_deref(), Some("c"));
    assert_eq!(loaded.failures.len(), 1);
    assert!(matches!(
        &loaded.failures[0],
        Diagnostic::DecodeFailed { path, .. } if path.ends_with("b.tif")
    ));
}

#[test]
fn test_load_sequence_empty_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"nothing here").unwrap();
    let err = load_sequence(dir.path(), &tif_extensions()).unwrap_err();
    assert!(matches!(err, BurstError::EmptySequence));
}

#[test]
fn test_load_sequence_all_corrupt() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.tif"), b"junk").unwrap();
    let err = load_sequence(dir.path(), &tif_extensions()).unwrap_err();
    assert!(matches!(err, BurstError::EmptySequence));
}

#[test]
fn test_load_sequence_missing_dir() {
    let dir = TempDir::new().unwrap();
    let err = load_sequence(&dir.path().join("absent"), &tif_extensions()).unwrap_err();
    assert!(matches!(err, BurstError::Io(_)));
}

#[test]
fn test_output_layout_paths() {
    let layout = OutputLayout::new(std::path::Path::new("/data/out"), &PersistenceConfig::default());
    assert_eq!(
        layout.noisy_path("IMG_0001"),
        std::path::Path::new("/data/out/noisy/IMG_0001_noisy.tif")
    );
    assert_eq!(
        layout.gt_path("IMG_0001"),
        std::path::Path::new("/data/out/gt/IMG_0001_gt.tif")
    );
}

#[test]
fn test_write_pair_creates_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("dataset");
    let config = PersistenceConfig {
        extension: ".png".into(),
        ..PersistenceConfig::default()
    };
    let layout = OutputLayout::new(&root, &config);
    assert!(!root.exists());

    let pair = OutputPair {
        noisy: gradient_frame(12, 12, 0),
        ground_truth: gradient_frame(12, 12, 4),
    };
    let written = layout.write_pair(&pair, "shot").unwrap();
    assert_eq!(written.noisy, root.join("noisy").join("shot_noisy.png"));
    assert_eq!(written.ground_truth, root.join("gt").join("shot_gt.png"));
    assert_eq!(load_image(&written.noisy).unwrap().data, pair.noisy.data);
    assert_eq!(load_image(&written.ground_truth).unwrap().data, pair.ground_truth.data);
}

#[test]
fn test_save_comparison_writes_png() {
    let dir = TempDir::new().unwrap();
    let pair = OutputPair {
        noisy: gradient_frame(10, 10, 0),
        ground_truth: gradient_frame(10, 10, 1),
    };
    let path = save_comparison(&pair, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("comparison.png"));
    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (30 + 2 * 8, 10));
}
