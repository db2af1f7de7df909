//! File-level runs: decode, enhance, encode.

mod common;

use std::fs;

use enhance_filters::PixelBuffer;
use image_enhance::config::EnhanceConfig;
use image_enhance::{EnhanceOptions, enhance_file, imaging};
use tempfile::tempdir;

fn write_source(dir: &std::path::Path, name: &str, buffer: &PixelBuffer) -> std::path::PathBuf {
    let path = dir.join(name);
    imaging::save(buffer, &path).unwrap();
    path
}

#[test]
fn enhance_png_to_png() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "square.png", &common::gradient(6, 4));
    let output = dir.path().join("square_enhanced.png");

    let options = EnhanceOptions {
        input,
        output: output.clone(),
        config: EnhanceConfig::new(2.0, 0.1, 0.4, 1.5, 0.5),
    };
    let summary = enhance_file(&options).unwrap();

    assert_eq!(summary.original_size, (6, 4));
    assert_eq!(summary.scaled_size, (12, 8));
    assert_eq!(summary.report.stages.len(), 4);

    let written = imaging::load(&output).unwrap();
    assert_eq!(written.dimensions(), (12, 8));
    common::assert_normalized(&written);
}

#[test]
fn white_file_stays_white() {
    let dir = tempdir().unwrap();
    let white = PixelBuffer::filled(2, 2, [1.0; 4]).unwrap();
    let input = write_source(dir.path(), "white.png", &white);
    let output = dir.path().join("out.png");

    enhance_file(&EnhanceOptions {
        input,
        output: output.clone(),
        config: EnhanceConfig::new(2.0, 0.02, 0.4, 2.5, 0.8),
    })
    .unwrap();

    let image = image::open(&output).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (4, 4));
    assert!(image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn jpeg_output_drops_alpha() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "in.png", &common::gradient(4, 4));
    let output = dir.path().join("out.jpg");

    enhance_file(&EnhanceOptions {
        input,
        output: output.clone(),
        config: EnhanceConfig::from_preset(enhance_filters::EnhancePreset::UpscaleOnly),
    })
    .unwrap();

    let decoded = image::open(&output).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (8, 8));
}

#[test]
fn missing_input_reports_path() {
    let dir = tempdir().unwrap();
    let err = enhance_file(&EnhanceOptions {
        input: dir.path().join("nope.png"),
        output: dir.path().join("out.png"),
        config: EnhanceConfig::default(),
    })
    .unwrap_err();

    assert_eq!(err.category(), "codec");
    assert!(err.to_string().contains("nope.png"));
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn invalid_config_fails_before_decoding() {
    let dir = tempdir().unwrap();
    let mut config = EnhanceConfig::default();
    config.scale_factor = 0.0;

    let err = enhance_file(&EnhanceOptions {
        input: dir.path().join("never-read.png"),
        output: dir.path().join("out.png"),
        config,
    })
    .unwrap_err();
    assert_eq!(err.category(), "config");
}

#[test]
fn config_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("enhance.json");
    let mut config = EnhanceConfig::default();
    config.scale_factor = 3.0;
    config.backend = "simd".to_string();
    config.denoise_sigma_range = 0.2;
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = EnhanceConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
    assert_eq!(loaded.build_pipeline().unwrap().settings().denoise_sigma_range, 0.2);
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ scale_factor: ").unwrap();

    let err = EnhanceConfig::load(&path).unwrap_err();
    assert_eq!(err.category(), "config");
}
