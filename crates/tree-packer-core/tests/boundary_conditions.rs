use image::{Rgba, RgbaImage};
use std::path::PathBuf;
use tree_packer_core::config::PackerConfig;
use tree_packer_core::error::TreePackerError;
use tree_packer_core::{pack, pack_layout};

/// Test zero-sized atlas dimensions
#[test]
fn test_zero_width() {
    let cfg = PackerConfig {
        width: 0,
        height: 1024,
        ..Default::default()
    };

    let result = cfg.validate();
    match result {
        Err(TreePackerError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0);
            assert_eq!(height, 1024);
        }
        _ => panic!("Expected InvalidDimensions error"),
    }
}

#[test]
fn test_zero_height() {
    let cfg = PackerConfig {
        width: 1024,
        height: 0,
        ..Default::default()
    };

    match cfg.validate() {
        Err(TreePackerError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 1024);
            assert_eq!(height, 0);
        }
        _ => panic!("Expected InvalidDimensions error"),
    }
}

#[test]
fn test_larger_than_4096() {
    let cfg = PackerConfig {
        width: 4096,
        height: 8192,
        ..Default::default()
    };

    match cfg.validate() {
        Err(TreePackerError::InvalidConfig(msg)) => assert!(msg.contains("8192")),
        _ => panic!("Expected InvalidConfig error"),
    }
}

#[test]
fn test_padding_not_smaller_than_canvas() {
    let cfg = PackerConfig {
        width: 64,
        height: 16,
        padding: 16,
        ..Default::default()
    };

    match cfg.validate() {
        Err(TreePackerError::InvalidConfig(msg)) => assert!(msg.contains("padding")),
        _ => panic!("Expected InvalidConfig error"),
    }

    let ok = PackerConfig {
        padding: 15,
        ..cfg
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn test_non_power_of_two_is_accepted() {
    let cfg = PackerConfig::builder()
        .with_dimensions(300, 17)
        .padding(0)
        .build();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_empty_input_fails_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = PackerConfig::builder()
        .with_dimensions(64, 64)
        .output(dir.path().join("atlas.png"))
        .build();

    let images: Vec<(PathBuf, String)> = Vec::new();
    match pack(images, &cfg) {
        Err(TreePackerError::Empty) => {}
        Err(e) => panic!("Expected Empty error, got {e}"),
        Ok(_) => panic!("Expected Empty error"),
    }
    assert!(!cfg.output_image.exists());
    assert!(!cfg.output_schema.exists());
}

#[test]
fn test_invalid_config_rejected_before_decoding() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a.png");
    RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255]))
        .save(&path)
        .expect("save");

    let cfg = PackerConfig {
        width: 0,
        ..Default::default()
    };
    let result = pack_layout(vec![(path, "a.png".to_string())], &cfg);
    assert!(matches!(
        result,
        Err(TreePackerError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_only_undecodable_inputs_produce_empty_atlas() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").expect("write");

    let cfg = PackerConfig::builder().with_dimensions(32, 32).build();
    let out = pack_layout(vec![(path, "broken.png".to_string())], &cfg).expect("pack");
    assert!(out.schema.is_empty());
    assert_eq!(out.stats.inputs, 1);
    assert_eq!(out.stats.skipped_undecodable, 1);
    assert_eq!(out.stats.packed, 0);
    assert_eq!(out.stats.packed_fraction(), 0.0);
    assert!(out.canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}
