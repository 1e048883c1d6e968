use tree_packer_core::prelude::*;

fn sample_schema() -> AtlasSchema {
    let mut schema = AtlasSchema::new(AtlasMeta {
        filename: "atlas.png".into(),
        width: 256,
        height: 128,
        padding: 1,
    });
    schema.insert("b.png", AtlasEntry::from(Rect::new(1, 1, 10, 10)));
    schema.insert("a.png", AtlasEntry::from(Rect::new(13, 1, 32, 16)));
    schema
}

#[test]
fn export_json_smoke() {
    let schema = sample_schema();
    let v = tree_packer_core::to_json(&schema);
    let obj = v.as_object().expect("object");
    assert!(obj.contains_key("meta"));
    assert!(obj.contains_key("atlas"));
    assert_eq!(v["meta"]["filename"], "atlas.png");
    assert_eq!(v["meta"]["width"], 256);
    assert_eq!(v["atlas"]["a.png"]["x"], 13);
    assert_eq!(v["atlas"]["a.png"]["height"], 16);

    // serde form and the hand-built value agree
    assert_eq!(serde_json::to_value(&schema).expect("to_value"), v);
}

#[test]
fn write_schema_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema = sample_schema();
    for pretty in [false, true] {
        let path = dir.path().join(format!("atlas_{pretty}.json"));
        tree_packer_core::write_schema(&path, &schema, pretty).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text.contains('\n'), pretty);
        let back: AtlasSchema = serde_json::from_str(&text).expect("parse");
        assert_eq!(back, schema);
    }
}

#[test]
fn write_errors_carry_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing_dir").join("atlas.json");
    match tree_packer_core::write_schema(&path, &sample_schema(), false) {
        Err(TreePackerError::Io { path: p, .. }) => assert_eq!(p, path),
        _ => panic!("Expected Io error"),
    }

    let png = dir.path().join("missing_dir").join("atlas.png");
    let canvas = image::RgbaImage::new(2, 2);
    match tree_packer_core::write_canvas(&png, &canvas) {
        Err(TreePackerError::Image { path: p, .. }) => assert_eq!(p, png),
        _ => panic!("Expected Image error"),
    }
}

#[test]
fn stats_summary_mentions_counts() {
    let stats = PackStats {
        inputs: 4,
        decoded: 4,
        packed: 3,
        skipped_oversize: 1,
        canvas_area: 100,
        used_area: 25,
        ..Default::default()
    };
    assert!((stats.packed_fraction() - 0.75).abs() < 1e-9);
    assert!((stats.occupancy() - 0.25).abs() < 1e-9);
    let s = stats.summary();
    assert!(s.contains("3/4"));
    assert!(s.contains("75.0%"));
}
