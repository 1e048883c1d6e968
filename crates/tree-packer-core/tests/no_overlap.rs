use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use tree_packer_core::prelude::*;

fn padded(e: &AtlasEntry, padding: u32) -> Rect {
    Rect::new(
        e.x - padding,
        e.y - padding,
        e.width + padding * 2,
        e.height + padding * 2,
    )
}

#[test]
fn tree_placements_are_disjoint_and_in_bounds() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let (cw, ch) = (rng.gen_range(16..=256), rng.gen_range(16..=256));
        let mut tree = PartitionTree::new(cw, ch);
        let mut placed: Vec<Rect> = Vec::new();
        for key in 0..200u32 {
            let w = rng.gen_range(1..=cw / 2);
            let h = rng.gen_range(1..=ch / 2);
            let could_fit = tree.fits(w, h);
            match tree.insert(key, w, h) {
                Some(r) => {
                    assert!(could_fit);
                    assert_eq!((r.w, r.h), (w, h));
                    assert!(tree.bounds().contains(&r));
                    placed.push(r);
                }
                None => assert!(!could_fit),
            }
        }
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
        let leaf_area: u64 = tree.leaves().iter().map(|(r, _)| r.area()).sum();
        assert_eq!(leaf_area, tree.bounds().area());
        assert_eq!(tree.occupied().len(), placed.len());
    }
}

#[test]
fn oversize_is_rejected_regardless_of_content() {
    let mut tree = PartitionTree::new(32, 32);
    assert!(tree.insert(0u32, 4, 4).is_some());
    assert!(tree.insert(1u32, 33, 1).is_none());
    assert!(tree.insert(2u32, 1, 33).is_none());
    assert!(tree.insert(3u32, 4, 4).is_some());
}

#[test]
fn packed_images_do_not_overlap_with_padding() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);
    let padding = 2;
    let mut images = Vec::new();
    for i in 0..40 {
        let (w, h) = (rng.gen_range(1..=20), rng.gen_range(1..=20));
        let name = format!("img{i}.png");
        let path = dir.path().join(&name);
        RgbaImage::from_pixel(w, h, Rgba([i as u8 + 1, 0, 0, 255]))
            .save(&path)
            .expect("save");
        images.push((path, name));
    }

    let cfg = PackerConfig::builder()
        .with_dimensions(96, 96)
        .padding(padding)
        .ignore_oversize(true)
        .build();
    let out = pack_layout(images, &cfg).expect("pack");
    assert_eq!(
        out.stats.packed + out.stats.skipped_oversize,
        out.stats.inputs
    );

    let canvas = Rect::new(0, 0, cfg.width, cfg.height);
    let entries: Vec<(&String, &AtlasEntry)> = out.schema.atlas.iter().collect();
    for (i, (name, e)) in entries.iter().enumerate() {
        let slot = padded(e, padding);
        assert!(canvas.contains(&slot), "{name} out of bounds");
        for (_, other) in entries.iter().skip(i + 1) {
            assert!(!slot.intersects(&padded(other, padding)));
        }
        // Every pixel of the entry carries this image's marker.
        let idx: u8 = name[3..name.len() - 4].parse().expect("index");
        for y in e.y..e.y + e.height {
            for x in e.x..e.x + e.width {
                assert_eq!(out.canvas.get_pixel(x, y), &Rgba([idx + 1, 0, 0, 255]));
            }
        }
    }
}
