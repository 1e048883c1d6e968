use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    pub fn left(&self) -> u32 {
        self.x
    }
    pub fn top(&self) -> u32 {
        self.y
    }
    /// Exclusive right edge coordinate (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` lies fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.is_empty()
            || r.is_empty()
            || self.x >= r.right()
            || r.x >= self.right()
            || self.y >= r.bottom()
            || r.y >= self.bottom())
    }
}

/// Header of the atlas schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasMeta {
    /// File name (no directory) of the composited image.
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

/// Unpadded placement of one image in canvas coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasEntry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<Rect> for AtlasEntry {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.w,
            height: r.h,
        }
    }
}

impl From<AtlasEntry> for Rect {
    fn from(e: AtlasEntry) -> Self {
        Rect::new(e.x, e.y, e.width, e.height)
    }
}

/// The JSON side-channel: `{ "meta": {...}, "atlas": { name: {x, y, width, height} } }`.
///
/// Entries are kept in a sorted map so two runs over the same inputs serialize
/// to identical bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasSchema {
    pub meta: AtlasMeta,
    pub atlas: BTreeMap<String, AtlasEntry>,
}

impl AtlasSchema {
    pub fn new(meta: AtlasMeta) -> Self {
        Self {
            meta,
            atlas: BTreeMap::new(),
        }
    }

    /// Records `entry` under `name`, returning the entry it replaced, if any.
    pub fn insert(&mut self, name: impl Into<String>, entry: AtlasEntry) -> Option<AtlasEntry> {
        self.atlas.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&AtlasEntry> {
        self.atlas.get(name)
    }

    pub fn len(&self) -> usize {
        self.atlas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlas.is_empty()
    }
}

/// Counters collected over one packing run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackStats {
    /// Distinct input paths handed to the packer.
    pub inputs: usize,
    /// Inputs that decoded successfully.
    pub decoded: usize,
    /// Images composited and recorded in the schema.
    pub packed: usize,
    pub skipped_undecodable: usize,
    pub skipped_oversize: usize,
    /// Placed in the tree but lost while compositing.
    pub skipped_composite: usize,
    pub canvas_area: u64,
    /// Sum of padded footprints of every occupied leaf.
    pub used_area: u64,
}

impl PackStats {
    /// Packed images over inputs (0.0 to 1.0).
    pub fn packed_fraction(&self) -> f64 {
        if self.inputs > 0 {
            self.packed as f64 / self.inputs as f64
        } else {
            0.0
        }
    }

    /// Occupied padded area over canvas area (0.0 to 1.0).
    pub fn occupancy(&self) -> f64 {
        if self.canvas_area > 0 {
            self.used_area as f64 / self.canvas_area as f64
        } else {
            0.0
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Packed: {}/{} ({:.1}%), Occupancy: {:.2}%, Undecodable: {}, Oversize: {}, Composite failures: {}",
            self.packed,
            self.inputs,
            self.packed_fraction() * 100.0,
            self.occupancy() * 100.0,
            self.skipped_undecodable,
            self.skipped_oversize,
            self.skipped_composite,
        )
    }
}
