use crate::config::{DuplicateNamePolicy, PackerConfig};
use crate::error::{Result, TreePackerError};
use crate::export::{write_canvas, write_schema};
use crate::model::{AtlasEntry, AtlasMeta, AtlasSchema, PackStats, Rect};
use crate::packer::Packer;
use crate::packer::tree::PartitionTree;
use crate::sprite::ImageDescriptor;
use image::RgbaImage;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Output of a packing run: composited canvas, schema and counters.
pub struct PackOutput {
    pub canvas: RgbaImage,
    pub schema: AtlasSchema,
    pub stats: PackStats,
    /// Every image that was given a region, in packing order. Includes
    /// images whose compositing failed (their `position()` is `None`).
    pub sprites: Vec<ImageDescriptor>,
}

impl PackOutput {
    /// Writes the canvas and the schema to the paths in `cfg`.
    ///
    /// The two writes are independent: if the schema write fails the image
    /// stays on disk.
    pub fn write(&self, cfg: &PackerConfig) -> Result<()> {
        write_canvas(&cfg.output_image, &self.canvas)?;
        write_schema(&cfg.output_schema, &self.schema, cfg.pretty_schema)?;
        Ok(())
    }
}

/// Packs `images` (absolute path -> display name) and writes both outputs.
///
/// Nothing is written when the run fails before the write stage.
pub fn pack<I>(images: I, cfg: &PackerConfig) -> Result<PackOutput>
where
    I: IntoIterator<Item = (PathBuf, String)>,
{
    let out = pack_layout(images, cfg)?;
    out.write(cfg)?;
    info!(
        image = %cfg.output_image.display(),
        schema = %cfg.output_schema.display(),
        "atlas written"
    );
    Ok(out)
}

#[instrument(skip_all)]
/// Packs `images` into an in-memory canvas and schema without touching disk.
///
/// Notes:
/// - Paths are visited in ascending byte order of the path string, so the
///   result does not depend on the caller's map order.
/// - A path given twice keeps the last display name.
/// - Undecodable images are skipped with a warning.
/// - An image with no room fails the run unless `ignore_oversize` is set.
pub fn pack_layout<I>(images: I, cfg: &PackerConfig) -> Result<PackOutput>
where
    I: IntoIterator<Item = (PathBuf, String)>,
{
    cfg.validate()?;

    let mut sorted: Vec<(PathBuf, String)> = images
        .into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect();
    if sorted.is_empty() {
        return Err(TreePackerError::Empty);
    }
    sorted.sort_by(|a, b| a.0.as_os_str().cmp(b.0.as_os_str()));

    let mut tree: PartitionTree<usize> = PartitionTree::new(cfg.width, cfg.height);
    let mut canvas = RgbaImage::new(cfg.width, cfg.height);
    let mut schema = AtlasSchema::new(AtlasMeta {
        filename: cfg.image_file_name(),
        width: cfg.width,
        height: cfg.height,
        padding: cfg.padding,
    });
    let mut stats = PackStats {
        inputs: sorted.len(),
        canvas_area: tree.bounds().area(),
        ..Default::default()
    };
    let mut placed: Vec<ImageDescriptor> = Vec::new();

    for (path, name) in sorted {
        debug!(path = %path.display(), "packing");

        let mut sprite = match ImageDescriptor::open(&path, name, cfg.padding) {
            Ok(sprite) => sprite,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skip image");
                stats.skipped_undecodable += 1;
                continue;
            }
        };
        stats.decoded += 1;

        let footprint = Rect::new(0, 0, sprite.padded_width(), sprite.padded_height());
        let Some(slot) = tree.pack(placed.len(), &footprint) else {
            if !cfg.ignore_oversize {
                return Err(TreePackerError::Oversize {
                    path: sprite.path().to_path_buf(),
                    width: sprite.width(),
                    height: sprite.height(),
                });
            }
            debug!(
                path = %sprite.path().display(),
                width = sprite.width(),
                height = sprite.height(),
                "ignore oversize image"
            );
            stats.skipped_oversize += 1;
            continue;
        };

        let frame = match sprite.composite_into(&mut canvas, slot) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(path = %sprite.path().display(), error = %e, "cannot composite image");
                stats.skipped_composite += 1;
                placed.push(sprite);
                continue;
            }
        };

        if schema.get(sprite.name()).is_some() {
            if cfg.duplicate_names == DuplicateNamePolicy::Error {
                return Err(TreePackerError::DuplicateName {
                    name: sprite.name().to_string(),
                });
            }
            warn!(
                name = sprite.name(),
                path = %sprite.path().display(),
                "display name already packed, overwriting entry"
            );
        }
        schema.insert(sprite.name(), AtlasEntry::from(frame));
        debug!(id = sprite.id(), name = sprite.name(), ?frame, "packed");
        stats.packed += 1;
        placed.push(sprite);
    }

    stats.used_area = tree.used_area();
    info!(
        "{} image packed ({:.1}%)",
        stats.packed,
        stats.packed_fraction() * 100.0
    );

    Ok(PackOutput {
        canvas,
        schema,
        stats,
        sprites: placed,
    })
}
