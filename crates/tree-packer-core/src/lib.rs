//! Core library for packing a set of images into one texture atlas.
//!
//! - Algorithm: guillotine partition tree, first fit, split along the axis with more slack
//! - Pipeline: `pack` takes `path -> display name` pairs, composites an RGBA canvas
//!   and builds a JSON placement schema; `pack_layout` does the same without writing files
//! - Inputs are visited in path order, so identical inputs give identical outputs.
//!
//! Quick example:
//! ```ignore
//! use std::path::PathBuf;
//! use tree_packer_core::{PackerConfig, pack};
//! # fn main() -> anyhow::Result<()> {
//! let images = vec![
//!   (PathBuf::from("/assets/a.png"), "a.png".to_string()),
//!   (PathBuf::from("/assets/b.png"), "b.png".to_string()),
//! ];
//! let cfg = PackerConfig::builder()
//!     .with_dimensions(512, 512)
//!     .padding(1)
//!     .output("out/atlas.png")
//!     .build();
//! let out = pack(images, &cfg)?;
//! println!("{}", out.stats.summary());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod sprite;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
pub use sprite::*;

/// Convenience prelude for common types and functions.
/// Importing `tree_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{DuplicateNamePolicy, PackerConfig, PackerConfigBuilder};
    pub use crate::error::TreePackerError;
    pub use crate::model::{AtlasEntry, AtlasMeta, AtlasSchema, PackStats, Rect};
    pub use crate::packer::Packer;
    pub use crate::packer::tree::{Node, PartitionTree};
    pub use crate::sprite::ImageDescriptor;
    pub use crate::{PackOutput, pack, pack_layout};
}
