//! One input image: measured at open time, composited later.
//!
//! A descriptor never keeps decoded pixels. `open` decodes once to learn the
//! size and format, `composite_into` decodes again right before copying, so at
//! most one source image is resident at a time.

use crate::compositing::blit_rgba;
use crate::error::{Result, TreePackerError};
use crate::model::Rect;
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key for the path hash behind [`ImageDescriptor::id`]. Fixed so ids stay
/// stable between runs.
const ID_KEY: [u8; 32] = *b"tree-packer/sprite-id/0x12F0E6D/";

/// Digest bytes kept before Base58 encoding.
const ID_BYTES: usize = 8;

#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    id: String,
    name: String,
    path: PathBuf,
    width: u32,
    height: u32,
    format: ImageFormat,
    padding: u32,
    position: Option<(u32, u32)>,
}

impl ImageDescriptor {
    /// Opens and decodes `path` to measure it.
    ///
    /// Tries content sniffing first; when that fails and the extension says
    /// JPEG, retries with the JPEG decoder forced.
    pub fn open(path: impl AsRef<Path>, name: impl Into<String>, padding: u32) -> Result<Self> {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let (image, format) = decode_any(&path)?;
        Ok(Self {
            id: image_id(&path),
            name: name.into(),
            width: image.width(),
            height: image.height(),
            format,
            padding,
            position: None,
            path,
        })
    }

    /// Stable identifier derived from the absolute source path.
    pub fn id(&self) -> &str {
        &self.id
    }
    /// Display name used as the schema key.
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn format(&self) -> ImageFormat {
        self.format
    }
    pub fn padding(&self) -> u32 {
        self.padding
    }
    pub fn padded_width(&self) -> u32 {
        self.width + self.padding * 2
    }
    pub fn padded_height(&self) -> u32 {
        self.height + self.padding * 2
    }
    /// Top-left of the unpadded image in the canvas, once composited.
    pub fn position(&self) -> Option<(u32, u32)> {
        self.position
    }

    /// Re-decodes the source and copies it into `canvas` inside `slot`
    /// (the padded footprint handed out by the tree).
    ///
    /// Returns the unpadded rectangle the pixels now occupy. On error the
    /// canvas is left untouched.
    pub fn composite_into(&mut self, canvas: &mut RgbaImage, slot: Rect) -> Result<Rect> {
        let image = decode_as(&self.path, self.format)?;
        if image.width() != self.width || image.height() != self.height {
            return Err(TreePackerError::Image {
                path: self.path.clone(),
                source: ImageError::Unsupported(UnsupportedError::from_format_and_kind(
                    ImageFormatHint::Exact(self.format),
                    UnsupportedErrorKind::GenericFeature(format!(
                        "image changed from {}x{} to {}x{} since it was measured",
                        self.width,
                        self.height,
                        image.width(),
                        image.height()
                    )),
                )),
            });
        }
        let x = slot.x + self.padding;
        let y = slot.y + self.padding;
        blit_rgba(&image.to_rgba8(), canvas, x, y);
        self.position = Some((x, y));
        Ok(Rect::new(x, y, self.width, self.height))
    }
}

fn image_id(path: &Path) -> String {
    let digest = blake3::keyed_hash(&ID_KEY, path.as_os_str().as_encoded_bytes());
    bs58::encode(&digest.as_bytes()[..ID_BYTES]).into_string()
}

fn has_jpeg_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "jpg" | "jpeg")
    )
}

fn open_file(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TreePackerError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn decode_any(path: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let reader = ImageReader::new(open_file(path)?)
        .with_guessed_format()
        .map_err(|source| TreePackerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let generic = match reader.format() {
        Some(format) => reader.decode().map(|image| (image, format)),
        None => Err(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(
                ImageFormatHint::Unknown,
                UnsupportedErrorKind::Format(ImageFormatHint::Unknown),
            ),
        )),
    };
    match generic {
        Ok(decoded) => Ok(decoded),
        Err(err) if has_jpeg_extension(path) => {
            debug!(path = %path.display(), error = %err, "generic decode failed, retrying as jpeg");
            decode_as(path, ImageFormat::Jpeg).map(|image| (image, ImageFormat::Jpeg))
        }
        Err(source) => Err(TreePackerError::Image {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn decode_as(path: &Path, format: ImageFormat) -> Result<DynamicImage> {
    ImageReader::with_format(open_file(path)?, format)
        .decode()
        .map_err(|source| TreePackerError::Image {
            path: path.to_path_buf(),
            source,
        })
}
