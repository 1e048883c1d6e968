use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreePackerError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image error on {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid output size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
    #[error("Cannot pack {}, image oversize: {width}x{height}", .path.display())]
    Oversize {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("Display name {name:?} is used by more than one image")]
    DuplicateName { name: String },
    #[error("Encoding error on {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TreePackerError>;
