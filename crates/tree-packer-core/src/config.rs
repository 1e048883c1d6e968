use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Largest accepted canvas side.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// What to do when two inputs share a display name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Later image replaces the earlier schema entry (a warning is logged).
    #[default]
    Overwrite,
    /// Abort the run with `DuplicateName`.
    Error,
}

impl FromStr for DuplicateNamePolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Output canvas width in pixels.
    pub width: u32,
    /// Output canvas height in pixels.
    pub height: u32,
    /// Pixels reserved on every side of each image.
    pub padding: u32,
    /// Skip images that find no room instead of failing the run.
    #[serde(default)]
    pub ignore_oversize: bool,
    #[serde(default)]
    pub duplicate_names: DuplicateNamePolicy,
    /// Composited PNG destination.
    pub output_image: PathBuf,
    /// JSON schema destination.
    pub output_schema: PathBuf,
    /// Indent the JSON schema.
    #[serde(default)]
    pub pretty_schema: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            padding: 1,
            ignore_oversize: false,
            duplicate_names: DuplicateNamePolicy::Overwrite,
            output_image: PathBuf::from("atlas.png"),
            output_schema: PathBuf::from("atlas.json"),
            pretty_schema: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Either canvas side is zero
    /// - Either canvas side exceeds [`MAX_CANVAS_SIDE`]
    /// - Padding is not strictly smaller than both canvas sides
    ///
    /// Non power-of-two sizes are accepted with a warning.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::TreePackerError;

        if self.width == 0 || self.height == 0 {
            return Err(TreePackerError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(TreePackerError::InvalidConfig(format!(
                "output size {}x{} is larger than {}x{}",
                self.width, self.height, MAX_CANVAS_SIDE, MAX_CANVAS_SIDE
            )));
        }

        if self.padding >= self.width || self.padding >= self.height {
            return Err(TreePackerError::InvalidConfig(format!(
                "padding {} is not smaller than output size {}x{}",
                self.padding, self.width, self.height
            )));
        }

        if !self.width.is_power_of_two() || !self.height.is_power_of_two() {
            warn!(
                width = self.width,
                height = self.height,
                "output size is not power of 2"
            );
        }

        Ok(())
    }

    /// File name of `output_image`, as recorded in the schema header.
    pub fn image_file_name(&self) -> String {
        self.output_image
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Default schema path for an image path: same stem, `.json` extension.
    pub fn schema_path_for(image_path: &Path) -> PathBuf {
        image_path.with_extension("json")
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.width = w;
        self.cfg.height = h;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn ignore_oversize(mut self, v: bool) -> Self {
        self.cfg.ignore_oversize = v;
        self
    }
    pub fn duplicate_names(mut self, v: DuplicateNamePolicy) -> Self {
        self.cfg.duplicate_names = v;
        self
    }
    /// Sets the image path and derives the schema path from it.
    pub fn output(mut self, image_path: impl Into<PathBuf>) -> Self {
        let image_path = image_path.into();
        self.cfg.output_schema = PackerConfig::schema_path_for(&image_path);
        self.cfg.output_image = image_path;
        self
    }
    pub fn output_image(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.output_image = v.into();
        self
    }
    pub fn output_schema(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.output_schema = v.into();
        self
    }
    pub fn pretty_schema(mut self, v: bool) -> Self {
        self.cfg.pretty_schema = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
