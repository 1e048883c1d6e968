use crate::error::{Result, TreePackerError};
use crate::model::AtlasSchema;
use image::{ImageFormat, RgbaImage};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Schema as a JSON value: `{ meta: {filename, width, height, padding}, atlas: { name: {x, y, width, height} } }`.
pub fn to_json(schema: &AtlasSchema) -> Value {
    let atlas: serde_json::Map<String, Value> = schema
        .atlas
        .iter()
        .map(|(name, e)| {
            (
                name.clone(),
                json!({"x": e.x, "y": e.y, "width": e.width, "height": e.height}),
            )
        })
        .collect();
    json!({ "meta": &schema.meta, "atlas": atlas })
}

/// Writes `schema` as JSON to `path`, creating or truncating the file.
pub fn write_schema(path: &Path, schema: &AtlasSchema, pretty: bool) -> Result<()> {
    let file = File::create(path).map_err(|source| TreePackerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut w = BufWriter::new(file);
    let encoded = if pretty {
        serde_json::to_writer_pretty(&mut w, schema)
    } else {
        serde_json::to_writer(&mut w, schema)
    };
    encoded.map_err(|source| TreePackerError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    w.flush().map_err(|source| TreePackerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Encodes `canvas` as PNG at `path` regardless of the file extension.
pub fn write_canvas(path: &Path, canvas: &RgbaImage) -> Result<()> {
    canvas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| TreePackerError::Image {
            path: path.to_path_buf(),
            source,
        })
}
