use std::path::PathBuf;

use thiserror::Error;

/// Failures of the image-to-grid conversion and of the raster collaborator feeding it.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid dimensions: image {width}x{height}, target {rows}x{cols}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        rows: usize,
        cols: usize,
    },
    #[error("failed to decode image: {0}")]
    ImageDecode(String),
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("conversion superseded by a newer request")]
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct ColorParseError(pub String);

/// Failures of the grid import/export collaborator.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed grid document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("declared {declared_rows}x{declared_cols} grid but found {found}")]
    DimensionMismatch {
        declared_rows: usize,
        declared_cols: usize,
        found: String,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
