//! Grid-based ASCII art core: image to character grid conversion and grid transforms.
//!
//! Every operation is a pure function from input grid(s) to a new grid; nothing here
//! keeps a grid between calls.

pub mod converter;
pub mod decoder;
pub mod error;
pub mod format;
pub mod grid;
pub mod renderer;
pub mod shared;
pub mod transform;
pub mod utils;

pub use converter::{convert, convert_with_cancel, ColorMode, ConvertOptions};
pub use decoder::RasterImage;
pub use error::{ConvertError, FormatError};
pub use grid::{Cell, Coord, Grid, RgbColor, Selection, Theme};
pub use transform::{
    bounding_box, extract_subgrid, mirror_selection, resize_grid, rotate_selection, BoundingBox,
    MirrorDirection, RotateDirection,
};
