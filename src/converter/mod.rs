//! Image to character grid conversion.
//!
//! Each output cell samples its source rectangle, tone-maps the average, picks a glyph
//! from the density ramp and derives its colors from the color mode.

pub mod color_policy;
pub mod density;
pub mod sampler;
pub mod tone;
pub mod worker;

pub use color_policy::ColorMode;
pub use worker::{CancelToken, ConversionOutcome, ConversionWorker, Ticket};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::decoder::RasterImage;
use crate::error::ConvertError;
use crate::grid::{Cell, Grid, Theme};
use crate::shared::constants;
use sampler::{Region, RegionSample};
use tone::ToneMapper;

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub color_mode: ColorMode,
    /// -100..=100
    pub contrast: f64,
    /// -100..=100
    pub brightness: f64,
    pub invert: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Smart,
            contrast: 0.0,
            brightness: 0.0,
            invert: false,
        }
    }
}

/// Converts `image` into a `rows` x `cols` grid.
pub fn convert(
    image: &RasterImage,
    rows: usize,
    cols: usize,
    options: &ConvertOptions,
    theme: &Theme,
) -> Result<Grid, ConvertError> {
    convert_with_cancel(image, rows, cols, options, theme, &CancelToken::new())
}

/// Like [`convert`], but checks `cancel` between rows of regions and gives up with
/// [`ConvertError::Cancelled`] once it is set.
pub fn convert_with_cancel(
    image: &RasterImage,
    rows: usize,
    cols: usize,
    options: &ConvertOptions,
    theme: &Theme,
    cancel: &CancelToken,
) -> Result<Grid, ConvertError> {
    let (width, height) = (image.width(), image.height());
    if rows == 0 || cols == 0 || width == 0 || height == 0 {
        return Err(ConvertError::InvalidDimensions {
            width,
            height,
            rows,
            cols,
        });
    }

    let start = std::time::Instant::now();
    let tone = ToneMapper::new(options.contrast, options.brightness);
    let mut cells = vec![Cell::empty(theme); rows * cols];

    cells
        .par_chunks_mut(cols)
        .enumerate()
        .try_for_each(|(row, out)| {
            if cancel.is_cancelled() {
                return Err(ConvertError::Cancelled);
            }
            for (col, cell) in out.iter_mut().enumerate() {
                let region = Region::for_cell(width, height, rows, cols, row, col);
                *cell = convert_region(image, &region, &tone, options, theme);
            }
            Ok(())
        })?;

    let elapsed = start.elapsed();
    if elapsed.as_millis() > constants::SLOW_CONVERSION_MS {
        crate::utils::logger::debug(&format!(
            "SLOW_CONVERSION: {}x{} image -> {}x{} grid in {}us",
            width,
            height,
            rows,
            cols,
            elapsed.as_micros()
        ));
    }

    Ok(Grid::from_cells(rows, cols, cells))
}

fn convert_region(
    image: &RasterImage,
    region: &Region,
    tone: &ToneMapper,
    options: &ConvertOptions,
    theme: &Theme,
) -> Cell {
    let base = match sampler::sample_region(image, region) {
        RegionSample::Transparent => return Cell::empty(theme),
        RegionSample::Opaque(color) => color,
    };

    let toned = tone.apply(base);
    let ch = density::glyph_for(toned.luminance, options.invert);
    let (fg, bg) =
        color_policy::select_colors(options.color_mode, base, toned.color(), theme);
    Cell::new(ch, fg, bg)
}
