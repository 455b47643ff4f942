use serde::{Deserialize, Serialize};

use super::sampler::MeanColor;
use crate::grid::{RgbColor, Theme};
use crate::shared::constants;

/// How a sampled color is split into a cell's foreground and background.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Background takes the sampled color, glyph gets a contrasting shade of it
    #[default]
    Smart,
    /// Glyph takes the sampled color over the default background
    Foreground,
    /// Glyph and background both take the sampled color (solid blocks)
    Background,
}

/// Picks `(fg, bg)` for a cell.
///
/// `base` is the averaged color before tone adjustment, `adjusted` the color after it.
pub fn select_colors(
    mode: ColorMode,
    base: MeanColor,
    adjusted: RgbColor,
    theme: &Theme,
) -> (RgbColor, RgbColor) {
    match mode {
        ColorMode::Foreground => (adjusted, theme.default_bg),
        ColorMode::Background => (adjusted, adjusted),
        ColorMode::Smart => {
            let offset = f64::from(constants::SMART_FG_OFFSET);
            let fg = if adjusted.luminance() < 128.0 {
                base.offset(offset)
            } else {
                base.offset(-offset)
            };
            (fg, adjusted)
        }
    }
}
