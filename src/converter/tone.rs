use super::sampler::MeanColor;
use crate::grid::RgbColor;
use crate::shared::constants;

/// Contrast/brightness adjustment applied to a sampled color and to its luminance.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ToneMapper {
    factor: f64,
    brightness: f64,
}

/// Adjusted channel values and luminance, still unrounded.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Toned {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub luminance: f64,
}

impl Toned {
    pub fn color(&self) -> RgbColor {
        RgbColor::from_f64(self.r, self.g, self.b)
    }
}

impl ToneMapper {
    /// Both inputs are clamped to `[-100, 100]`.
    pub fn new(contrast: f64, brightness: f64) -> Self {
        let (lo, hi) = constants::TONE_RANGE;
        Self {
            factor: contrast_factor(contrast.clamp(lo, hi)),
            brightness: brightness.clamp(lo, hi),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Contrast around mid-gray, then brightness offset, clamping to 0..=255 after each.
    pub fn adjust_value(&self, v: f64) -> f64 {
        let contrasted = (self.factor * (v - 128.0) + 128.0).clamp(0.0, 255.0);
        (contrasted + self.brightness).clamp(0.0, 255.0)
    }

    /// Luminance is taken from the unadjusted mean and adjusted on its own, like each channel.
    pub fn apply(&self, color: MeanColor) -> Toned {
        Toned {
            r: self.adjust_value(color.r),
            g: self.adjust_value(color.g),
            b: self.adjust_value(color.b),
            luminance: self.adjust_value(color.luminance()),
        }
    }
}

impl Default for ToneMapper {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// `259 * (c + 255) / (255 * (259 - c))`, with `c` kept inside `[-255, 258]` so the
/// denominator never reaches zero.
pub fn contrast_factor(contrast: f64) -> f64 {
    let c = contrast.clamp(-255.0, 258.0);
    259.0 * (c + 255.0) / (255.0 * (259.0 - c))
}
