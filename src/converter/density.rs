use lazy_static::lazy_static;

use crate::shared::constants;

lazy_static! {
    static ref RAMP: Vec<char> = constants::DENSITY_RAMP.chars().collect();
}

/// The 70-glyph density ramp, index 0 being the sparsest glyph (space).
pub fn ramp() -> &'static [char] {
    &RAMP
}

/// Glyph in the middle of the ramp, chosen for mid-gray input.
pub fn middle_glyph() -> char {
    RAMP[(RAMP.len() - 1) / 2]
}

/// Ramp index for an adjusted luminance in 0..=255.
///
/// Bright input maps toward the sparse end unless `invert` is set.
pub fn ramp_index(luminance: f64, invert: bool) -> usize {
    let last = (RAMP.len() - 1) as f64;
    let n = luminance / 255.0;
    let position = if invert { n * last } else { (1.0 - n) * last };
    position.floor().clamp(0.0, last) as usize
}

pub fn glyph_for(luminance: f64, invert: bool) -> char {
    RAMP[ramp_index(luminance, invert)]
}
