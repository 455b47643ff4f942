use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;
use crate::shared::constants;

/// Represents a 24-bit RGB color, written as `#RRGGBB`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor(255, 255, 255);

    /// Builds a color from unbounded channel values, rounding and clamping each to 0..=255.
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self(channel(r), channel(g), channel(b))
    }

    pub fn luminance(&self) -> f64 {
        luminance(self.0 as f64, self.1 as f64, self.2 as f64)
    }
}

/// Perceptual brightness, `0.299R + 0.587G + 0.114B`.
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    0.299 * r + 0.587 * g + 0.114 * b
}

fn channel(v: f64) -> u8 {
    // f64::round is half-away-from-zero
    v.clamp(0.0, 255.0).round() as u8
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for RgbColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| ColorParseError(s.to_string()))?;

        let part = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self(part(0)?, part(2)?, part(4)?))
    }
}

impl TryFrom<String> for RgbColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_string()
    }
}

/// Default colors for cells that carry no content of their own.
///
/// Passed explicitly into every operation that creates empty cells so callers can
/// change the palette without touching the algorithms.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub default_fg: RgbColor,
    pub default_bg: RgbColor,
}

impl Theme {
    pub fn new(default_fg: RgbColor, default_bg: RgbColor) -> Self {
        Self {
            default_fg,
            default_bg,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        // The constants are well-formed literals.
        Self {
            default_fg: constants::DEFAULT_FG.parse().unwrap_or(RgbColor::BLACK),
            default_bg: constants::DEFAULT_BG.parse().unwrap_or(RgbColor::WHITE),
        }
    }
}

/// One grid position: a glyph with its foreground and background color.
///
/// A space glyph marks the cell as empty.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub fg: RgbColor,
    pub bg: RgbColor,
    pub selected: bool,
}

impl Cell {
    pub const EMPTY_CHAR: char = ' ';

    pub fn new(ch: char, fg: RgbColor, bg: RgbColor) -> Self {
        Self {
            ch,
            fg,
            bg,
            selected: false,
        }
    }

    pub fn empty(theme: &Theme) -> Self {
        Self::new(Self::EMPTY_CHAR, theme.default_fg, theme.default_bg)
    }

    pub fn is_empty(&self) -> bool {
        self.ch == Self::EMPTY_CHAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_and_case() {
        let c: RgbColor = "#64a0Ff".parse().unwrap();
        assert_eq!(c, RgbColor(0x64, 0xA0, 0xFF));
        assert_eq!(c.to_string(), "#64A0FF");
    }

    #[test]
    fn test_rejects_malformed_colors() {
        for bad in ["", "#", "646464", "#64646", "#6464646", "#GG0000", "#+12345", "#é1234"] {
            assert!(bad.parse::<RgbColor>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_from_f64_rounds_and_clamps() {
        assert_eq!(RgbColor::from_f64(-20.0, 300.0, 99.5), RgbColor(0, 255, 100));
        assert_eq!(RgbColor::from_f64(10.49, 10.5, 0.0), RgbColor(10, 11, 0));
    }

    #[test]
    fn test_default_theme_and_empty_cell() {
        let theme = Theme::default();
        assert_eq!(theme.default_fg, RgbColor::BLACK);
        assert_eq!(theme.default_bg, RgbColor::WHITE);

        let cell = Cell::empty(&theme);
        assert!(cell.is_empty());
        assert!(!cell.selected);
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&RgbColor(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        assert!(serde_json::from_str::<RgbColor>("\"red\"").is_err());
    }
}
