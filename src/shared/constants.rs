pub const APP_NAME: &str = "glyphgrid";

pub const CONFIG_FILE: &str = "glyphgrid.toml";
pub const USER_CONFIG_FILE: &str = "config.toml";
pub const ERROR_LOG_FILE: &str = "glyphgrid-error.log";
pub const DEBUG_LOG_FILE: &str = "glyphgrid-debug.log";

pub const DEFAULT_FG: &str = "#000000";
pub const DEFAULT_BG: &str = "#FFFFFF";

/// Density ramp, sparse/light at index 0 through dense/dark at the end.
pub const DENSITY_RAMP: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";
pub const DENSITY_RAMP_LEN: usize = 70;

/// Pixels with alpha below this count as transparent.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Smart color mode pushes the glyph color this far away from the cell background.
pub const SMART_FG_OFFSET: i16 = 100;

pub const TONE_RANGE: (f64, f64) = (-100.0, 100.0);

/// Used when the terminal size cannot be queried.
pub const FALLBACK_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// Conversions slower than this are logged with timing.
pub const SLOW_CONVERSION_MS: u128 = 10;
