pub mod display;

pub use display::{DisplayManager, DisplayMode};
