pub mod grid_file;
pub mod text;

pub use grid_file::{load_grid, save_grid, GridFile};
pub use text::{from_plain_text, to_ansi_text, to_plain_text};
