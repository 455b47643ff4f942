pub mod bounds;
pub mod resize;
pub mod selection;

pub use bounds::{bounding_box, extract_subgrid, BoundingBox};
pub use resize::resize_grid;
pub use selection::{
    mirror_grid, mirror_selection, rotate_selection, MirrorDirection, RotateDirection,
};
