pub mod image_loader;
pub mod raster;

pub use image_loader::{decode_image, load_image};
pub use raster::RasterImage;
