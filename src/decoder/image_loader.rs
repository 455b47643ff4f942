use std::path::Path;

use super::raster::RasterImage;
use crate::error::ConvertError;

/// Reads and decodes an image file (any format the `image` crate understands) to RGBA8.
pub fn load_image(path: &Path) -> Result<RasterImage, ConvertError> {
    crate::utils::logger::debug(&format!("Decoding image {}", path.display()));

    let decoded = image::open(path)
        .map_err(|e| ConvertError::ImageDecode(format!("{}: {}", path.display(), e)))?;
    into_raster(decoded)
}

/// Decodes an in-memory encoded image, guessing the format from its magic bytes.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, ConvertError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ConvertError::ImageDecode(e.to_string()))?;
    into_raster(decoded)
}

fn into_raster(decoded: image::DynamicImage) -> Result<RasterImage, ConvertError> {
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    crate::utils::logger::debug(&format!("Decoded raster {}x{}", width, height));
    RasterImage::new(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(3, 2, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 5, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        out
    }

    #[test]
    fn test_decode_png_to_rgba() {
        let raster = decode_image(&png_bytes()).unwrap();
        assert_eq!((raster.width(), raster.height()), (3, 2));
        assert_eq!(raster.pixel(2, 1), [20, 20, 5, 255]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ConvertError::ImageDecode(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let raster = load_image(&path).unwrap();
        assert_eq!(raster.pixels().len(), 3 * 2 * 4);

        let missing = load_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(missing, ConvertError::ImageDecode(_)));
    }
}
