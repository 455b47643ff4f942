use crate::decoder::RasterImage;
use crate::grid::cell::{luminance, RgbColor};
use crate::shared::constants;

/// Source rectangle of one output cell, already clipped to the image.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Region for output cell (`row`, `col`) of a `rows` x `cols` grid laid over the image.
    ///
    /// Origin is `floor(col * W / cols)`, `floor(row * H / rows)`; size is
    /// `ceil(W / cols)` x `ceil(H / rows)` before clipping.
    pub fn for_cell(
        image_w: u32,
        image_h: u32,
        rows: usize,
        cols: usize,
        row: usize,
        col: usize,
    ) -> Self {
        let (w, h) = (image_w as u64, image_h as u64);
        let (rows, cols) = (rows as u64, cols as u64);

        let x = (col as u64 * w / cols).min(w);
        let y = (row as u64 * h / rows).min(h);
        let width = w.div_ceil(cols).min(w - x);
        let height = h.div_ceil(rows).min(h - y);

        Self {
            x: x as u32,
            y: y as u32,
            width: width as u32,
            height: height as u32,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Per-channel mean of a region's opaque pixels. Kept fractional until a cell color is built.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MeanColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl MeanColor {
    pub fn luminance(&self) -> f64 {
        luminance(self.r, self.g, self.b)
    }

    /// Nearest `RgbColor`, each channel moved by `offset` first.
    pub fn offset(&self, offset: f64) -> RgbColor {
        RgbColor::from_f64(self.r + offset, self.g + offset, self.b + offset)
    }
}

impl From<RgbColor> for MeanColor {
    fn from(color: RgbColor) -> Self {
        Self {
            r: color.0 as f64,
            g: color.1 as f64,
            b: color.2 as f64,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum RegionSample {
    /// More than half of the region's pixels are below the alpha threshold.
    Transparent,
    /// Mean color of the region's opaque pixels.
    Opaque(MeanColor),
}

/// Averages the color of the pixels in `region` whose alpha is at least 50%.
pub fn sample_region(image: &RasterImage, region: &Region) -> RegionSample {
    let total = region.area();
    let mut opaque = 0u64;
    let mut sums = [0u64; 3];

    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let [r, g, b, a] = image.pixel(x, y);
            if a >= constants::ALPHA_THRESHOLD {
                opaque += 1;
                sums[0] += r as u64;
                sums[1] += g as u64;
                sums[2] += b as u64;
            }
        }
    }

    let transparent = total - opaque;
    if opaque == 0 || transparent * 2 > total {
        return RegionSample::Transparent;
    }

    let mean = |sum: u64| sum as f64 / opaque as f64;
    RegionSample::Opaque(MeanColor {
        r: mean(sums[0]),
        g: mean(sums[1]),
        b: mean(sums[2]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_tile_evenly_divisible_image() {
        assert_eq!(
            Region::for_cell(8, 4, 2, 4, 1, 3),
            Region { x: 6, y: 2, width: 2, height: 2 }
        );
    }

    #[test]
    fn test_regions_clip_at_image_edge() {
        // W=5 over 2 cols: starts 0 and 2, width ceil(2.5) = 3 -> second region is 3 wide
        assert_eq!(
            Region::for_cell(5, 1, 1, 2, 0, 1),
            Region { x: 2, y: 0, width: 3, height: 1 }
        );
        // W=5 over 3 cols: col 2 starts at floor(10/3) = 3 and ceil(5/3) = 2 reaches the edge
        assert_eq!(
            Region::for_cell(5, 1, 1, 3, 0, 2),
            Region { x: 3, y: 0, width: 2, height: 1 }
        );
        // W=7 over 2 cols: col 1 starts at 3, width 4 fits exactly
        assert_eq!(Region::for_cell(7, 1, 1, 2, 0, 1).width, 4);
    }

    #[test]
    fn test_more_cells_than_pixels() {
        // each cell still gets a one-pixel region
        for col in 0..5 {
            let region = Region::for_cell(2, 2, 5, 5, 4, col);
            assert_eq!(region.area(), 1);
            assert!(region.x < 2 && region.y < 2);
        }
    }

    #[test]
    fn test_average_ignores_transparent_pixels() {
        // 2x1: one opaque red pixel, one fully transparent white pixel
        let img = RasterImage::new(2, 1, vec![200, 0, 0, 255, 255, 255, 255, 0]).unwrap();
        let region = Region { x: 0, y: 0, width: 2, height: 1 };
        // exactly half transparent is not "more than half"
        assert_eq!(sample_region(&img, &region), RegionSample::Opaque(RgbColor(200, 0, 0).into()));
    }

    #[test]
    fn test_mostly_transparent_region() {
        let img = RasterImage::new(3, 1, vec![10, 10, 10, 255, 0, 0, 0, 127, 0, 0, 0, 0]).unwrap();
        let region = Region { x: 0, y: 0, width: 3, height: 1 };
        assert_eq!(sample_region(&img, &region), RegionSample::Transparent);
    }

    #[test]
    fn test_alpha_threshold_is_inclusive() {
        let img = RasterImage::uniform(1, 1, [50, 60, 70, 128]);
        let region = Region { x: 0, y: 0, width: 1, height: 1 };
        assert_eq!(sample_region(&img, &region), RegionSample::Opaque(RgbColor(50, 60, 70).into()));
    }

    #[test]
    fn test_average_keeps_fractions() {
        let img = RasterImage::new(2, 1, vec![10, 0, 0, 255, 11, 1, 2, 255]).unwrap();
        let region = Region { x: 0, y: 0, width: 2, height: 1 };
        let RegionSample::Opaque(mean) = sample_region(&img, &region) else {
            panic!("region should be opaque");
        };
        assert_eq!(mean, MeanColor { r: 10.5, g: 0.5, b: 1.0 });
        assert_eq!(mean.offset(0.0), RgbColor(11, 1, 1));
        assert_eq!(mean.offset(250.0), RgbColor(255, 251, 251));
    }
}
