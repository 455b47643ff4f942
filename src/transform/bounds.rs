use crate::grid::{Coord, Grid};

/// Smallest rectangle containing every non-space cell, with inclusive bounds.
///
/// When nothing qualifies the box is the empty sentinel (`max_row < min_row`); check
/// [`BoundingBox::is_empty`] before ranging over it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BoundingBox {
    pub min_row: isize,
    pub max_row: isize,
    pub min_col: isize,
    pub max_col: isize,
}

impl BoundingBox {
    /// The sentinel returned for a grid without content.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            min_row: rows as isize,
            max_row: -1,
            min_col: cols as isize,
            max_col: -1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_row < self.min_row || self.max_col < self.min_col
    }

    pub fn height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max_row - self.min_row + 1) as usize
        }
    }

    pub fn width(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max_col - self.min_col + 1) as usize
        }
    }

    fn include(&mut self, coord: Coord) {
        let (row, col) = (coord.row as isize, coord.col as isize);
        self.min_row = self.min_row.min(row);
        self.max_row = self.max_row.max(row);
        self.min_col = self.min_col.min(col);
        self.max_col = self.max_col.max(col);
    }

    /// Bounding box of an arbitrary set of coordinates.
    pub(crate) fn of_coords<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Self {
        let mut bbox = Self {
            min_row: isize::MAX,
            max_row: -1,
            min_col: isize::MAX,
            max_col: -1,
        };
        for &coord in coords {
            bbox.include(coord);
        }
        bbox
    }
}

/// Single full scan for the tight box around all non-space cells.
pub fn bounding_box(grid: &Grid) -> BoundingBox {
    let mut bbox = BoundingBox::empty(grid.rows(), grid.cols());
    for (row, cells) in grid.rows_iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if !cell.is_empty() {
                bbox.include(Coord::new(row, col));
            }
        }
    }
    bbox
}

/// Copies the inclusive rectangle of `bbox` out of `grid`.
///
/// An empty box yields an empty grid. The box is clipped to the grid.
pub fn extract_subgrid(grid: &Grid, bbox: &BoundingBox) -> Grid {
    if bbox.is_empty() || grid.is_empty() || bbox.max_row < 0 || bbox.max_col < 0 {
        return Grid::from_cells(0, 0, Vec::new());
    }

    let min_row = bbox.min_row.max(0) as usize;
    let min_col = bbox.min_col.max(0) as usize;
    let max_row = (bbox.max_row as usize).min(grid.rows() - 1);
    let max_col = (bbox.max_col as usize).min(grid.cols() - 1);
    if min_row > max_row || min_col > max_col {
        return Grid::from_cells(0, 0, Vec::new());
    }

    let mut cells = Vec::with_capacity((max_row - min_row + 1) * (max_col - min_col + 1));
    for row in min_row..=max_row {
        if let Some(cells_in_row) = grid.row(row) {
            cells.extend_from_slice(&cells_in_row[min_col..=max_col]);
        }
    }
    Grid::from_cells(max_row - min_row + 1, max_col - min_col + 1, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, RgbColor, Theme};

    fn grid_from(lines: &[&str]) -> Grid {
        Grid::from_rows(
            lines
                .iter()
                .map(|l| {
                    l.chars()
                        .map(|ch| Cell::new(ch, RgbColor::BLACK, RgbColor::WHITE))
                        .collect()
                })
                .collect(),
        )
        .unwrap()
    }

    fn text(grid: &Grid) -> Vec<String> {
        grid.rows_iter()
            .map(|r| r.iter().map(|c| c.ch).collect())
            .collect()
    }

    #[test]
    fn test_all_space_grid_is_empty_sentinel() {
        let g = Grid::blank(3, 4, &Theme::default());
        let bbox = bounding_box(&g);
        assert!(bbox.max_row < bbox.min_row);
        assert!(bbox.is_empty());
        assert_eq!((bbox.width(), bbox.height()), (0, 0));
    }

    #[test]
    fn test_tight_box() {
        let g = grid_from(&["     ", "  a  ", "    b", "     "]);
        let bbox = bounding_box(&g);
        assert_eq!(
            bbox,
            BoundingBox {
                min_row: 1,
                max_row: 2,
                min_col: 2,
                max_col: 4
            }
        );

        let sub = extract_subgrid(&g, &bbox);
        assert_eq!((sub.rows(), sub.cols()), (2, 3));
        assert_eq!(text(&sub), vec!["a  ", "  b"]);
    }

    #[test]
    fn test_extract_with_empty_box() {
        let g = grid_from(&["ab"]);
        let sub = extract_subgrid(&g, &BoundingBox::empty(1, 2));
        assert!(sub.is_empty());
    }

    #[test]
    fn test_single_cell() {
        let g = grid_from(&["   ", " x ", "   "]);
        let sub = extract_subgrid(&g, &bounding_box(&g));
        assert_eq!(text(&sub), vec!["x"]);
    }
}
