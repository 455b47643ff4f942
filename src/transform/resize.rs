use crate::grid::{Coord, Grid, Theme};

/// Allocates a `new_rows` x `new_cols` grid of empty cells and copies the overlapping
/// top-left rectangle from `grid`.
///
/// Zero in either dimension yields an empty grid; rejecting such sizes is up to the caller.
pub fn resize_grid(grid: &Grid, new_rows: usize, new_cols: usize, theme: &Theme) -> Grid {
    let mut out = Grid::blank(new_rows, new_cols, theme);
    let keep_rows = grid.rows().min(out.rows());
    let keep_cols = grid.cols().min(out.cols());

    for (row, cells) in grid.rows_iter().take(keep_rows).enumerate() {
        for (col, cell) in cells.iter().take(keep_cols).enumerate() {
            out.set(Coord::new(row, col), *cell);
        }
    }
    out
}
