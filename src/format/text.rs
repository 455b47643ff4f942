use crate::grid::{Cell, Grid, Theme};
use crate::renderer::{display, DisplayMode};

/// One line per row; trailing spaces are kept so the shape survives.
pub fn to_plain_text(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.rows() * (grid.cols() + 1));
    for row in grid.rows_iter() {
        out.extend(row.iter().map(|cell| cell.ch));
        out.push('\n');
    }
    out
}

/// Rows with 24-bit color escapes, reset at the end of each line.
pub fn to_ansi_text(grid: &Grid) -> String {
    String::from_utf8_lossy(&display::encode_grid(grid, DisplayMode::Rgb)).into_owned()
}

/// Each line becomes a row, padded with empty cells to the longest line.
pub fn from_plain_text(text: &str, theme: &Theme) -> Grid {
    let lines: Vec<&str> = text.lines().collect();
    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let empty = Cell::empty(theme);

    let rows: Vec<Vec<Cell>> = lines
        .iter()
        .map(|line| {
            let mut row: Vec<Cell> = line
                .chars()
                .map(|ch| Cell::new(ch, theme.default_fg, theme.default_bg))
                .collect();
            row.resize(cols, empty);
            row
        })
        .collect();

    // Every row was padded to `cols`.
    Grid::from_rows(rows).unwrap_or_else(|_| Grid::blank(0, 0, theme))
}
