use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use crate::grid::{Cell, Coord, Grid, Selection, Theme};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RotateDirection {
    /// Counter-clockwise quarter turn
    Left,
    /// Clockwise quarter turn
    Right,
}

impl RotateDirection {
    fn sign(self) -> f64 {
        match self {
            RotateDirection::Right => 1.0,
            RotateDirection::Left => -1.0,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MirrorDirection {
    /// Flip left/right
    Horizontal,
    /// Flip top/bottom
    Vertical,
}

/// Rotates the selected cells a quarter turn around the center of their bounding box.
///
/// Sources are cleared to the theme's empty cell before anything is placed. Destinations
/// outside the grid are dropped, not clamped. When two sources land on the same
/// destination the one earlier in row-major order keeps it. Returns the new grid and the
/// destinations that were actually written.
pub fn rotate_selection(
    grid: &Grid,
    selection: &Selection,
    direction: RotateDirection,
    theme: &Theme,
) -> (Grid, Selection) {
    let Some(bbox) = selection_bounds(grid, selection) else {
        return (grid.clone(), Selection::new());
    };

    let cx = (bbox.min_col + bbox.max_col) as f64 / 2.0;
    let cy = (bbox.min_row + bbox.max_row) as f64 / 2.0;
    let sign = direction.sign();

    relocate(grid, selection, theme, |coord| {
        let (r, c) = (coord.row as f64, coord.col as f64);
        let new_row = (cy + sign * (c - cx)).round();
        let new_col = (cx - sign * (r - cy)).round();
        (new_row as isize, new_col as isize)
    })
}

/// Mirrors the selected cells across the axis of their own bounding box.
///
/// An empty selection mirrors the whole grid instead and yields no selection. Placement
/// follows the same clear/drop/first-wins rules as [`rotate_selection`].
pub fn mirror_selection(
    grid: &Grid,
    selection: &Selection,
    direction: MirrorDirection,
    theme: &Theme,
) -> (Grid, Option<Selection>) {
    if selection.is_empty() {
        return (mirror_grid(grid, direction), None);
    }

    let Some(bbox) = selection_bounds(grid, selection) else {
        return (grid.clone(), Some(Selection::new()));
    };

    let (grid, placed) = relocate(grid, selection, theme, |coord| {
        let (r, c) = (coord.row as isize, coord.col as isize);
        match direction {
            MirrorDirection::Vertical => (bbox.max_row - (r - bbox.min_row), c),
            MirrorDirection::Horizontal => (r, bbox.max_col - (c - bbox.min_col)),
        }
    });
    (grid, Some(placed))
}

/// Reverses the row order (vertical) or every row (horizontal).
pub fn mirror_grid(grid: &Grid, direction: MirrorDirection) -> Grid {
    let mut rows = grid.clone().into_rows();
    match direction {
        MirrorDirection::Vertical => rows.reverse(),
        MirrorDirection::Horizontal => rows.iter_mut().for_each(|row| row.reverse()),
    }
    // Reordering cannot make rows ragged.
    Grid::from_rows(rows).unwrap_or_else(|_| grid.clone())
}

/// Bounding box of the in-grid part of `selection`, or None if nothing is in the grid.
fn selection_bounds(grid: &Grid, selection: &Selection) -> Option<BoundingBox> {
    let bbox = BoundingBox::of_coords(selection.iter().filter(|c| grid.contains(**c)));
    (!bbox.is_empty()).then_some(bbox)
}

fn relocate<F>(grid: &Grid, selection: &Selection, theme: &Theme, target: F) -> (Grid, Selection)
where
    F: Fn(Coord) -> (isize, isize),
{
    let mut out = grid.clone();
    let empty = Cell::empty(theme);

    let snapshots: Vec<(Coord, Cell)> = selection
        .iter()
        .filter_map(|&coord| grid.get(coord).map(|cell| (coord, *cell)))
        .collect();
    for (coord, _) in &snapshots {
        out.set(*coord, empty);
    }

    let mut placed = Selection::new();
    let mut taken = HashSet::with_capacity(snapshots.len());
    for (coord, cell) in snapshots {
        let (row, col) = target(coord);
        if row < 0 || col < 0 {
            continue;
        }
        let dest = Coord::new(row as usize, col as usize);
        if !out.contains(dest) || !taken.insert(dest) {
            continue;
        }
        out.set(dest, cell);
        placed.insert(dest);
    }

    (out, placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RgbColor;

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

    fn rect(r0: usize, c0: usize, r1: usize, c1: usize) -> Selection {
        (r0..=r1)
            .flat_map(|r| (c0..=c1).map(move |c| Coord::new(r, c)))
            .collect()
    }

    #[test]
    fn test_empty_selection_rotates_nothing() {
        let g = grid_from(&["ab", "cd"]);
        let (out, sel) =
            rotate_selection(&g, &Selection::new(), RotateDirection::Right, &Theme::default());
        assert_eq!(out, g);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_rotate_right_square() {
        let g = grid_from(&["....", ".ab.", ".cd.", "...."]);
        let (out, sel) =
            rotate_selection(&g, &rect(1, 1, 2, 2), RotateDirection::Right, &Theme::default());
        assert_eq!(text(&out), vec!["....", ".ca.", ".db.", "...."]);
        assert_eq!(sel, rect(1, 1, 2, 2));
    }

    #[test]
    fn test_rotate_left_square() {
        let g = grid_from(&["....", ".ab.", ".cd.", "...."]);
        let (out, _) =
            rotate_selection(&g, &rect(1, 1, 2, 2), RotateDirection::Left, &Theme::default());
        assert_eq!(text(&out), vec!["....", ".bd.", ".ac.", "...."]);
    }

    #[test]
    fn test_rotate_horizontal_bar_becomes_vertical() {
        let g = grid_from(&[".....", ".....", ".xyz.", ".....", "....."]);
        let (out, sel) =
            rotate_selection(&g, &rect(2, 1, 2, 3), RotateDirection::Right, &Theme::default());
        assert_eq!(text(&out), vec![".....", "..x..", ". y .", "..z..", "....."]);
        assert_eq!(sel, rect(1, 2, 3, 2));
    }

    #[test]
    fn test_rotate_drops_out_of_bounds_cells() {
        let g = grid_from(&["abc", "...", "..."]);
        let (out, sel) =
            rotate_selection(&g, &rect(0, 0, 0, 2), RotateDirection::Right, &Theme::default());
        // center (0, 1): 'a' would land on row -1 and is lost
        assert_eq!(text(&out), vec![" b ", ".c.", "..."]);
        assert_eq!(sel.len(), 2);
        assert!(!out.cells().iter().any(|c| c.ch == 'a'));
    }

    #[test]
    fn test_four_quarter_turns_restore_interior_selection() {
        let g = grid_from(&["......", ".ab...", ".cde..", "..f...", "......", "......"]);
        let sel = rect(1, 1, 3, 3);
        let mut current = (g.clone(), sel.clone());
        for _ in 0..4 {
            current = rotate_selection(
                &current.0,
                &current.1,
                RotateDirection::Right,
                &Theme::default(),
            );
        }
        assert_eq!(text(&current.0), text(&g));
        assert_eq!(current.0, g);
        assert_eq!(current.1, sel);
    }

    #[test]
    fn test_fractional_center_rounds_half_away_from_zero() {
        // center (0, 0.5): 'a' lands on row round(-0.5) = -1, 'b' on (round(0.5), round(0.5))
        let g = grid_from(&["ab", ".."]);
        let (out, sel) =
            rotate_selection(&g, &rect(0, 0, 0, 1), RotateDirection::Right, &Theme::default());
        assert_eq!(text(&out), vec!["  ", ".b"]);
        assert_eq!(sel, [Coord::new(1, 1)].into_iter().collect());
    }

    #[test]
    fn test_mirror_selection_horizontal() {
        let g = grid_from(&["abc.", "de..", "...."]);
        let (out, sel) =
            mirror_selection(&g, &rect(0, 0, 1, 2), MirrorDirection::Horizontal, &Theme::default());
        assert_eq!(text(&out), vec!["cba.", ".ed.", "...."]);
        assert_eq!(sel, Some(rect(0, 0, 1, 2)));
    }

    #[test]
    fn test_mirror_selection_vertical() {
        let g = grid_from(&["ab", "cd", "ef"]);
        let (out, _) =
            mirror_selection(&g, &rect(0, 0, 1, 1), MirrorDirection::Vertical, &Theme::default());
        assert_eq!(text(&out), vec!["cd", "ab", "ef"]);
    }

    #[test]
    fn test_empty_selection_mirrors_whole_grid() {
        let g = grid_from(&["ab", "cd"]);
        let (v, sel) =
            mirror_selection(&g, &Selection::new(), MirrorDirection::Vertical, &Theme::default());
        assert_eq!(text(&v), vec!["cd", "ab"]);
        assert_eq!(sel, None);

        let (h, _) =
            mirror_selection(&g, &Selection::new(), MirrorDirection::Horizontal, &Theme::default());
        assert_eq!(text(&h), vec!["ba", "dc"]);
    }

    #[test]
    fn test_cleared_sources_use_theme_colors() {
        let theme = Theme::new(RgbColor(1, 1, 1), RgbColor(2, 2, 2));
        let g = grid_from(&["a..", "...", "..."]);
        let sel: Selection = [Coord::new(0, 0), Coord::new(0, 1)].into_iter().collect();
        let (out, placed) = rotate_selection(&g, &sel, RotateDirection::Left, &theme);

        assert_eq!(out.get(Coord::new(0, 0)), Some(&Cell::empty(&theme)));
        assert_eq!(out.get(Coord::new(0, 1)), Some(&Cell::empty(&theme)));
        assert_eq!(out.get(Coord::new(1, 1)).map(|c| c.ch), Some('a'));
        assert_eq!(placed, [Coord::new(1, 1)].into_iter().collect());
    }

    #[test]
    fn test_input_grid_is_untouched() {
        let g = grid_from(&["ab", "cd"]);
        let before = g.clone();
        let _ = rotate_selection(&g, &rect(0, 0, 1, 1), RotateDirection::Right, &Theme::default());
        let _ =
            mirror_selection(&g, &rect(0, 0, 1, 1), MirrorDirection::Vertical, &Theme::default());
        assert_eq!(g, before);
    }
}
