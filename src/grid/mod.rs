pub mod cell;

pub use cell::{Cell, RgbColor, Theme};

use std::collections::BTreeSet;

use crate::error::GridError;

/// Row/column position inside a grid.
///
/// Ordering is row-major, so a `BTreeSet<Coord>` iterates in reading order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A set of selected cells.
pub type Selection = BTreeSet<Coord>;

/// Rectangular, row-major grid of cells.
///
/// Every row has the same length; a grid with zero rows has zero columns.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Self {
        let cols = if rows == 0 { 0 } else { cols };
        let rows = if cols == 0 { 0 } else { rows };
        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    /// A grid of default empty cells.
    pub fn blank(rows: usize, cols: usize, theme: &Theme) -> Self {
        Self::filled(rows, cols, Cell::empty(theme))
    }

    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    actual: cells.len(),
                });
            }
        }

        if cols == 0 {
            return Ok(Self::from_cells(0, 0, Vec::new()));
        }

        let row_count = rows.len();
        Ok(Self {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Wraps an already row-major cell buffer. The caller guarantees `cells.len() == rows * cols`.
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord).then(|| coord.row * self.cols + coord.col)
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).map(move |i| &mut self.cells[i])
    }

    /// Overwrites the cell at `coord`. Returns false when `coord` is outside the grid.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        match self.get_mut(coord) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics, and an empty grid has no rows anyway
        self.cells.chunks(self.cols.max(1))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(<[Cell]>::to_vec)
            .collect()
    }
}
