use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::grid::{Cell, Grid, RgbColor};

/// `{rows, cols}` header of a saved grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

/// One saved cell. Selection state is not persisted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "char")]
    pub ch: char,
    pub fg: RgbColor,
    pub bg: RgbColor,
}

/// Exchanged JSON representation of a grid.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GridFile {
    pub dimensions: Dimensions,
    pub grid: Vec<Vec<CellRecord>>,
}

impl GridFile {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            dimensions: Dimensions {
                rows: grid.rows(),
                cols: grid.cols(),
            },
            grid: grid
                .rows_iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| CellRecord {
                            ch: cell.ch,
                            fg: cell.fg,
                            bg: cell.bg,
                        })
                        .collect()
                })
                .collect(),
        }
    }

    pub fn into_grid(self) -> Result<Grid, FormatError> {
        let Dimensions { rows, cols } = self.dimensions;
        let mismatch = |found: String| FormatError::DimensionMismatch {
            declared_rows: rows,
            declared_cols: cols,
            found,
        };

        if self.grid.len() != rows {
            return Err(mismatch(format!("{} rows", self.grid.len())));
        }
        if let Some((i, row)) = self.grid.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(mismatch(format!("{} cells in row {}", row.len(), i)));
        }

        let rows = self
            .grid
            .into_iter()
            .map(|row| row.into_iter().map(|r| Cell::new(r.ch, r.fg, r.bg)).collect())
            .collect();
        Ok(Grid::from_rows(rows)?)
    }
}

pub fn to_json(grid: &Grid) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&GridFile::from_grid(grid))?)
}

pub fn from_json(text: &str) -> Result<Grid, FormatError> {
    serde_json::from_str::<GridFile>(text)?.into_grid()
}

pub fn load_grid(path: &Path) -> Result<Grid, FormatError> {
    let text = std::fs::read_to_string(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&text)
}

pub fn save_grid(path: &Path, grid: &Grid) -> Result<(), FormatError> {
    let text = to_json(grid)?;
    std::fs::write(path, text).map_err(|source| FormatError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Coord, Theme};

    #[test]
    fn test_document_shape() {
        let mut grid = Grid::blank(1, 2, &Theme::default());
        grid.set(Coord::new(0, 1), Cell::new('é', RgbColor(0x64, 0x64, 0x64), RgbColor::WHITE));

        let value: serde_json::Value = serde_json::from_str(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(value["dimensions"]["rows"], 1);
        assert_eq!(value["dimensions"]["cols"], 2);
        assert_eq!(value["grid"][0][1]["char"], "é");
        assert_eq!(value["grid"][0][1]["fg"], "#646464");
        assert_eq!(value["grid"][0][0]["bg"], "#FFFFFF");
        assert!(value["grid"][0][0].get("selected").is_none());
    }

    #[test]
    fn test_load_accepts_lowercase_hex() {
        let doc = r##"{"dimensions":{"rows":1,"cols":1},"grid":[[{"char":"#","fg":"#abcdef","bg":"#000000"}]]}"##;
        let grid = from_json(doc).unwrap();
        assert_eq!(grid.cells()[0].fg, RgbColor(0xAB, 0xCD, 0xEF));
        assert_eq!(grid.cells()[0].ch, '#');
    }

    #[test]
    fn test_rejects_multi_char_cells_and_bad_colors() {
        let two_chars = r##"{"dimensions":{"rows":1,"cols":1},"grid":[[{"char":"ab","fg":"#000000","bg":"#000000"}]]}"##;
        assert!(matches!(from_json(two_chars), Err(FormatError::Json(_))));

        let bad_color = r##"{"dimensions":{"rows":1,"cols":1},"grid":[[{"char":"a","fg":"black","bg":"#000000"}]]}"##;
        assert!(matches!(from_json(bad_color), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let doc = r##"{"dimensions":{"rows":1,"cols":2},"grid":[[{"char":"a","fg":"#000000","bg":"#000000"}]]}"##;
        assert!(matches!(from_json(doc), Err(FormatError::DimensionMismatch { .. })));

        let doc = r##"{"dimensions":{"rows":2,"cols":1},"grid":[[{"char":"a","fg":"#000000","bg":"#000000"}]]}"##;
        assert!(matches!(from_json(doc), Err(FormatError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.json");
        let mut grid = Grid::blank(2, 3, &Theme::default());
        grid.set(Coord::new(1, 2), Cell::new('@', RgbColor(1, 2, 3), RgbColor(4, 5, 6)));

        save_grid(&path, &grid).unwrap();
        assert_eq!(load_grid(&path).unwrap(), grid);

        let missing = load_grid(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, FormatError::Read { .. }));
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::blank(0, 0, &Theme::default());
        assert_eq!(from_json(&to_json(&grid).unwrap()).unwrap(), grid);
    }
}
