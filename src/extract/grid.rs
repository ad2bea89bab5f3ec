//! Cell grids
//!
//! The extractor only sees a grid through [`CellGrid`], so dense rows from a
//! spreadsheet reader and sparse cell maps work the same way.

use std::collections::BTreeMap;

/// Read-only access to an unheadered, possibly ragged 2-D grid of text cells
pub trait CellGrid {
    /// Number of rows
    fn height(&self) -> usize;

    /// Width of the widest row
    fn width(&self) -> usize;

    /// Cell text, or `None` for blank/missing cells
    fn cell(&self, row: usize, col: usize) -> Option<&str>;

    /// Cell text with blanks read as the empty string
    fn text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).unwrap_or("")
    }
}

/// Dense row-major grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
    /// Widest row, fixed at construction
    width: usize,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl CellGrid for RawGrid {
    fn height(&self) -> usize {
        self.rows.len()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Grid backed by a map of occupied cells
#[derive(Debug, Clone, Default)]
pub struct SparseGrid {
    cells: BTreeMap<(usize, usize), String>,
    height: usize,
    width: usize,
}

impl SparseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.height = self.height.max(row + 1);
        self.width = self.width.max(col + 1);
        self.cells.insert((row, col), value.into());
    }
}

impl CellGrid for SparseGrid {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells
            .get(&(row, col))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}
