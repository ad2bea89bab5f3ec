//! Column-Range Table Builder
//!
//! Source sheets spread one logical field over several merged raw columns,
//! so each logical column is rebuilt by concatenating a fixed column range.

use serde::{Deserialize, Serialize};

use super::grid::CellGrid;
use crate::error::{ReconError, ReconResult};

/// A named logical column covering raw columns `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl ColumnSpec {
    pub fn new(name: &str, start: usize, end: usize) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
        }
    }
}

/// Named columns over row-major values; every row has one value per column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LogicalTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Every value of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[col].as_str()).collect())
    }
}

/// Concatenate `grid[row][start..end]` with no separator
fn concat_range<G: CellGrid + ?Sized>(grid: &G, row: usize, start: usize, end: usize) -> String {
    (start..end).map(|col| grid.text(row, col)).collect()
}

/// Build a logical table from rows `[row_start, row_end)`.
///
/// Column ranges past the grid width are clamped. Rows where every logical
/// column comes out empty are dropped. A row span outside the grid, or a
/// column spec whose start is past its end, is an extraction error.
pub fn build_table<G: CellGrid + ?Sized>(
    grid: &G,
    row_start: usize,
    row_end: usize,
    specs: &[ColumnSpec],
) -> ReconResult<LogicalTable> {
    if row_start > row_end {
        return Err(ReconError::Extraction(format!(
            "row span {}..{} is inverted",
            row_start, row_end
        )));
    }
    if row_end > grid.height() {
        return Err(ReconError::Extraction(format!(
            "row span {}..{} exceeds grid height {}",
            row_start,
            row_end,
            grid.height()
        )));
    }
    if let Some(bad) = specs.iter().find(|s| s.start > s.end) {
        return Err(ReconError::Extraction(format!(
            "column '{}' has inverted range {}..{}",
            bad.name, bad.start, bad.end
        )));
    }

    let width = grid.width();
    let ranges: Vec<(usize, usize)> = specs
        .iter()
        .map(|s| (s.start, s.end.min(width)))
        .collect();

    let rows = (row_start..row_end)
        .map(|row| {
            ranges
                .iter()
                .map(|&(start, end)| concat_range(grid, row, start, end))
                .collect::<Vec<String>>()
        })
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .collect();

    Ok(LogicalTable {
        columns: specs.iter().map(|s| s.name.clone()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::grid::RawGrid;
    use std::cell::Cell;

    /// Wraps a grid and counts width lookups
    struct CountingGrid {
        inner: RawGrid,
        width_calls: Cell<usize>,
    }

    impl CellGrid for CountingGrid {
        fn height(&self) -> usize {
            self.inner.height()
        }

        fn width(&self) -> usize {
            self.width_calls.set(self.width_calls.get() + 1);
            self.inner.width()
        }

        fn cell(&self, row: usize, col: usize) -> Option<&str> {
            self.inner.cell(row, col)
        }
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let grid = RawGrid::from_rows(vec![vec!["Ap", "pro", "ve", "X"]]);
        let table = build_table(&grid, 0, 1, &[ColumnSpec::new("word", 0, 3)]).unwrap();
        assert_eq!(table.value(0, "word"), Some("Approve"));
    }

    #[test]
    fn test_ranges_clamped_to_width() {
        let grid = RawGrid::from_rows(vec![vec!["a", "b"], vec!["c"]]);
        let specs = [ColumnSpec::new("all", 0, 50), ColumnSpec::new("beyond", 10, 20)];
        let table = build_table(&grid, 0, 2, &specs).unwrap();
        assert_eq!(table.column("all"), Some(vec!["ab", "c"]));
        assert_eq!(table.column("beyond"), Some(vec!["", ""]));
    }

    #[test]
    fn test_blank_rows_dropped() {
        let grid = RawGrid::from_rows(vec![vec!["x", ""], vec!["", ""], vec![], vec!["", "y"]]);
        let specs = [ColumnSpec::new("a", 0, 1), ColumnSpec::new("b", 1, 2)];
        let table = build_table(&grid, 0, 4, &specs).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec!["".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_empty_span_is_empty_table() {
        let grid = RawGrid::from_rows(vec![vec!["x"]]);
        let table = build_table(&grid, 1, 1, &[ColumnSpec::new("a", 0, 1)]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["a".to_string()]);
    }

    #[test]
    fn test_malformed_spans_are_errors() {
        let grid = RawGrid::from_rows(vec![vec!["x"]]);
        let spec = [ColumnSpec::new("a", 0, 1)];
        assert!(matches!(
            build_table(&grid, 2, 1, &spec),
            Err(ReconError::Extraction(_))
        ));
        assert!(matches!(
            build_table(&grid, 0, 5, &spec),
            Err(ReconError::Extraction(_))
        ));
        assert!(matches!(
            build_table(&grid, 0, 1, &[ColumnSpec::new("b", 3, 1)]),
            Err(ReconError::Extraction(_))
        ));
    }

    #[test]
    fn test_large_grid_reads_width_once() {
        let rows: Vec<Vec<String>> = (0..20_000)
            .map(|i| (0..22).map(|c| format!("{}:{}", i, c)).collect())
            .collect();
        let grid = CountingGrid {
            inner: RawGrid::new(rows),
            width_calls: Cell::new(0),
        };
        let specs: Vec<ColumnSpec> = (0..11)
            .map(|i| ColumnSpec::new(&format!("c{}", i), i * 2, i * 2 + 2))
            .collect();

        let table = build_table(&grid, 0, 20_000, &specs).unwrap();
        assert_eq!(table.len(), 20_000);
        assert_eq!(table.value(19_999, "c10"), Some("19999:2019999:21"));
        assert_eq!(grid.width_calls.get(), 1);
    }
}
