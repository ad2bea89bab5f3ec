//! Spreadsheet sources
//!
//! Reads the first sheet of a workbook into the in-memory shapes the core
//! works on: an unheadered grid, a name list, or catalog records.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

use crate::catalog::{records_from_table, FunctionalityRecord};
use crate::error::{ReconError, ReconResult};
use crate::extract::{CellGrid, RawGrid};

/// Copy a sheet range into a grid, keeping absolute row/column positions
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for sheet_row in range.rows() {
        let mut row = vec![String::new(); col_offset];
        row.extend(sheet_row.iter().map(|cell| cell.to_string()));
        rows.push(row);
    }
    RawGrid::new(rows)
}

fn first_sheet(path: &Path) -> ReconResult<Range<Data>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        ReconError::InputValidation(format!("Could not open '{}': {}", path.display(), e))
    })?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ReconError::InputValidation(format!("'{}' has no worksheets", path.display()))
        })?
        .map_err(|e| {
            ReconError::InputValidation(format!("Could not read '{}': {}", path.display(), e))
        })
}

/// First sheet as an unheadered grid
pub fn read_grid(path: &Path) -> ReconResult<RawGrid> {
    let grid = grid_from_range(&first_sheet(path)?);
    debug!(
        "Read {}x{} grid from {}",
        grid.height(),
        grid.width(),
        path.display()
    );
    Ok(grid)
}

/// First-column values below the header row, blanks dropped
pub fn name_list_from_grid<G: CellGrid + ?Sized>(grid: &G) -> Vec<String> {
    (1..grid.height())
        .map(|row| grid.text(row, 0))
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_name_list(path: &Path) -> ReconResult<Vec<String>> {
    Ok(name_list_from_grid(&read_grid(path)?))
}

/// Catalog records from a sheet whose first row holds the column headers
pub fn read_catalog_sheet(path: &Path) -> ReconResult<Vec<FunctionalityRecord>> {
    let grid = read_grid(path)?;
    let rows = grid.rows();
    let headers = rows.first().cloned().unwrap_or_default();
    records_from_table(&headers, rows.get(1..).unwrap_or(&[]))
}
