//! Table Anchor Locator

use super::grid::CellGrid;

/// Index of the first row whose first cell contains `title` (case-sensitive)
pub fn find_anchor<G: CellGrid + ?Sized>(grid: &G, title: &str) -> Option<usize> {
    (0..grid.height()).find(|&row| grid.text(row, 0).contains(title))
}
