//! Heuristic table extraction from unheadered grids

pub mod anchor;
pub mod grid;
pub mod table;

pub use anchor::find_anchor;
pub use grid::{CellGrid, RawGrid, SparseGrid};
pub use table::{build_table, ColumnSpec, LogicalTable};
