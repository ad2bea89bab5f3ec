//! Core reconciliation modules
//!
//! Normalization, the per-module reference index, the matcher and the
//! import projection built from its results.

pub mod matcher;
pub mod projection;
pub mod reference_index;
pub mod text_normalizer;

pub use matcher::{
    compare, reconcile, reconcile_with, MatchResult, MatchSettings, MatchStatus, ReconcileReport,
};
pub use projection::{import_rows, ImportRow, NOT_FOUND_MARKER};
pub use reference_index::ReferenceIndex;
pub use text_normalizer::normalize;
