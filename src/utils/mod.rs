//! Utility modules

pub mod fuzzy;

pub use fuzzy::{extract_one, weighted_ratio, FuzzyMatch};
