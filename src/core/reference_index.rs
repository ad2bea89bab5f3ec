//! Reference Index
//!
//! Per-comparison lookup structure over one module of the catalog.

use std::collections::HashMap;
use tracing::debug;

use super::text_normalizer::normalize;
use crate::catalog::FunctionalityRecord;

/// Normalized-name lookup for a single module.
///
/// Built fresh for each comparison and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    module: String,
    by_name: HashMap<String, FunctionalityRecord>,
    /// Normalized names in catalog order, duplicates included
    names: Vec<String>,
}

impl ReferenceIndex {
    /// Index the records whose module equals `module_filter` exactly.
    ///
    /// The filter is not normalized: `"Payroll "` does not select `"Payroll"`.
    /// When two records normalize to the same name the later one wins.
    pub fn build(records: &[FunctionalityRecord], module_filter: &str) -> Self {
        let mut by_name = HashMap::new();
        let mut names = Vec::new();

        for record in records.iter().filter(|r| r.module == module_filter) {
            let key = normalize(&record.name);
            names.push(key.clone());
            by_name.insert(key, record.clone());
        }

        debug!(
            "Built reference index for '{}': {} names, {} distinct",
            module_filter,
            names.len(),
            by_name.len()
        );

        Self {
            module: module_filter.to_string(),
            by_name,
            names,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Look up an already-normalized name
    pub fn get(&self, normalized: &str) -> Option<&FunctionalityRecord> {
        self.by_name.get(normalized)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }
}
