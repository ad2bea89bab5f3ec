//! Reference catalog
//!
//! Functionality records, the reader seam used by comparisons, and
//! validation of uploaded catalog sheets.

pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::DEFAULT_MODULES;
use crate::error::{ReconError, ReconResult};

pub use store::CatalogStore;

/// Column headers a catalog sheet must carry, in export order
pub const CATALOG_COLUMNS: [&str; 4] = ["id", "functionality", "module id", "module"];

/// One row of the reference catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalityRecord {
    pub id: String,
    pub name: String,
    pub module_id: String,
    pub module: String,
}

/// Supplies the active catalog snapshot
pub trait CatalogReader {
    /// Every record of the active snapshot, in catalog order
    fn records(&self) -> ReconResult<Vec<FunctionalityRecord>>;
}

impl CatalogReader for Vec<FunctionalityRecord> {
    fn records(&self) -> ReconResult<Vec<FunctionalityRecord>> {
        Ok(self.clone())
    }
}

/// Turn a headered catalog sheet into records.
///
/// The header row must contain every name in [`CATALOG_COLUMNS`] (extra
/// columns are ignored). Rows whose functionality name is blank are skipped.
pub fn records_from_table(
    headers: &[String],
    rows: &[Vec<String>],
) -> ReconResult<Vec<FunctionalityRecord>> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let missing: Vec<&str> = CATALOG_COLUMNS
        .iter()
        .copied()
        .filter(|col| position(*col).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ReconError::InputValidation(format!(
            "Invalid catalog sheet! Missing columns: {}. Expected structure: {}.",
            missing.join(", "),
            CATALOG_COLUMNS.join(", ")
        )));
    }

    // Positions are known to exist past the check above
    let cols: Vec<usize> = CATALOG_COLUMNS
        .iter()
        .filter_map(|c| position(*c))
        .collect();
    let cell = |row: &Vec<String>, idx: usize| row.get(cols[idx]).cloned().unwrap_or_default();

    Ok(rows
        .iter()
        .filter(|row| !cell(*row, 1).trim().is_empty())
        .map(|row| FunctionalityRecord {
            id: cell(row, 0),
            name: cell(row, 1),
            module_id: cell(row, 2),
            module: cell(row, 3),
        })
        .collect())
}

/// Distinct module names, sorted; the static fallback list when the catalog has none
pub fn available_modules(records: &[FunctionalityRecord]) -> Vec<String> {
    let modules: BTreeSet<&str> = records
        .iter()
        .map(|r| r.module.as_str())
        .filter(|m| !m.trim().is_empty())
        .collect();

    if modules.is_empty() {
        return DEFAULT_MODULES.iter().map(|m| m.to_string()).collect();
    }
    modules.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_records_from_table_maps_columns_by_name() {
        let headers = headers(&["module", "id", "extra", "functionality", "module id"]);
        let rows = vec![vec![
            "Payroll".to_string(),
            "7".to_string(),
            "x".to_string(),
            "Run payroll".to_string(),
            "M2".to_string(),
        ]];

        let records = records_from_table(&headers, &rows).unwrap();
        assert_eq!(
            records,
            vec![FunctionalityRecord {
                id: "7".to_string(),
                name: "Run payroll".to_string(),
                module_id: "M2".to_string(),
                module: "Payroll".to_string(),
            }]
        );
    }

    #[test]
    fn test_records_from_table_reports_missing_columns() {
        let headers = headers(&["id", "functionality"]);
        let err = records_from_table(&headers, &[]).unwrap_err();
        match err {
            ReconError::InputValidation(msg) => {
                assert!(msg.contains("module id, module"), "message was {}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_records_from_table_skips_blank_names() {
        let headers = headers(&CATALOG_COLUMNS);
        let rows = vec![
            vec!["1".into(), "  ".into(), "M".into(), "Mod".into()],
            vec!["2".into(), "Login".into()],
        ];
        let records = records_from_table(&headers, &rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Login");
        assert_eq!(records[0].module, "");
    }

    #[test]
    fn test_available_modules_sorted_and_distinct() {
        let rec = |module: &str| FunctionalityRecord {
            id: "1".into(),
            name: "f".into(),
            module_id: "m".into(),
            module: module.into(),
        };
        let modules = available_modules(&[rec("Zeta"), rec("Alpha"), rec("Zeta")]);
        assert_eq!(modules, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }

    #[test]
    fn test_available_modules_fallback() {
        let modules = available_modules(&[]);
        assert_eq!(modules.len(), DEFAULT_MODULES.len());
    }
}
