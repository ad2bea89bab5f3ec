//! Reconciliation Matcher
//!
//! Classifies each input functionality against a [`ReferenceIndex`]:
//! exact lookup on the normalized name first, weighted fuzzy search second.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::reference_index::ReferenceIndex;
use super::text_normalizer::normalize;
use crate::catalog::CatalogReader;
use crate::error::{ReconError, ReconResult};
use crate::utils::fuzzy::extract_one;

/// Lowest fuzzy score accepted as a suggestion (inclusive)
pub const DEFAULT_FUZZY_CUTOFF: f64 = 80.0;

/// Share of non-matched rows that triggers the wrong-module advisory
pub const DEFAULT_ALERT_RATIO: f64 = 0.90;

/// The advisory needs strictly more rows than this
pub const DEFAULT_ALERT_MIN_SAMPLE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Matched,
    SuggestedMatch,
    Unmatched,
}

impl MatchStatus {
    /// Presentation rank: suggestions first, clean matches last
    pub fn severity_rank(self) -> u8 {
        match self {
            MatchStatus::SuggestedMatch => 0,
            MatchStatus::Unmatched => 1,
            MatchStatus::Matched => 2,
        }
    }
}

/// Classification of one input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub input_text: String,
    pub status: MatchStatus,
    pub matched_id: Option<String>,
    pub suggested_id: Option<String>,
    pub suggested_name: Option<String>,
    pub score: f64,
}

/// Tunables for one reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub fuzzy_cutoff: f64,
    pub alert_ratio: f64,
    pub alert_min_sample: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            alert_ratio: DEFAULT_ALERT_RATIO,
            alert_min_sample: DEFAULT_ALERT_MIN_SAMPLE,
        }
    }
}

/// Full outcome of a reconciliation run, serializable for later reuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub module: String,
    /// One entry per input name, in input order
    pub results: Vec<MatchResult>,
    pub matched: usize,
    pub divergent: usize,
    /// Wrong-module warning; informational only
    pub advisory: Option<String>,
    pub summary: String,
}

impl ReconcileReport {
    /// Every input matched exactly (and there was at least one)
    pub fn is_perfect_match(&self) -> bool {
        !self.results.is_empty() && self.matched == self.results.len()
    }

    /// Results ordered suggestions, then unmatched, then matched; stable within a rank
    pub fn by_severity(&self) -> Vec<&MatchResult> {
        let mut ordered: Vec<&MatchResult> = self.results.iter().collect();
        ordered.sort_by_key(|r| r.status.severity_rank());
        ordered
    }
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn classify(input: &str, index: &ReferenceIndex, cutoff: f64) -> MatchResult {
    let key = normalize(input);

    if let Some(record) = index.get(&key) {
        return MatchResult {
            input_text: input.to_string(),
            status: MatchStatus::Matched,
            matched_id: Some(record.id.clone()),
            suggested_id: None,
            suggested_name: Some(record.name.clone()),
            score: 100.0,
        };
    }

    let suggestion = extract_one(&key, index.names(), cutoff)
        .and_then(|m| index.get(&m.value).map(|record| (record, m.score)));

    match suggestion {
        Some((record, score)) => {
            debug!("'{}' ~ '{}' ({:.2})", key, record.name, score);
            MatchResult {
                input_text: input.to_string(),
                status: MatchStatus::SuggestedMatch,
                matched_id: None,
                suggested_id: Some(record.id.clone()),
                suggested_name: Some(record.name.clone()),
                score: round2(score),
            }
        }
        None => {
            debug!("'{}' has no catalog candidate above {}", key, cutoff);
            MatchResult {
                input_text: input.to_string(),
                status: MatchStatus::Unmatched,
                matched_id: None,
                suggested_id: None,
                suggested_name: None,
                score: 0.0,
            }
        }
    }
}

/// Wrong-module advisory, if the divergence rate warrants one
pub fn module_advisory(
    total: usize,
    matched: usize,
    module: &str,
    settings: &MatchSettings,
) -> Option<String> {
    if total <= settings.alert_min_sample {
        return None;
    }
    let ratio = (total - matched) as f64 / total as f64;
    if ratio < settings.alert_ratio {
        return None;
    }
    Some(format!(
        "Attention: {}% of the functionalities were not found. Are you sure you selected the correct module ('{}')?",
        (ratio * 100.0).round() as i64,
        module
    ))
}

/// Reconcile with the default cutoff and alert thresholds
pub fn reconcile<S: AsRef<str>>(names: &[S], index: &ReferenceIndex) -> ReconcileReport {
    reconcile_with(names, index, &MatchSettings::default())
}

pub fn reconcile_with<S: AsRef<str>>(
    names: &[S],
    index: &ReferenceIndex,
    settings: &MatchSettings,
) -> ReconcileReport {
    let results: Vec<MatchResult> = names
        .iter()
        .map(|name| classify(name.as_ref(), index, settings.fuzzy_cutoff))
        .collect();

    let matched = results
        .iter()
        .filter(|r| r.status == MatchStatus::Matched)
        .count();
    let divergent = results.len() - matched;
    let advisory = module_advisory(results.len(), matched, index.module(), settings);

    let summary = if !results.is_empty() && divergent == 0 {
        format!("Analysis complete: {} functionalities found.", matched)
    } else {
        format!(
            "Analysis complete with divergences: {} found, {} divergent or with suggestion.",
            matched, divergent
        )
    };

    info!(
        "🔎 Reconciled {} names against '{}': {} matched, {} divergent",
        results.len(),
        index.module(),
        matched,
        divergent
    );

    ReconcileReport {
        module: index.module().to_string(),
        results,
        matched,
        divergent,
        advisory,
        summary,
    }
}

/// Validate the catalog scope and input list, then reconcile.
///
/// An empty catalog and an empty module scope are both configuration
/// problems but carry different messages.
pub fn compare<C: CatalogReader + ?Sized, S: AsRef<str>>(
    catalog: &C,
    names: &[S],
    module: &str,
    settings: &MatchSettings,
) -> ReconResult<ReconcileReport> {
    let records = catalog.records()?;
    if records.is_empty() {
        return Err(ReconError::Configuration(
            "No reference catalog is active. Activate a catalog before running a comparison."
                .to_string(),
        ));
    }

    if names.is_empty() {
        return Err(ReconError::InputValidation(
            "The uploaded list has no functionalities to analyze.".to_string(),
        ));
    }

    let index = ReferenceIndex::build(&records, module);
    if index.is_empty() {
        return Err(ReconError::Configuration(format!(
            "Module '{}' has no functionalities in the active catalog. Select another module or activate a catalog that covers it.",
            module
        )));
    }

    Ok(reconcile_with(names, &index, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FunctionalityRecord;

    fn record(id: &str, name: &str) -> FunctionalityRecord {
        FunctionalityRecord {
            id: id.to_string(),
            name: name.to_string(),
            module_id: "10".to_string(),
            module: "X".to_string(),
        }
    }

    fn index(names: &[(&str, &str)]) -> ReferenceIndex {
        let records: Vec<_> = names.iter().map(|(id, n)| record(id, n)).collect();
        ReferenceIndex::build(&records, "X")
    }

    #[test]
    fn test_exact_match() {
        let report = reconcile(&["  LOGIN "], &index(&[("1", "Login")]));
        let result = &report.results[0];
        assert_eq!(result.status, MatchStatus::Matched);
        assert_eq!(result.matched_id.as_deref(), Some("1"));
        assert_eq!(result.suggested_name.as_deref(), Some("Login"));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.input_text, "  LOGIN ");
    }

    #[test]
    fn test_suggested_match() {
        let report = reconcile(&["Logim"], &index(&[("1", "Login")]));
        let result = &report.results[0];
        assert_eq!(result.status, MatchStatus::SuggestedMatch);
        assert_eq!(result.suggested_id.as_deref(), Some("1"));
        assert_eq!(result.suggested_name.as_deref(), Some("Login"));
        assert!(result.matched_id.is_none());
        assert!(result.score >= 80.0 && result.score < 100.0);
    }

    #[test]
    fn test_unmatched_below_cutoff() {
        let report = reconcile(&["Issue invoice"], &index(&[("1", "Login")]));
        let result = &report.results[0];
        assert_eq!(result.status, MatchStatus::Unmatched);
        assert_eq!(result.score, 0.0);
        assert!(result.suggested_name.is_none());
        assert!(result.suggested_id.is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(85.714285), 85.71);
        assert_eq!(round2(80.0), 80.0);
    }

    #[test]
    fn test_advisory_threshold() {
        let settings = MatchSettings::default();
        assert!(module_advisory(11, 1, "X", &settings).is_some());
        assert!(module_advisory(10, 0, "X", &settings).is_none());
        assert!(module_advisory(11, 2, "X", &settings).is_none());

        let msg = module_advisory(20, 0, "Payroll", &settings).unwrap();
        assert!(msg.contains("100%"));
        assert!(msg.contains("'Payroll'"));
    }

    #[test]
    fn test_by_severity_is_stable() {
        let report = reconcile(
            &["login", "zzzz", "logim", "logout", "qqqq"],
            &index(&[("1", "Login"), ("2", "Logout")]),
        );
        let order: Vec<&str> = report
            .by_severity()
            .iter()
            .map(|r| r.input_text.as_str())
            .collect();
        assert_eq!(order, vec!["logim", "zzzz", "qqqq", "login", "logout"]);
        // Original order untouched
        assert_eq!(report.results[0].input_text, "login");
    }

    #[test]
    fn test_compare_empty_catalog() {
        let catalog: Vec<FunctionalityRecord> = Vec::new();
        let err = compare(&catalog, &["login"], "X", &MatchSettings::default()).unwrap_err();
        assert!(matches!(err, ReconError::Configuration(ref m) if m.contains("No reference catalog")));
    }

    #[test]
    fn test_compare_empty_module_scope() {
        let catalog = vec![record("1", "Login")];
        let err = compare(&catalog, &["login"], "Y", &MatchSettings::default()).unwrap_err();
        assert!(matches!(err, ReconError::Configuration(ref m) if m.contains("'Y'")));
    }

    #[test]
    fn test_compare_empty_input() {
        let catalog = vec![record("1", "Login")];
        let names: Vec<String> = Vec::new();
        let err = compare(&catalog, &names, "X", &MatchSettings::default()).unwrap_err();
        assert!(matches!(err, ReconError::InputValidation(_)));
    }
}
