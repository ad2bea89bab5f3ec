//! Risk Correlator
//!
//! Resolves both section anchors, rebuilds the tables, and joins newly
//! added functionalities against the two-sided SoD risk rows.

use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::layout::{
    ExtractionLayout, CRITICALITY, DESCRIPTION, FUNCTIONALITY, FUNCTIONALITY_2, MODULE, PROFILE,
    RISK_ID, STATUS, SYSTEM,
};
use super::{
    RiskDetail, RiskGroup, RiskOutcome, Scenario, ALL_RISKS_LABEL, UNIDENTIFIED_PROFILE,
};
use crate::error::{ReconError, ReconResult};
use crate::extract::{build_table, find_anchor, CellGrid, LogicalTable};

/// Status marking a functionality as newly granted to the profile
const ADDED_STATUS: &str = "Added";

/// One row of the SoD risk table
#[derive(Debug, Clone, Copy)]
struct RiskRow<'a> {
    risk_id: &'a str,
    description: &'a str,
    criticality: &'a str,
    system: &'a str,
    module: &'a str,
    functionality: &'a str,
    functionality_2: &'a str,
}

impl RiskRow<'_> {
    /// A risk pairs two functionalities; either side counts
    fn involves(&self, functionality: &str) -> bool {
        !functionality.is_empty()
            && (self.functionality == functionality || self.functionality_2 == functionality)
    }
}

/// One row of the profile/status table
#[derive(Debug, Clone, Copy)]
struct ProfileRow<'a> {
    profile: &'a str,
    system: &'a str,
    functionality: &'a str,
    status: &'a str,
}

fn column(table: &LogicalTable, name: &str) -> ReconResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ReconError::Internal(format!("layout has no '{}' column", name)))
}

fn risk_rows(table: &LogicalTable) -> ReconResult<Vec<RiskRow<'_>>> {
    let risk_id = column(table, RISK_ID)?;
    let description = column(table, DESCRIPTION)?;
    let criticality = column(table, CRITICALITY)?;
    let system = column(table, SYSTEM)?;
    let module = column(table, MODULE)?;
    let functionality = column(table, FUNCTIONALITY)?;
    let functionality_2 = column(table, FUNCTIONALITY_2)?;

    Ok(table
        .rows()
        .iter()
        .map(|row| RiskRow {
            risk_id: &row[risk_id],
            description: &row[description],
            criticality: &row[criticality],
            system: &row[system],
            module: &row[module],
            functionality: &row[functionality],
            functionality_2: &row[functionality_2],
        })
        .collect())
}

fn profile_rows(table: &LogicalTable) -> ReconResult<Vec<ProfileRow<'_>>> {
    let profile = column(table, PROFILE)?;
    let system = column(table, SYSTEM)?;
    let functionality = column(table, FUNCTIONALITY)?;
    let status = column(table, STATUS)?;

    Ok(table
        .rows()
        .iter()
        .map(|row| ProfileRow {
            profile: &row[profile],
            system: &row[system],
            functionality: &row[functionality],
            status: &row[status],
        })
        .collect())
}

/// Profile name captured by `label_pattern` right after `prefix` in `title`
pub fn extract_profile_name(title: &str, prefix: &str, label_pattern: &str) -> Option<String> {
    let pattern = format!("{}{}", regex::escape(prefix), label_pattern);
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid profile label pattern '{}': {}", label_pattern, e);
            return None;
        }
    };
    re.captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Best-effort profile name from the profile report title, then the risk title
fn resolve_profile<G: CellGrid + ?Sized>(
    grid: &G,
    profile_anchor: Option<usize>,
    risk_anchor: Option<usize>,
    layout: &ExtractionLayout,
) -> String {
    let from_title = |anchor: Option<usize>, prefix: &str| {
        anchor.and_then(|row| {
            extract_profile_name(grid.text(row, 0), prefix, &layout.profile_label_pattern)
        })
    };

    from_title(profile_anchor, &layout.profile_title)
        .or_else(|| from_title(risk_anchor, &layout.risk_title))
        .unwrap_or_else(|| {
            warn!("Could not identify the profile name from the report titles");
            UNIDENTIFIED_PROFILE.to_string()
        })
}

/// Analyze with the default export layout
pub fn analyze_risks<G: CellGrid + ?Sized>(grid: &G, scenario: Scenario) -> RiskOutcome {
    analyze_risks_with(grid, scenario, &ExtractionLayout::default())
}

pub fn analyze_risks_with<G: CellGrid + ?Sized>(
    grid: &G,
    scenario: Scenario,
    layout: &ExtractionLayout,
) -> RiskOutcome {
    let profile_anchor = find_anchor(grid, &layout.profile_title);
    let risk_anchor = find_anchor(grid, &layout.risk_title);
    let profile = resolve_profile(grid, profile_anchor, risk_anchor, layout);

    debug!(
        "Anchors for {} scenario: profile report {:?}, risks {:?}",
        scenario, profile_anchor, risk_anchor
    );
    if scenario == Scenario::Creation && profile_anchor.is_none() {
        warn!(
            "Section '{}' not found; continuing with the risk table only",
            layout.profile_title
        );
    }

    let result = match (scenario, profile_anchor, risk_anchor) {
        (_, _, None) => Err(section_missing(&layout.risk_title)),
        (Scenario::Maintenance, None, _) => Err(section_missing(&layout.profile_title)),
        (Scenario::Creation, _, Some(risk_anchor)) => {
            creation(grid, risk_anchor, &profile, layout)
        }
        (Scenario::Maintenance, Some(profile_anchor), Some(risk_anchor)) => {
            maintenance(grid, profile_anchor, risk_anchor, &profile, layout)
        }
    };

    result.unwrap_or_else(|err| RiskOutcome::from_error(profile, &err))
}

fn section_missing(title: &str) -> ReconError {
    ReconError::Extraction(format!("Required section not found: '{}'", title))
}

fn build_risk_table<G: CellGrid + ?Sized>(
    grid: &G,
    risk_anchor: usize,
    layout: &ExtractionLayout,
) -> ReconResult<LogicalTable> {
    let start = (risk_anchor + layout.header_gap).min(grid.height());
    build_table(grid, start, grid.height(), &layout.risk_columns)
}

fn creation<G: CellGrid + ?Sized>(
    grid: &G,
    risk_anchor: usize,
    profile: &str,
    layout: &ExtractionLayout,
) -> ReconResult<RiskOutcome> {
    let table = build_risk_table(grid, risk_anchor, layout)?;
    let risks = risk_rows(&table)?;

    if risks.is_empty() {
        return Ok(RiskOutcome::no_risks(
            profile.to_string(),
            "No SoD risks were identified for this profile.",
        ));
    }

    let details = risks
        .iter()
        .map(|risk| RiskDetail {
            risk_id: risk.risk_id.to_string(),
            description: risk.description.to_string(),
            criticality: risk.criticality.to_string(),
            profile: profile.to_string(),
            system: risk.system.to_string(),
        })
        .collect();

    info!("⚠️ {} SoD risks identified for new profile '{}'", risks.len(), profile);

    let mut groups = RiskGroup::new();
    groups.insert(ALL_RISKS_LABEL.to_string(), details);
    Ok(RiskOutcome::success(
        profile.to_string(),
        format!("{} SoD risks identified for profile '{}'.", risks.len(), profile),
        groups,
    ))
}

fn maintenance<G: CellGrid + ?Sized>(
    grid: &G,
    profile_anchor: usize,
    risk_anchor: usize,
    profile: &str,
    layout: &ExtractionLayout,
) -> ReconResult<RiskOutcome> {
    let risk_table = build_risk_table(grid, risk_anchor, layout)?;
    let risks = risk_rows(&risk_table)?;

    // The profile section stops one row above the risk title. Its data start
    // clamps to that end, so a section with no room for rows reads as empty.
    // A profile title at or below the risk title leaves an inverted span.
    let (start, end) = if profile_anchor < risk_anchor {
        let end = risk_anchor - 1;
        ((profile_anchor + layout.header_gap).min(end), end)
    } else {
        (profile_anchor + layout.header_gap, risk_anchor.saturating_sub(1))
    };
    let profile_table = build_table(grid, start, end, &layout.profile_columns)?;

    let added: Vec<ProfileRow<'_>> = profile_rows(&profile_table)?
        .into_iter()
        .filter(|row| row.status.trim() == ADDED_STATUS)
        .collect();

    if added.is_empty() {
        return Ok(RiskOutcome::no_risks(
            profile.to_string(),
            "No functionalities were added to this profile.",
        ));
    }

    let mut groups = RiskGroup::new();
    let mut modules = BTreeSet::new();

    for row in &added {
        for risk in risks.iter().filter(|risk| risk.involves(row.functionality)) {
            groups
                .entry(row.functionality.to_string())
                .or_default()
                .push(RiskDetail {
                    risk_id: risk.risk_id.to_string(),
                    description: risk.description.to_string(),
                    criticality: risk.criticality.to_string(),
                    profile: row.profile.to_string(),
                    system: row.system.to_string(),
                });
            if !risk.module.trim().is_empty() {
                modules.insert(risk.module.trim());
            }
        }
    }

    if groups.is_empty() {
        return Ok(RiskOutcome::no_risks(
            profile.to_string(),
            "None of the added functionalities introduce SoD risks.",
        ));
    }

    let risk_total: usize = groups.values().map(Vec::len).sum();
    info!(
        "⚠️ {} SoD risks across {} added functionalities for profile '{}'",
        risk_total,
        groups.len(),
        profile
    );

    let mut outcome = RiskOutcome::success(
        profile.to_string(),
        format!(
            "{} SoD risks found for {} added functionalities.",
            risk_total,
            groups.len()
        ),
        groups,
    );
    outcome.modules_affected = Some(modules.into_iter().collect::<Vec<_>>().join(", "));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::layout::PROFILE_LABEL_PATTERN;

    fn risk<'a>(f1: &'a str, f2: &'a str) -> RiskRow<'a> {
        RiskRow {
            risk_id: "R1",
            description: "",
            criticality: "",
            system: "",
            module: "",
            functionality: f1,
            functionality_2: f2,
        }
    }

    #[test]
    fn test_involves_is_two_sided() {
        let row = risk("Create vendor", "Pay vendor");
        assert!(row.involves("Create vendor"));
        assert!(row.involves("Pay vendor"));
        assert!(!row.involves("pay vendor"));
    }

    #[test]
    fn test_involves_ignores_blank_names() {
        assert!(!risk("Create vendor", "").involves(""));
    }

    #[test]
    fn test_extract_profile_name() {
        assert_eq!(
            extract_profile_name(
                "ticket analysis report for profile: AP_CLERK",
                "ticket analysis report for profile",
                PROFILE_LABEL_PATTERN
            ),
            Some("AP_CLERK".to_string())
        );
        assert_eq!(
            extract_profile_name(
                "SoD risks for profile  BUYER ",
                "SoD risks for profile",
                PROFILE_LABEL_PATTERN
            ),
            Some("BUYER".to_string())
        );
        assert_eq!(
            extract_profile_name(
                "SoD risks for profile",
                "SoD risks for profile",
                PROFILE_LABEL_PATTERN
            ),
            None
        );
    }

    #[test]
    fn test_extract_profile_name_custom_label_pattern() {
        let pattern = r"\s*\((\w+)\)";
        assert_eq!(
            extract_profile_name("SoD risks for profile (AP_CLERK) v2", "SoD risks for profile", pattern),
            Some("AP_CLERK".to_string())
        );
        assert_eq!(
            extract_profile_name("SoD risks for profile AP_CLERK", "SoD risks for profile", pattern),
            None
        );
        assert_eq!(
            extract_profile_name("SoD risks for profile x", "SoD risks for profile", "(["),
            None
        );
    }
}
