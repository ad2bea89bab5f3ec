//! SoD risk analysis
//!
//! Extracts the profile/status section and the SoD risk section from a
//! ticket analysis export and correlates them by functionality name.

pub mod correlator;
pub mod layout;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{error, warn};

use crate::error::ReconError;

pub use correlator::{analyze_risks, analyze_risks_with};
pub use layout::ExtractionLayout;

/// Profile name used when the report title cannot be parsed
pub const UNIDENTIFIED_PROFILE: &str = "unidentified";

/// Group label for the creation scenario
pub const ALL_RISKS_LABEL: &str = "all identified risks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// New profile: every risk in the sheet applies
    Creation,
    /// Existing profile: only risks touching newly added functionalities
    Maintenance,
}

impl FromStr for Scenario {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "creation" => Ok(Scenario::Creation),
            "maintenance" => Ok(Scenario::Maintenance),
            other => Err(ReconError::InputValidation(format!(
                "unknown scenario '{}', expected 'creation' or 'maintenance'",
                other
            ))),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Creation => write!(f, "creation"),
            Scenario::Maintenance => write!(f, "maintenance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    Success,
    NoRisks,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDetail {
    pub risk_id: String,
    pub description: String,
    pub criticality: String,
    pub profile: String,
    pub system: String,
}

/// Functionality name -> risks it takes part in
pub type RiskGroup = BTreeMap<String, Vec<RiskDetail>>;

/// Terminal result of a risk analysis; never an `Err`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskOutcome {
    pub status: RiskStatus,
    pub message: String,
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RiskGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_affected: Option<String>,
}

impl RiskOutcome {
    pub fn success(profile: String, message: String, data: RiskGroup) -> Self {
        Self {
            status: RiskStatus::Success,
            message,
            profile,
            data: Some(data),
            modules_affected: None,
        }
    }

    pub fn no_risks(profile: String, message: &str) -> Self {
        Self {
            status: RiskStatus::NoRisks,
            message: message.to_string(),
            profile,
            data: None,
            modules_affected: None,
        }
    }

    /// Error outcome; internal detail is logged, not returned
    pub fn from_error(profile: String, err: &ReconError) -> Self {
        if err.is_internal() {
            error!("Risk analysis failed for profile '{}': {}", profile, err);
        } else {
            warn!("Risk analysis stopped for profile '{}': {}", profile, err);
        }
        Self {
            status: RiskStatus::Error,
            message: err.user_message(),
            profile,
            data: None,
            modules_affected: None,
        }
    }

    /// Total number of risk entries across all groups
    pub fn risk_count(&self) -> usize {
        self.data
            .as_ref()
            .map(|groups| groups.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parse() {
        assert_eq!("Creation".parse::<Scenario>().unwrap(), Scenario::Creation);
        assert_eq!(" maintenance ".parse::<Scenario>().unwrap(), Scenario::Maintenance);
        assert!("audit".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_outcome_serialization_skips_empty_data() {
        let outcome = RiskOutcome::no_risks(UNIDENTIFIED_PROFILE.to_string(), "none");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"no_risks\""));
        assert!(!json.contains("data"));
    }

    #[test]
    fn test_error_outcome_hides_internal_detail() {
        let err = ReconError::Internal("column 'status' missing".to_string());
        let outcome = RiskOutcome::from_error("P".to_string(), &err);
        assert_eq!(outcome.status, RiskStatus::Error);
        assert!(!outcome.message.contains("status"));
        assert_eq!(outcome.profile, "P");
    }
}
