//! Sheet layout for the ticket analysis export
//!
//! Anchor titles and raw column ranges of the two sections. The export has
//! no header row we can trust, so these ranges are fixed by the format.

use serde::{Deserialize, Serialize};

use crate::extract::ColumnSpec;

pub const PROFILE_REPORT_TITLE: &str = "ticket analysis report for profile";
pub const RISK_TABLE_TITLE: &str = "SoD risks for profile";

/// Rows between an anchor and its first data row (title + column headers)
pub const HEADER_GAP: usize = 2;

/// Follows the escaped title prefix; group 1 is the profile name
pub const PROFILE_LABEL_PATTERN: &str = r"\s*[:\-]?\s*(.+)";

// Risk table columns
pub const RISK_ID: &str = "risk_id";
pub const DESCRIPTION: &str = "description";
pub const CRITICALITY: &str = "criticality";
pub const APPROVER: &str = "approver";
pub const SYSTEM: &str = "system";
pub const MODULE: &str = "module";
pub const ACTIVITY: &str = "activity";
pub const FUNCTIONALITY: &str = "functionality";
pub const ACTIVITY_2: &str = "activity_2";
pub const FUNCTIONALITY_2: &str = "functionality_2";

// Profile/status table columns (system and functionality reuse the names above)
pub const PROFILE: &str = "profile";
pub const STATUS: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLayout {
    pub profile_title: String,
    pub risk_title: String,
    pub header_gap: usize,
    /// Regex matched right after a section title to capture the profile name
    pub profile_label_pattern: String,
    pub risk_columns: Vec<ColumnSpec>,
    pub profile_columns: Vec<ColumnSpec>,
}

impl Default for ExtractionLayout {
    fn default() -> Self {
        Self {
            profile_title: PROFILE_REPORT_TITLE.to_string(),
            risk_title: RISK_TABLE_TITLE.to_string(),
            header_gap: HEADER_GAP,
            profile_label_pattern: PROFILE_LABEL_PATTERN.to_string(),
            risk_columns: vec![
                ColumnSpec::new(RISK_ID, 0, 2),
                ColumnSpec::new(DESCRIPTION, 2, 6),
                ColumnSpec::new(CRITICALITY, 6, 8),
                ColumnSpec::new(APPROVER, 8, 10),
                ColumnSpec::new(SYSTEM, 10, 12),
                ColumnSpec::new(MODULE, 12, 14),
                ColumnSpec::new(ACTIVITY, 14, 16),
                ColumnSpec::new(FUNCTIONALITY, 16, 18),
                ColumnSpec::new(ACTIVITY_2, 18, 20),
                ColumnSpec::new(FUNCTIONALITY_2, 20, 22),
            ],
            profile_columns: vec![
                ColumnSpec::new(PROFILE, 0, 4),
                ColumnSpec::new(SYSTEM, 4, 8),
                ColumnSpec::new(FUNCTIONALITY, 8, 12),
                ColumnSpec::new(STATUS, 12, 14),
            ],
        }
    }
}
