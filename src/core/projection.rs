//! Import projection
//!
//! Turns a reconciliation result sequence into rows for a profile import sheet.

use serde::{Deserialize, Serialize};

use super::matcher::MatchResult;

/// Written in place of a functionality id when nothing was found
pub const NOT_FOUND_MARKER: &str = "not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub id: String,
    pub profile: String,
    pub functionality_id: String,
    pub functionality: String,
}

/// One import row per result, in result order.
///
/// The functionality id is the matched id, else the suggested id, else
/// [`NOT_FOUND_MARKER`]; the name prefers the catalog spelling over the raw input.
pub fn import_rows(results: &[MatchResult], profile_id: &str, profile_name: &str) -> Vec<ImportRow> {
    results
        .iter()
        .map(|result| ImportRow {
            id: profile_id.to_string(),
            profile: profile_name.to_string(),
            functionality_id: result
                .matched_id
                .as_ref()
                .or(result.suggested_id.as_ref())
                .cloned()
                .unwrap_or_else(|| NOT_FOUND_MARKER.to_string()),
            functionality: result
                .suggested_name
                .clone()
                .unwrap_or_else(|| result.input_text.clone()),
        })
        .collect()
}
