//! AccessRecon Error Types
//!
//! Centralized error taxonomy for reconciliation and risk extraction.

use thiserror::Error;

/// Message shown to end users when the failure carries no actionable detail
pub const GENERIC_FAILURE: &str = "An internal error occurred while processing the request.";

/// Central error type for AccessRecon
#[derive(Error, Debug)]
pub enum ReconError {
    /// No active catalog, or the selected module has nothing in it
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Required column/header missing, empty input list
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Required anchor row missing, malformed column slice
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for AccessRecon operations
pub type ReconResult<T> = Result<T, ReconError>;

impl ReconError {
    /// Text safe to show to the person who triggered the operation.
    ///
    /// Validation, configuration and extraction errors are actionable and
    /// pass through; everything else collapses to [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            ReconError::Configuration(msg)
            | ReconError::InputValidation(msg)
            | ReconError::Extraction(msg) => msg.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            ReconError::Configuration(_)
                | ReconError::InputValidation(_)
                | ReconError::Extraction(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = ReconError::Internal("index out of bounds at row 42".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert!(err.is_internal());
    }

    #[test]
    fn test_user_message_passes_validation_text() {
        let err = ReconError::InputValidation("missing columns: module".to_string());
        assert_eq!(err.user_message(), "missing columns: module");
        assert!(!err.is_internal());
    }
}
