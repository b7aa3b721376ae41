//! Error types for risk scoring operations

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the scoring engine
#[derive(Debug, Error)]
pub enum GeoRiskError {
    /// Bad weights or options. Fatal and never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input scores or an unknown region/sector
    #[error("Validation error: {0}")]
    Validation(String),

    /// Every collaborator the call depends on failed
    #[error("Data unavailable: {reason}")]
    DataUnavailable {
        reason: String,
    },

    /// JSON export or import failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeoRiskError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type alias for scoring operations
pub type Result<T> = std::result::Result<T, GeoRiskError>;

/// Failure of an external collaborator (news or market source)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The collaborator reported an error
    #[error("{source_name} fetch failed: {reason}")]
    Failed {
        source_name: String,
        reason: String,
    },

    /// The collaborator did not answer before the deadline
    #[error("{source_name} timed out after {}ms", .after.as_millis())]
    Timeout {
        source_name: String,
        after: Duration,
    },

    /// The collaborator produced an item that fails boundary validation
    #[error("{source_name} returned an invalid item: {reason}")]
    InvalidItem {
        source_name: String,
        reason: String,
    },
}

impl SourceError {
    /// Build a `Failed` error for the named collaborator
    pub fn failed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
