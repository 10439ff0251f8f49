//! Batch-level result types shaped for the API-facing response.

use revagg_core::ReviewRecord;
use revagg_provider::{NormalizeError, ProviderError};
use serde::Serialize;
use thiserror::Error;

/// Per-item error kinds surfaced in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unclassified,
    Timeout,
    RateLimited,
    ProviderRejected,
    MissingRequiredField,
    MalformedNumeric,
}

/// Error from one fetch+normalize task.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ItemError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ItemError::Provider(e) => match e {
                ProviderError::Unclassified { .. } => ErrorKind::Unclassified,
                ProviderError::Timeout { .. } => ErrorKind::Timeout,
                ProviderError::RateLimited { .. } => ErrorKind::RateLimited,
                // Transport and body-shape failures are provider-side faults
                // from the caller's perspective.
                ProviderError::Rejected(_)
                | ProviderError::Http(_)
                | ProviderError::Deserialize { .. } => ErrorKind::ProviderRejected,
            },
            ItemError::Normalize(e) => match e {
                NormalizeError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
                NormalizeError::MalformedNumeric { .. } => ErrorKind::MalformedNumeric,
            },
        }
    }
}

/// Terminal outcome for one input URL.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success {
        url: String,
        record: ReviewRecord,
    },
    Failed {
        url: String,
        kind: ErrorKind,
        detail: String,
    },
}

impl FetchOutcome {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Success { url, .. } | FetchOutcome::Failed { url, .. } => url,
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&ReviewRecord> {
        match self {
            FetchOutcome::Success { record, .. } => Some(record),
            FetchOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Persistence outcome for one successfully fetched record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistStatus {
    Appended,
    /// Withheld by the sparse-record policy.
    Skipped,
    Failed { detail: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PersistReport {
    pub url: String,
    pub hotel_name: String,
    #[serde(flatten)]
    pub status: PersistStatus,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchSummary {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub persisted: usize,
}

/// Request-level output: one outcome per input URL in input order, plus a
/// persistence report per successfully fetched record. Created fresh per
/// request; never shared across requests.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub outcomes: Vec<FetchOutcome>,
    pub persistence: Vec<PersistReport>,
    pub summary: BatchSummary,
}
