//! Canonical data model shared across the aggregation pipeline.
//!
//! Every source-specific provider response is normalized into a
//! [`ReviewRecord`] before it reaches persistence. Records are immutable
//! after creation; all mutation is replacement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of recent review snippets kept per record.
pub const MAX_SNIPPETS: usize = 5;

/// Maximum length (in characters) of a single review snippet.
pub const MAX_SNIPPET_CHARS: usize = 300;

/// The review platform a listing URL targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Booking,
    TripAdvisor,
    Google,
    Unknown,
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::Booking => write!(f, "Booking.com"),
            SourceTag::TripAdvisor => write!(f, "TripAdvisor"),
            SourceTag::Google => write!(f, "Google Reviews"),
            SourceTag::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One hotel's review metadata from one platform, in canonical shape.
///
/// Invariants:
/// - `hotel_name` is non-empty and `source` is never [`SourceTag::Unknown`]
///   (both enforced at normalization time).
/// - Numeric fields are either a valid number or `None` — never a sentinel
///   like `0` or a placeholder string.
/// - `snippets` preserves provider order (assumed recency order), holds at
///   most [`MAX_SNIPPETS`] entries, each at most [`MAX_SNIPPET_CHARS`] chars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub hotel_name: String,
    pub source: SourceTag,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub snippets: Vec<String>,
    pub scraped_at: DateTime<Utc>,
}

impl ReviewRecord {
    /// Returns `true` when every optional field is absent — i.e. the provider
    /// gave us nothing beyond the hotel name. Whether such records are still
    /// persisted is a configuration policy, not a hardcoded choice.
    #[must_use]
    pub fn is_sparse(&self) -> bool {
        self.rating.is_none()
            && self.review_count.is_none()
            && self.address.is_none()
            && self.website.is_none()
            && self.phone.is_none()
            && self.snippets.is_empty()
    }
}
