//! Source classification and hotel-name extraction from listing URLs.
//!
//! Classification is a pure pattern match over hostname/path signatures.
//! Unrecognized URLs classify as [`SourceTag::Unknown`], which is not an
//! error here — the fetch stage rejects it deterministically without a
//! network call.

use std::sync::OnceLock;

use regex::Regex;
use revagg_core::SourceTag;

/// A listing URL plus the platform it was classified to.
///
/// Immutable once created; built from request input and discarded when the
/// request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    pub raw: String,
    pub tag: SourceTag,
}

impl SourceUrl {
    /// Classifies `raw` and wraps it. Never fails — unrecognized URLs get
    /// [`SourceTag::Unknown`].
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tag = classify(&raw);
        Self { raw, tag }
    }
}

/// Determines which review platform a URL targets.
#[must_use]
pub fn classify(url: &str) -> SourceTag {
    if url.contains("booking.com") {
        return SourceTag::Booking;
    }
    if url.contains("tripadvisor") {
        return SourceTag::TripAdvisor;
    }
    if url.contains("google.com/travel/hotels") || url.contains("google.com/maps") {
        return SourceTag::Google;
    }
    SourceTag::Unknown
}

fn tripadvisor_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // e.g. Hotel_Review-g304556-d3240217-Reviews-The_Leela_Palace_Chennai-Chennai
    RE.get_or_init(|| Regex::new(r"-Reviews-(.*?)-").expect("valid regex"))
}

fn booking_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // e.g. /hotel/in/the-leela-palace-chennai.html
    RE.get_or_init(|| Regex::new(r"/hotel/\w{2}/(.*?)\.html").expect("valid regex"))
}

/// Extracts the provider search query for a classified listing URL.
///
/// TripAdvisor and Booking.com slugs carry the hotel name; Google listing
/// URLs are opaque entity references, so the URL itself is the query.
/// Returns `None` for [`SourceTag::Unknown`] or when no name can be
/// recovered from the slug.
#[must_use]
pub fn hotel_query(url: &SourceUrl) -> Option<String> {
    let query = match url.tag {
        SourceTag::TripAdvisor => tripadvisor_name_re()
            .captures(&url.raw)
            .map(|c| c[1].replace('_', " ")),
        SourceTag::Booking => booking_name_re()
            .captures(&url.raw)
            .map(|c| c[1].replace('-', " ")),
        SourceTag::Google => Some(url.raw.clone()),
        SourceTag::Unknown => None,
    };
    query.filter(|q| !q.is_empty())
}
