//! Normalization of raw provider responses into canonical [`ReviewRecord`]s.
//!
//! Each source tag has one static lookup table ([`FieldMap`]) of JSON
//! pointers mapping raw keys to canonical fields, so all source-specific
//! mapping is auditable in one place rather than branching per field.

use chrono::{DateTime, Utc};
use revagg_core::{ReviewRecord, SourceTag, MAX_SNIPPETS, MAX_SNIPPET_CHARS};
use serde_json::Value;

use crate::error::NormalizeError;

/// JSON-pointer table for one source's response shape. All pointers are
/// resolved relative to `root`.
struct FieldMap {
    root: &'static str,
    hotel_name: &'static str,
    rating: &'static str,
    review_count: &'static str,
    address: &'static str,
    website: &'static str,
    phone: &'static str,
    snippets: &'static str,
}

/// Shape of the maps-reviews engine: place metadata under `place_info`,
/// recent reviews as a top-level array.
const GOOGLE_MAP: FieldMap = FieldMap {
    root: "",
    hotel_name: "/place_info/title",
    rating: "/place_info/rating",
    review_count: "/place_info/reviews",
    address: "/place_info/address",
    website: "/place_info/website",
    phone: "/place_info/phone",
    snippets: "/reviews",
};

/// Shape of the hotels engine (used for Booking.com and TripAdvisor
/// targets): the first matched property carries all metadata.
const HOTELS_MAP: FieldMap = FieldMap {
    root: "/properties/0",
    hotel_name: "/name",
    rating: "/overall_rating",
    review_count: "/reviews",
    address: "/address",
    website: "/link",
    phone: "/phone",
    snippets: "/reviews_breakdown/user_reviews/reviews",
};

fn field_map(tag: SourceTag) -> &'static FieldMap {
    match tag {
        SourceTag::Google => &GOOGLE_MAP,
        SourceTag::Booking | SourceTag::TripAdvisor | SourceTag::Unknown => &HOTELS_MAP,
    }
}

/// Maps a raw provider response into a [`ReviewRecord`].
///
/// `scraped_at` is the normalization wall-clock time supplied by the caller
/// (never a provider timestamp); passing it explicitly keeps normalization
/// deterministic under test.
///
/// # Errors
///
/// - [`NormalizeError::MissingRequiredField`] — hotel name absent/empty, or
///   `tag` is [`SourceTag::Unknown`] (the fetch stage rejects those earlier).
/// - [`NormalizeError::MalformedNumeric`] — a numeric field holds a value
///   that cannot possibly be a number (object or array).
pub fn normalize(
    tag: SourceTag,
    raw: &Value,
    scraped_at: DateTime<Utc>,
) -> Result<ReviewRecord, NormalizeError> {
    if tag == SourceTag::Unknown {
        return Err(NormalizeError::MissingRequiredField {
            source_tag: tag,
            field: "source_tag",
        });
    }

    let map = field_map(tag);
    let root = raw.pointer(map.root).unwrap_or(&Value::Null);

    let hotel_name = root
        .pointer(map.hotel_name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(NormalizeError::MissingRequiredField {
            source_tag: tag,
            field: "hotel_name",
        })?
        .to_owned();

    let mut rating = coerce_f64(root.pointer(map.rating), "rating")?;
    let mut review_count = coerce_i64(root.pointer(map.review_count), "review_count")?;

    let review_items = root.pointer(map.snippets).and_then(Value::as_array);

    // The maps-reviews engine sometimes omits aggregate place metadata but
    // still returns individual reviews; derive the aggregates from those.
    if tag == SourceTag::Google {
        if let Some(items) = review_items {
            if rating.is_none() {
                rating = mean_item_rating(items);
            }
            if review_count.is_none() && !items.is_empty() {
                review_count = i64::try_from(items.len()).ok();
            }
        }
    }

    let snippets = review_items
        .map(|items| {
            items
                .iter()
                .filter_map(snippet_text)
                .take(MAX_SNIPPETS)
                .map(truncate_snippet)
                .collect()
        })
        .unwrap_or_default();

    Ok(ReviewRecord {
        hotel_name,
        source: tag,
        rating,
        review_count,
        address: opt_string(root, map.address),
        website: opt_string(root, map.website),
        phone: opt_string(root, map.phone),
        snippets,
        scraped_at,
    })
}

fn opt_string(root: &Value, pointer: &str) -> Option<String> {
    root.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Leniently coerces a raw JSON value into a float.
///
/// Numbers pass through; strings are stripped of decoration and parsed;
/// anything unparseable becomes absent — never zero, never a sentinel.
/// Objects and arrays cannot be numeric and are reported as malformed.
fn coerce_f64(value: Option<&Value>, field: &'static str) -> Result<Option<f64>, NormalizeError> {
    match value {
        None | Some(Value::Null | Value::Bool(_)) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64().filter(|f| f.is_finite())),
        Some(Value::String(s)) => Ok(lenient_f64(s)),
        Some(other @ (Value::Array(_) | Value::Object(_))) => Err(NormalizeError::MalformedNumeric {
            field,
            value: short_repr(other),
        }),
    }
}

/// Integer variant of [`coerce_f64`]; fractional inputs are rounded.
fn coerce_i64(value: Option<&Value>, field: &'static str) -> Result<Option<i64>, NormalizeError> {
    if let Some(Value::Number(n)) = value {
        if let Some(i) = n.as_i64() {
            return Ok(Some(i));
        }
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(coerce_f64(value, field)?.map(|f| f.round() as i64))
}

/// Extracts the first numeric token from a decorated string, e.g.
/// `"4.5 / 5"` -> `4.5`, `"1,234 reviews"` -> `1234`.
fn lenient_f64(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    // Include a leading minus sign immediately before the first digit.
    let start = if start > 0 && s.as_bytes()[start - 1] == b'-' {
        start - 1
    } else {
        start
    };
    let token: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .filter(|c| *c != ',')
        .collect();
    token.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Mean of the per-review `rating` fields, rounded to two decimals.
fn mean_item_rating(items: &[Value]) -> Option<f64> {
    let ratings: Vec<f64> = items
        .iter()
        .filter_map(|item| item.get("rating").and_then(Value::as_f64))
        .collect();
    if ratings.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Pulls the review text out of one raw review item. Items are either bare
/// strings or objects whose text key varies per engine.
fn snippet_text(item: &Value) -> Option<&str> {
    let text = match item {
        Value::String(s) => s.as_str(),
        Value::Object(_) => ["snippet", "text", "review", "comment"]
            .iter()
            .find_map(|key| item.get(key).and_then(Value::as_str))?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

fn truncate_snippet(text: &str) -> String {
    text.chars().take(MAX_SNIPPET_CHARS).collect()
}

fn short_repr(value: &Value) -> String {
    let repr = value.to_string();
    if repr.chars().count() > 80 {
        let mut short: String = repr.chars().take(80).collect();
        short.push('…');
        short
    } else {
        repr
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
