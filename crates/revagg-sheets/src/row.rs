//! Positional row shaping for the spreadsheet store.
//!
//! The sheet's header order is a storage-compatibility invariant: cell
//! positions below must match [`HEADER`] exactly, independent of how
//! `ReviewRecord` is represented internally.

use revagg_core::ReviewRecord;
use serde_json::{json, Value};

/// Declared column order of the target sheet.
pub const HEADER: [&str; 9] = [
    "Hotel Name",
    "Source",
    "Overall Rating",
    "Review Count",
    "Address",
    "Website",
    "Phone",
    "Recent Reviews Snippets",
    "Scraped_At",
];

const SNIPPET_SEPARATOR: &str = " | ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts one record into a positional row. Absent optional fields become
/// empty cells, never `0` or a placeholder string.
#[must_use]
pub fn record_to_row(record: &ReviewRecord) -> Vec<Value> {
    vec![
        json!(record.hotel_name),
        json!(record.source.to_string()),
        record.rating.map_or_else(empty_cell, |r| json!(r)),
        record.review_count.map_or_else(empty_cell, |c| json!(c)),
        text_cell(record.address.as_deref()),
        text_cell(record.website.as_deref()),
        text_cell(record.phone.as_deref()),
        json!(record.snippets.join(SNIPPET_SEPARATOR)),
        json!(record.scraped_at.format(TIMESTAMP_FORMAT).to_string()),
    ]
}

fn empty_cell() -> Value {
    Value::String(String::new())
}

fn text_cell(text: Option<&str>) -> Value {
    text.map_or_else(empty_cell, |t| json!(t))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use revagg_core::SourceTag;

    use super::*;

    fn record() -> ReviewRecord {
        ReviewRecord {
            hotel_name: "The Leela Palace Chennai".to_owned(),
            source: SourceTag::TripAdvisor,
            rating: Some(4.5),
            review_count: Some(3240),
            address: Some("Adyar Seaface, Chennai".to_owned()),
            website: Some("https://www.theleela.com".to_owned()),
            phone: Some("+91 44 3366 1234".to_owned()),
            snippets: vec!["Lovely stay.".to_owned(), "Great pool.".to_owned()],
            scraped_at: Utc.with_ymd_and_hms(2026, 8, 23, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn row_matches_declared_header_order() {
        let row = record_to_row(&record());
        assert_eq!(row.len(), HEADER.len());
        assert_eq!(row[0], json!("The Leela Palace Chennai"));
        assert_eq!(row[1], json!("TripAdvisor"));
        assert_eq!(row[2], json!(4.5));
        assert_eq!(row[3], json!(3240));
        assert_eq!(row[4], json!("Adyar Seaface, Chennai"));
        assert_eq!(row[5], json!("https://www.theleela.com"));
        assert_eq!(row[6], json!("+91 44 3366 1234"));
        assert_eq!(row[7], json!("Lovely stay. | Great pool."));
        assert_eq!(row[8], json!("2026-08-23 09:30:00"));
    }

    #[test]
    fn absent_optionals_become_empty_cells_not_zero() {
        let mut sparse = record();
        sparse.rating = None;
        sparse.review_count = None;
        sparse.address = None;
        sparse.website = None;
        sparse.phone = None;
        sparse.snippets = vec![];

        let row = record_to_row(&sparse);
        assert_eq!(row[2], json!(""));
        assert_eq!(row[3], json!(""));
        assert_eq!(row[4], json!(""));
        assert_eq!(row[5], json!(""));
        assert_eq!(row[6], json!(""));
        assert_eq!(row[7], json!(""));
    }

    #[test]
    fn single_snippet_has_no_separator() {
        let mut one = record();
        one.snippets = vec!["Only one.".to_owned()];
        let row = record_to_row(&one);
        assert_eq!(row[7], json!("Only one."));
    }
}
