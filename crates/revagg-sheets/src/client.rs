//! Append client for the external spreadsheet store.
//!
//! Rows go in as one batch append; when the batch write fails for a
//! non-auth reason the client falls back to per-row appends so every record
//! gets an explicit outcome — a failure on one record never silently drops
//! its siblings. The sheet is a shared append target across requests;
//! ordering across concurrent writers is unspecified but non-corrupting.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use revagg_core::ReviewRecord;
use serde_json::{json, Value};

use crate::error::SheetsError;
use crate::row::record_to_row;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";

/// Per-record persistence outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Appended,
    Failed(String),
}

/// Client for the spreadsheet append endpoint.
///
/// Holds the HTTP connection pool, the service credential, and the resolved
/// append URL. Use [`SheetsClient::new`] for production or
/// [`SheetsClient::with_base_url`] to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    token: String,
    append_url: Url,
}

impl SheetsClient {
    /// Creates a client pointed at the production spreadsheet API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidEndpoint`] if the
    /// spreadsheet id/range do not form a valid URL.
    pub fn new(
        spreadsheet_id: &str,
        range: &str,
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SheetsError> {
        Self::with_base_url(
            spreadsheet_id,
            range,
            token,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::new`].
    pub fn with_base_url(
        spreadsheet_id: &str,
        range: &str,
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let endpoint = format!(
            "{}/v4/spreadsheets/{spreadsheet_id}/values/{range}:append?valueInputOption=RAW",
            base_url.trim_end_matches('/')
        );
        let append_url = Url::parse(&endpoint)
            .map_err(|e| SheetsError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        Ok(Self {
            client,
            token: token.to_owned(),
            append_url,
        })
    }

    /// Appends records as new rows, returning one [`RowStatus`] per record
    /// in input order.
    ///
    /// Attempts a single batch append first. On failure, auth errors mark
    /// the whole batch failed (re-sending each row cannot fix a rejected
    /// credential); anything else falls back to per-row appends.
    pub async fn append_records(&self, records: &[ReviewRecord]) -> Vec<RowStatus> {
        if records.is_empty() {
            return Vec::new();
        }

        let rows: Vec<Vec<Value>> = records.iter().map(record_to_row).collect();
        let batch_err = match self.append_rows(&rows).await {
            Ok(()) => {
                tracing::info!(rows = records.len(), "batch append succeeded");
                return vec![RowStatus::Appended; records.len()];
            }
            Err(e) => e,
        };

        if matches!(batch_err, SheetsError::Auth { .. }) {
            tracing::error!(error = %batch_err, "spreadsheet auth rejected — failing batch");
            return vec![RowStatus::Failed(batch_err.to_string()); records.len()];
        }

        tracing::warn!(
            error = %batch_err,
            rows = records.len(),
            "batch append failed — falling back to per-row appends"
        );

        let mut statuses = Vec::with_capacity(records.len());
        for (record, row) in records.iter().zip(rows) {
            match self.append_rows(std::slice::from_ref(&row)).await {
                Ok(()) => statuses.push(RowStatus::Appended),
                Err(e) => {
                    tracing::warn!(hotel = %record.hotel_name, error = %e, "row append failed");
                    statuses.push(RowStatus::Failed(e.to_string()));
                }
            }
        }
        statuses
    }

    /// Sends one append call with the given rows.
    async fn append_rows(&self, rows: &[Vec<Value>]) -> Result<(), SheetsError> {
        let response = self
            .client
            .post(self.append_url.clone())
            .bearer_auth(&self.token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SheetsError::Auth {
                status: status.as_u16(),
            }),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(SheetsError::Quota { retry_after_secs })
            }
            s if !s.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                Err(SheetsError::Rejected {
                    status: s.as_u16(),
                    detail: detail.chars().take(200).collect(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_url_targets_configured_sheet_and_range() {
        let client = SheetsClient::with_base_url(
            "sheet-123",
            "AggregatedData",
            "token",
            5,
            "revagg-test/0.1",
            "https://sheets.googleapis.com",
        )
        .expect("client construction should not fail");
        assert_eq!(
            client.append_url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/AggregatedData:append?valueInputOption=RAW"
        );
    }
}
