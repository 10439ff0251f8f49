//! Request-scoped aggregation service: classify, fetch, normalize, persist.

use chrono::Utc;
use revagg_core::AppConfig;
use revagg_provider::{normalize, ProviderClient, ProviderError, SourceUrl};
use revagg_sheets::{RowStatus, SheetsClient, SheetsError};
use thiserror::Error;

use crate::orchestrator::aggregate;
use crate::outcome::{BatchResult, BatchSummary, PersistReport, PersistStatus};

/// Failure while constructing the service from configuration.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Sheets(#[from] SheetsError),
}

/// Long-lived service owning the provider and spreadsheet clients.
///
/// Built once at startup and shared across requests; [`Self::run`] carries
/// all per-request state in locals, so concurrent runs never interfere.
pub struct AggregationService {
    provider: ProviderClient,
    sheets: SheetsClient,
    max_concurrency: usize,
    persist_sparse_records: bool,
}

impl AggregationService {
    /// Builds both HTTP clients from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if either underlying client cannot be
    /// constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let provider = ProviderClient::new(
            &config.serpapi_key,
            config.fetch_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_ms,
        )?;
        let sheets = SheetsClient::new(
            &config.sheet_id,
            &config.sheet_range,
            &config.sheets_token,
            config.fetch_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self::new(
            provider,
            sheets,
            config.max_concurrency,
            config.persist_sparse_records,
        ))
    }

    #[must_use]
    pub fn new(
        provider: ProviderClient,
        sheets: SheetsClient,
        max_concurrency: usize,
        persist_sparse_records: bool,
    ) -> Self {
        Self {
            provider,
            sheets,
            max_concurrency,
            persist_sparse_records,
        }
    }

    /// Runs one aggregation batch over the given listing URLs.
    ///
    /// Every input URL gets a terminal outcome; every successfully fetched
    /// record gets a persistence report. Partial failure is the normal
    /// operating mode, so this does not return `Result` — failures are data.
    pub async fn run(&self, urls: Vec<String>) -> BatchResult {
        let submitted = urls.len();
        let inputs: Vec<SourceUrl> = urls.iter().map(SourceUrl::new).collect();

        let outcomes = aggregate(inputs, self.max_concurrency, |url| async move {
            let raw = self.provider.lookup(&url).await?;
            let record = normalize(url.tag, &raw, Utc::now())?;
            Ok(record)
        })
        .await;

        let persistence = self.persist_successes(&outcomes).await;

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let persisted = persistence
            .iter()
            .filter(|r| r.status == PersistStatus::Appended)
            .count();
        let summary = BatchSummary {
            submitted,
            succeeded,
            failed: submitted - succeeded,
            persisted,
        };
        tracing::info!(
            submitted = summary.submitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            persisted = summary.persisted,
            "aggregation batch complete"
        );

        BatchResult {
            outcomes,
            persistence,
            summary,
        }
    }

    /// Appends fetched records to the sheet, honouring the sparse-record
    /// policy, and reports one status per successful record in fetch order.
    async fn persist_successes(
        &self,
        outcomes: &[crate::outcome::FetchOutcome],
    ) -> Vec<PersistReport> {
        let mut reports = Vec::new();
        let mut pending_indices = Vec::new();
        let mut pending_records = Vec::new();

        for outcome in outcomes {
            let Some(record) = outcome.record() else {
                continue;
            };
            if !self.persist_sparse_records && record.is_sparse() {
                tracing::info!(hotel = %record.hotel_name, "skipping sparse record");
                reports.push(PersistReport {
                    url: outcome.url().to_owned(),
                    hotel_name: record.hotel_name.clone(),
                    status: PersistStatus::Skipped,
                });
                continue;
            }
            // Status patched in below once the append resolves.
            pending_indices.push(reports.len());
            pending_records.push(record.clone());
            reports.push(PersistReport {
                url: outcome.url().to_owned(),
                hotel_name: record.hotel_name.clone(),
                status: PersistStatus::Skipped,
            });
        }

        let statuses = self.sheets.append_records(&pending_records).await;
        for (report_index, row_status) in pending_indices.into_iter().zip(statuses) {
            reports[report_index].status = match row_status {
                RowStatus::Appended => PersistStatus::Appended,
                RowStatus::Failed(detail) => PersistStatus::Failed { detail },
            };
        }

        reports
    }
}
