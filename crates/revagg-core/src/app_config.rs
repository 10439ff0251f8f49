/// Process-wide configuration for the aggregation pipeline.
///
/// Built once at startup from environment variables (see [`crate::config`])
/// and threaded through component constructors — components never read the
/// environment at call sites.
#[derive(Clone)]
pub struct AppConfig {
    /// Credential for the external review-data provider.
    pub serpapi_key: String,
    /// Identifier of the spreadsheet receiving appended rows.
    pub sheet_id: String,
    /// Bearer credential for the spreadsheet service.
    pub sheets_token: String,
    /// Worksheet/range name rows are appended to.
    pub sheet_range: String,
    pub max_concurrency: usize,
    pub fetch_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Whether records carrying only a hotel name are still persisted.
    pub persist_sparse_records: bool,
    pub log_level: String,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("serpapi_key", &"[redacted]")
            .field("sheet_id", &self.sheet_id)
            .field("sheets_token", &"[redacted]")
            .field("sheet_range", &self.sheet_range)
            .field("max_concurrency", &self.max_concurrency)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("persist_sparse_records", &self.persist_sparse_records)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
