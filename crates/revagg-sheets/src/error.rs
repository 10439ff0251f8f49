use thiserror::Error;

/// Errors returned by the spreadsheet append client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected our credential (HTTP 401/403). Not worth
    /// re-attempting per row — the credential will not heal mid-batch.
    #[error("spreadsheet auth rejected (HTTP {status})")]
    Auth { status: u16 },

    /// Write quota exhausted (HTTP 429).
    #[error("spreadsheet quota exhausted (retry after {retry_after_secs}s)")]
    Quota { retry_after_secs: u64 },

    /// Any other non-2xx append response.
    #[error("append rejected with HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// The configured spreadsheet id/range does not form a valid endpoint.
    #[error("invalid spreadsheet endpoint: {0}")]
    InvalidEndpoint(String),
}
