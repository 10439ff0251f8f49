use revagg_core::SourceTag;
use thiserror::Error;

/// Errors returned by the review-data provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The URL matches no known review platform — rejected before any
    /// network call is made.
    #[error("URL matches no known review platform: {url}")]
    Unclassified { url: String },

    /// The per-call timeout elapsed before the provider responded.
    #[error("provider lookup timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The provider throttled us (HTTP 429). The only retriable condition.
    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// The provider reported an application-level error (error body,
    /// unexpected status, no data for the target).
    #[error("provider rejected lookup: {0}")]
    Rejected(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while mapping a raw provider response into a `ReviewRecord`.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A field the canonical record cannot do without (hotel name) is absent
    /// or empty. Fatal for that record — never defaulted to a placeholder.
    #[error("missing required field '{field}' in {source_tag} response")]
    MissingRequiredField {
        source_tag: SourceTag,
        field: &'static str,
    },

    /// A numeric field held a value that cannot possibly be numeric
    /// (an object or array where a number was expected).
    #[error("field '{field}' is not numeric: {value}")]
    MalformedNumeric { field: &'static str, value: String },
}
