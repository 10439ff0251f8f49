//! HTTP client for the external review-data provider.
//!
//! Wraps `reqwest` with provider-specific error handling, API key
//! management, and throttling-aware retries. One lookup issues one GET to
//! the provider's `search` endpoint, parameterized by the source tag and
//! the hotel query extracted from the listing URL.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use revagg_core::SourceTag;
use serde_json::Value;

use crate::classify::{hotel_query, SourceUrl};
use crate::error::ProviderError;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/";

/// Client for the review-data provider.
///
/// Holds the HTTP connection pool, API key, and retry policy. Process-wide
/// and reused across requests; carries no request-specific state. Use
/// [`ProviderClient::new`] for production or
/// [`ProviderClient::with_base_url`] to point at a mock server in tests.
pub struct ProviderClient {
    client: Client,
    api_key: String,
    search_url: Url,
    timeout_secs: u64,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ProviderClient {
    /// Creates a new client pointed at the production provider API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ProviderError::Rejected`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so `join` appends to the root
        // path rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| ProviderError::Rejected(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            search_url,
            timeout_secs,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Looks up review data for one classified listing URL.
    ///
    /// Returns the raw structured provider response; interpretation beyond
    /// the top-level error envelope is left to [`crate::normalize`].
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Unclassified`] — unknown platform or no hotel
    ///   query recoverable from the URL. No network call is made.
    /// - [`ProviderError::Timeout`] — the per-call timeout elapsed.
    /// - [`ProviderError::RateLimited`] — HTTP 429 after retries exhausted.
    /// - [`ProviderError::Rejected`] — provider-reported error or non-2xx.
    /// - [`ProviderError::Http`] — network or TLS failure.
    /// - [`ProviderError::Deserialize`] — body is not valid JSON.
    pub async fn lookup(&self, url: &SourceUrl) -> Result<Value, ProviderError> {
        let query = hotel_query(url).ok_or_else(|| ProviderError::Unclassified {
            url: url.raw.clone(),
        })?;

        let request_url = self.build_url(engine_for(url.tag), &query);
        tracing::info!(url = %url.raw, source = %url.tag, query = %query, "provider lookup");

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let request_url = request_url.clone();
            async move { self.execute(&request_url, &url.raw).await }
        })
        .await
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, engine: &str, query: &str) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("engine", engine);
            pairs.append_pair("q", query);
            pairs.append_pair("hl", "en");
            pairs.append_pair("gl", "in");
        }
        url
    }

    /// Sends one GET, maps status-level failures to typed errors, and parses
    /// the body as JSON.
    async fn execute(&self, request_url: &Url, listing_url: &str) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(request_url.clone())
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(ProviderError::Rejected(format!(
                "HTTP {status} from provider"
            )));
        }

        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("lookup for {listing_url}"),
                source: e,
            })?;

        // The provider reports application-level failures inside a 200 body.
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            return Err(ProviderError::Rejected(message.to_owned()));
        }

        Ok(payload)
    }

    fn map_transport(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            ProviderError::Http(err)
        }
    }
}

/// Maps a source tag to the provider engine that serves it. Google listings
/// go through the maps-reviews engine; hotel listings on other platforms go
/// through the hotels engine.
fn engine_for(tag: SourceTag) -> &'static str {
    match tag {
        SourceTag::Google => "google_maps_reviews",
        SourceTag::Booking | SourceTag::TripAdvisor | SourceTag::Unknown => "google_hotels",
    }
}
