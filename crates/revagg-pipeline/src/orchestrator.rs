//! Bounded-concurrency fan-out over per-URL fetch+normalize tasks.
//!
//! Each input URL becomes one independent task; duplicates are processed
//! independently (input cardinality is preserved). The orchestrator is a
//! join barrier, not a race: it waits for every task to reach a terminal
//! state, and one item's failure never cancels its siblings. Dropping the
//! returned future drops all in-flight tasks, which cancels their
//! underlying HTTP calls.

use std::future::Future;

use futures::stream::{self, StreamExt};
use revagg_core::{ReviewRecord, SourceTag};
use revagg_provider::SourceUrl;

use crate::outcome::{ErrorKind, FetchOutcome, ItemError};

/// Runs `fetch_one` for every classified URL, at most `max_concurrent` at a
/// time, and returns exactly one outcome per input in input order.
///
/// URLs tagged [`SourceTag::Unknown`] short-circuit to an `Unclassified`
/// failure here — `fetch_one` is never invoked for them, so no network call
/// is attempted for unsupported inputs.
pub async fn aggregate<F, Fut>(
    urls: Vec<SourceUrl>,
    max_concurrent: usize,
    fetch_one: F,
) -> Vec<FetchOutcome>
where
    F: Fn(SourceUrl) -> Fut,
    Fut: Future<Output = Result<ReviewRecord, ItemError>>,
{
    let max_concurrent = max_concurrent.max(1);
    let fetch_one = &fetch_one;

    let mut indexed: Vec<(usize, FetchOutcome)> = stream::iter(urls.into_iter().enumerate())
        .map(|(index, url)| async move { (index, process_one(url, fetch_one).await) })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    // Reassemble into input order so callers can correlate outcome[i] with
    // input URL[i] regardless of completion order.
    indexed.sort_unstable_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}

async fn process_one<F, Fut>(url: SourceUrl, fetch_one: &F) -> FetchOutcome
where
    F: Fn(SourceUrl) -> Fut,
    Fut: Future<Output = Result<ReviewRecord, ItemError>>,
{
    if url.tag == SourceTag::Unknown {
        tracing::warn!(url = %url.raw, "could not determine review source for URL");
        return FetchOutcome::Failed {
            url: url.raw,
            kind: ErrorKind::Unclassified,
            detail: "URL matches no known review platform".to_owned(),
        };
    }

    let raw = url.raw.clone();
    match fetch_one(url).await {
        Ok(record) => FetchOutcome::Success { url: raw, record },
        Err(e) => {
            tracing::warn!(url = %raw, error = %e, "aggregation item failed");
            FetchOutcome::Failed {
                url: raw,
                kind: e.kind(),
                detail: e.to_string(),
            }
        }
    }
}
