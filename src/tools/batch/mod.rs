//! Batch Tools

mod tests;

use crate::error::{FetchError, Result};
use crate::tools::fetch::{self, FetchConfig, FetchRequest, FetchResult};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// Upper bound on URLs accepted by a single batch call.
pub const MAX_BATCH_URLS: usize = 5;

const DEFAULT_CONCURRENCY: usize = 2;

/// Batch execute async operations with bounded concurrency.
pub async fn batch<T, F, Fut, R>(items: Vec<T>, concurrency: usize, operation: F) -> Vec<R>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = R> + Send + 'static,
    R: Send + 'static,
{
    stream::iter(items)
        .map(operation)
        .buffer_unordered(concurrency)
        .collect()
        .await
}

/// Knobs for [`fetch_many`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Fetches in flight at once.
    pub concurrency: usize,
    /// Reject batches larger than this.
    pub max_urls: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_urls: MAX_BATCH_URLS,
        }
    }
}

/// Fetch several URLs with bounded concurrency.
///
/// Each URL gets its own full ladder run and its own outcome; one URL
/// failing never aborts the rest. Results come back in input order,
/// paired with the URL they belong to.
///
/// Batches over `options.max_urls` are rejected up front, before any
/// fetching starts.
pub async fn fetch_many(
    urls: Vec<String>,
    options: &BatchOptions,
    config: &FetchConfig,
) -> Result<Vec<(String, Result<FetchResult>)>> {
    if urls.len() > options.max_urls {
        return Err(FetchError::BatchTooLarge {
            given: urls.len(),
            max: options.max_urls,
        });
    }

    let config = config.clone();
    let indexed: Vec<(usize, String)> = urls.into_iter().enumerate().collect();

    let mut outcomes = batch(indexed, options.concurrency.max(1), move |(idx, url)| {
        let config = config.clone();
        async move {
            let outcome = match FetchRequest::new(&url) {
                Ok(request) => fetch::fetch_with(&request, &config).await,
                Err(e) => Err(e),
            };
            (idx, url, outcome)
        }
    })
    .await;

    // buffer_unordered completes out of order; restore input order
    outcomes.sort_by_key(|(idx, _, _)| *idx);
    Ok(outcomes
        .into_iter()
        .map(|(_, url, outcome)| (url, outcome))
        .collect())
}
