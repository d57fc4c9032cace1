use crate::error::{FetchError, Result};
use crate::limit::RateLimiter;
use crate::tools::batch::{self, BatchOptions};
use crate::tools::fetch::{self, FetchConfig, FetchRequest, FetchResult};
use std::time::Instant;

// Helper functions for logging - ignore errors to not break main operations
fn log_info(host: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = crate::log::ActivityLogger::new() {
        let _ = logger.info(host, event, details);
    }
}

fn log_error(host: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = crate::log::ActivityLogger::new() {
        let _ = logger.error(host, event, details);
    }
}

/* ------------ fetch entrypoints ------------ */

/// Fetch one URL through the strategy ladder.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<FetchResult> {
    let request = FetchRequest::new(url)?;
    fetch_request(&request, config).await
}

/// Fetch with an explicit request (forced strategy, custom budget).
pub async fn fetch_request(request: &FetchRequest, config: &FetchConfig) -> Result<FetchResult> {
    let start_time = Instant::now();
    let host = request.url.host_str().map(|h| h.to_string());

    let result = fetch::fetch_with(request, config).await;
    let duration = start_time.elapsed();

    match &result {
        Ok(outcome) => {
            let details = format!(
                "succeeded in {}ms via {}",
                duration.as_millis(),
                outcome.strategy
            );
            log_info(host.as_deref(), "fetch", Some(&details));
        }
        Err(e) => {
            let details = format!("failed in {}ms: {}", duration.as_millis(), e);
            log_error(host.as_deref(), "fetch", Some(&details));
        }
    }

    result
}

/* ------------ gated + batch entrypoints ------------ */

/// Rate-limited fetch for callers serving untrusted clients.
///
/// The limiter is consulted before any validation or network work. A
/// rejected caller gets [`FetchError::RateLimited`] carrying the time
/// until their window resets.
pub async fn fetch_url_gated(
    limiter: &RateLimiter,
    client_key: &str,
    url: &str,
    config: &FetchConfig,
) -> Result<FetchResult> {
    if let Err(retry_after) = limiter.check(client_key) {
        log_error(None, "fetch_gated", Some("rate limited"));
        return Err(FetchError::RateLimited {
            retry_after_ms: retry_after.as_millis() as u64,
        });
    }
    fetch_url(url, config).await
}

/// Fetch several URLs with bounded concurrency and per-URL outcomes.
pub async fn fetch_batch(
    urls: Vec<String>,
    options: &BatchOptions,
    config: &FetchConfig,
) -> Result<Vec<(String, Result<FetchResult>)>> {
    let start_time = Instant::now();
    let total = urls.len();

    let result = batch::fetch_many(urls, options, config).await;
    let duration = start_time.elapsed();

    match &result {
        Ok(outcomes) => {
            let succeeded = outcomes.iter().filter(|(_, r)| r.is_ok()).count();
            let details = format!(
                "{}/{} succeeded in {}ms",
                succeeded,
                total,
                duration.as_millis()
            );
            log_info(None, "fetch_batch", Some(&details));
        }
        Err(e) => {
            let details = format!("rejected in {}ms: {}", duration.as_millis(), e);
            log_error(None, "fetch_batch", Some(&details));
        }
    }

    result
}
