mod client;
mod headers;
mod orchestrator;
mod strategies;
mod utils;

#[cfg(feature = "browser")]
mod browser;

pub mod strategy;
pub mod types;


pub use orchestrator::Orchestrator;
pub use strategy::{Attempt, Strategy};
pub use types::*;

/// Fetch page source from a URL through the strategy ladder.
///
/// Tries strategies in order until one returns non-empty content:
/// direct → mobile → minimal, with insecure and rendered rungs when the
/// config enables them.
///
/// Returns `FetchResult` with the source and telemetry (winning strategy,
/// duration, attempt count, prior failures).
///
/// This is the most reliable option but the slow path can take several
/// seconds. Use `fetch_with()` to force one strategy or tune budgets.
///
/// # Examples
/// ```no_run
/// use srcfetch::tools::fetch::fetch;
///
/// # async fn example() -> srcfetch::Result<()> {
/// // Get result with telemetry
/// let result = fetch("https://example.com").await?;
/// println!("Used {} in {}ms", result.strategy, result.duration_ms);
/// let source = result.content;
/// # Ok(())
/// # }
/// ```
pub async fn fetch(url: &str) -> crate::Result<FetchResult> {
    fetch_with(&FetchRequest::new(url)?, &FetchConfig::default()).await
}

/// Fetch with an explicit request and ladder config.
///
/// The request can force a single strategy instead of the ladder:
/// - `StrategyKind::Direct`: desktop Chrome fingerprint, the usual first try
/// - `StrategyKind::Mobile`: same transport, mobile fingerprint
/// - `StrategyKind::Insecure`: certificate errors pass (needs `allow_insecure`)
/// - `StrategyKind::Rendered`: headless Chrome render (needs the `browser` feature, ~2-10s)
/// - `StrategyKind::Minimal`: bare curl-like request, no cookies
///
/// Forced mode returns that one strategy's outcome verbatim, so an empty
/// body or a failure is reported as-is instead of falling through.
///
/// # Examples
/// ```no_run
/// use srcfetch::tools::fetch::{fetch_with, FetchConfig, FetchRequest, StrategyKind};
/// use std::time::Duration;
///
/// # async fn example() -> srcfetch::Result<()> {
/// // Fast: single bare attempt with a short budget
/// let request = FetchRequest::new("https://example.com")?
///     .with_timeout(Duration::from_secs(5))
///     .with_strategy(StrategyKind::Minimal);
/// let result = fetch_with(&request, &FetchConfig::default()).await?;
/// println!("{} took {}ms", result.strategy, result.duration_ms);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_with(
    request: &FetchRequest,
    config: &FetchConfig,
) -> crate::Result<FetchResult> {
    Orchestrator::new(config)?.fetch(request).await
}

/// Fetch page source from a URL (convenience function that returns only the source).
///
/// This is a wrapper around `fetch()` that discards telemetry.
///
/// # Examples
/// ```no_run
/// use srcfetch::tools::fetch::fetch_source;
///
/// # async fn example() -> srcfetch::Result<()> {
/// let source = fetch_source("https://example.com").await?;
/// # Ok(())
/// # }
/// ```
pub async fn fetch_source(url: &str) -> crate::Result<String> {
    fetch(url).await.map(FetchResult::into_content)
}
