use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default per-strategy budget in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Response size ceiling in bytes (5 MiB).
pub const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

/// Retrieval strategies in ladder order, cheap to expensive.
///
/// The ladder runs them top to bottom until one returns non-empty content.
/// [`FetchResult::strategy`] records which one eventually worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Plain GET with a desktop Chrome fingerprint.
    Direct,

    /// Same transport, mobile Chrome fingerprint.
    Mobile,

    /// Desktop fingerprint without TLS certificate validation.
    Insecure,

    /// Headless browser render (needs the `browser` feature).
    Rendered,

    /// Bare user agent and no cookies. Last resort.
    Minimal,
}

impl StrategyKind {
    /// Strategy name as used by the CLI and in serialized results.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Mobile => "mobile",
            Self::Insecure => "insecure",
            Self::Rendered => "rendered",
            Self::Minimal => "minimal",
        }
    }

    /// Every kind, in ladder order.
    pub fn all() -> [StrategyKind; 5] {
        [
            Self::Direct,
            Self::Mobile,
            Self::Insecure,
            Self::Rendered,
            Self::Minimal,
        ]
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = FetchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "mobile" => Ok(Self::Mobile),
            "insecure" => Ok(Self::Insecure),
            "rendered" => Ok(Self::Rendered),
            "minimal" => Ok(Self::Minimal),
            other => Err(FetchError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Why a single strategy attempt failed.
///
/// Machine-distinguishable so callers can react per class instead of
/// parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    #[error("timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Refused(String),

    #[error("status {0}")]
    HttpStatus(u16),

    #[error("too many redirects")]
    RedirectLoop,

    #[error("body exceeds {limit} bytes")]
    Oversized { limit: u64 },

    #[error("non-text content type: {0}")]
    NonText(String),

    #[error("empty body")]
    EmptyBody,

    #[error("render engine: {0}")]
    Engine(String),
}

/// One failed rung: which strategy, why, and how long it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{strategy} failed: {reason}")]
pub struct StrategyFailure {
    pub strategy: StrategyKind,
    pub reason: FailureReason,
    pub duration_ms: u64,
}

/// A validated fetch request.
///
/// Construction rejects anything that is not an absolute http/https URL, so
/// strategies never see bad input.
///
/// # Examples
/// ```
/// use srcfetch::tools::fetch::{FetchRequest, StrategyKind};
/// use std::time::Duration;
///
/// let request = FetchRequest::new("https://example.com")?
///     .with_timeout(Duration::from_secs(5))
///     .with_strategy(StrategyKind::Minimal);
/// assert_eq!(request.url.host_str(), Some("example.com"));
/// # Ok::<(), srcfetch::FetchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    /// Per-strategy budget.
    pub timeout: Duration,
    /// When set, run only this strategy and return its outcome verbatim.
    pub strategy: Option<StrategyKind>,
}

impl FetchRequest {
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(FetchError::UnsupportedScheme(other.to_string())),
        }
        Ok(Self {
            url: parsed,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            strategy: None,
        })
    }

    /// Override the per-strategy budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run a single strategy instead of the ladder.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

/// Result of a successful fetch, with the telemetry the presentation layer
/// needs: winning strategy, timing, sizes, and every failure that came
/// before the win.
///
/// # Examples
/// ```no_run
/// use srcfetch::tools::fetch::fetch;
///
/// # async fn example() -> srcfetch::Result<()> {
/// let result = fetch("https://example.com").await?;
/// println!(
///     "{} bytes ({} lines) via {} in {}ms after {} attempts",
///     result.bytes, result.lines, result.strategy, result.duration_ms, result.attempts,
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// The fetched page source.
    pub content: String,
    /// The strategy that produced the content.
    pub strategy: StrategyKind,
    /// Total wall-clock duration in milliseconds, failed rungs included.
    pub duration_ms: u64,
    /// Number of strategies run, the winner included.
    pub attempts: usize,
    /// Content size in bytes.
    pub bytes: u64,
    /// Content line count.
    pub lines: u64,
    /// True when the winning strategy skipped TLS certificate validation.
    pub insecure_transport: bool,
    /// Failures recorded before the winning attempt, in ladder order.
    pub failures: Vec<StrategyFailure>,
}

impl FetchResult {
    /// Consume the result and return just the source.
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Ladder construction knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Reject bodies larger than this many bytes.
    pub max_body_bytes: u64,
    /// Include the certificate-skipping rung.
    pub allow_insecure: bool,
    /// Include the headless-browser rung (needs the `browser` feature).
    pub render: bool,
    /// Extra settle delay after navigation, in milliseconds.
    pub render_settle_ms: u64,
    /// Let the minimal rung accept 4xx bodies as content, so the source of
    /// error pages is still retrievable as a last resort.
    pub lenient_status: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: MAX_BODY_BYTES,
            allow_insecure: false,
            render: true,
            render_settle_ms: 500,
            lenient_status: true,
        }
    }
}
