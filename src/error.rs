use crate::tools::fetch::StrategyFailure;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported scheme '{0}': only http and https are fetchable")]
    UnsupportedScheme(String),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("strategy '{0}' is not in the configured ladder")]
    StrategyUnavailable(String),

    /// Forced-strategy mode: the one requested strategy failed.
    #[error("{0}")]
    Strategy(StrategyFailure),

    /// Ladder mode: every strategy failed, in order.
    #[error("no retrieval strategy succeeded ({} tried)", .failures.len())]
    Exhausted { failures: Vec<StrategyFailure> },

    #[error("rate limited: retry in {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("batch of {given} urls exceeds the limit of {max}")]
    BatchTooLarge { given: usize, max: usize },

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
