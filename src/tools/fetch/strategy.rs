use crate::tools::fetch::types::{FailureReason, StrategyKind};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Outcome of a single attempt: the page source, or why it could not be had.
pub type Attempt = std::result::Result<String, FailureReason>;

/// One rung of the retrieval ladder.
///
/// Implementations are expected to stay within `budget` and to release any
/// resources they hold (connections, child processes) before returning.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// True when the transport skips TLS certificate validation.
    fn insecure_transport(&self) -> bool {
        false
    }

    async fn attempt(&self, url: &Url, budget: Duration) -> Attempt;
}
