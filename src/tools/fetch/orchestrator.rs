use super::strategies::default_ladder;
use super::strategy::{Attempt, Strategy};
use super::types::{
    FailureReason, FetchConfig, FetchRequest, FetchResult, StrategyFailure, StrategyKind,
};
use super::utils::jitter_ms;
use crate::error::{FetchError, Result};
use std::time::{Duration, Instant};

/// Grace on top of the per-strategy budget before the runaway guard fires.
/// Strategies get this long to time out on their own and clean up.
const ATTEMPT_GRACE_MS: u64 = 3_000;

const STEP_DELAY_MS: u64 = 50;

/// Runs strategies in ladder order until one yields non-empty content.
pub struct Orchestrator {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Orchestrator {
    /// Build the default ladder for a config.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            strategies: default_ladder(config)?,
        })
    }

    /// Use a caller-provided ladder instead of the default.
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy kinds in the order they would run.
    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Run the ladder for a request, or a single strategy when one is forced.
    ///
    /// Ladder mode stops at the first non-empty success and reports every
    /// earlier failure alongside it. When no rung succeeds the error carries
    /// the full failure list, in ladder order. Forced mode returns the one
    /// strategy's outcome verbatim, empty content included.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult> {
        if let Some(kind) = request.strategy {
            return self.fetch_forced(request, kind).await;
        }

        let start = Instant::now();
        let mut failures: Vec<StrategyFailure> = Vec::new();

        for (idx, strategy) in self.strategies.iter().enumerate() {
            let attempt_start = Instant::now();
            match run_guarded(strategy.as_ref(), request).await {
                Ok(content) if content.is_empty() => {
                    failures.push(StrategyFailure {
                        strategy: strategy.kind(),
                        reason: FailureReason::EmptyBody,
                        duration_ms: attempt_start.elapsed().as_millis() as u64,
                    });
                }
                Ok(content) => {
                    return Ok(build_result(
                        content,
                        strategy.as_ref(),
                        idx + 1,
                        failures,
                        start,
                    ));
                }
                Err(reason) => {
                    failures.push(StrategyFailure {
                        strategy: strategy.kind(),
                        reason,
                        duration_ms: attempt_start.elapsed().as_millis() as u64,
                    });
                }
            }

            // Brief delay between rungs (50-100ms)
            if idx < self.strategies.len() - 1 {
                tokio::time::sleep(Duration::from_millis(STEP_DELAY_MS + jitter_ms(STEP_DELAY_MS)))
                    .await;
            }
        }

        Err(FetchError::Exhausted { failures })
    }

    async fn fetch_forced(&self, request: &FetchRequest, kind: StrategyKind) -> Result<FetchResult> {
        let strategy = self
            .strategies
            .iter()
            .find(|s| s.kind() == kind)
            .ok_or_else(|| FetchError::StrategyUnavailable(kind.to_string()))?;

        let start = Instant::now();
        match run_guarded(strategy.as_ref(), request).await {
            Ok(content) => Ok(build_result(content, strategy.as_ref(), 1, Vec::new(), start)),
            Err(reason) => Err(FetchError::Strategy(StrategyFailure {
                strategy: kind,
                reason,
                duration_ms: start.elapsed().as_millis() as u64,
            })),
        }
    }
}

/// Run one attempt under a hard deadline so a stuck strategy cannot hold
/// the ladder hostage.
async fn run_guarded(strategy: &dyn Strategy, request: &FetchRequest) -> Attempt {
    let guard = request.timeout + Duration::from_millis(ATTEMPT_GRACE_MS);
    match tokio::time::timeout(guard, strategy.attempt(&request.url, request.timeout)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(FailureReason::Timeout),
    }
}

fn build_result(
    content: String,
    strategy: &dyn Strategy,
    attempts: usize,
    failures: Vec<StrategyFailure>,
    start: Instant,
) -> FetchResult {
    let bytes = content.len() as u64;
    let lines = content.lines().count() as u64;
    FetchResult {
        strategy: strategy.kind(),
        insecure_transport: strategy.insecure_transport(),
        duration_ms: start.elapsed().as_millis() as u64,
        attempts,
        bytes,
        lines,
        failures,
        content,
    }
}
