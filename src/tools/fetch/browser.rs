use super::headers::user_agent_for;
use super::strategy::{Attempt, Strategy};
use super::types::{FailureReason, FetchConfig, StrategyKind};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use std::time::Duration;
use url::Url;

/// Upper bound on waiting for the browser process to exit after close.
const TEARDOWN_WAIT: Duration = Duration::from_secs(2);

/// Rendered rung: a fresh headless Chrome per attempt.
///
/// The browser is launched, navigated, and torn down inside the attempt, so
/// a failed or timed-out render never leaks a child process.
pub(super) struct BrowserStrategy {
    settle: Duration,
}

impl BrowserStrategy {
    pub(super) fn new(config: &FetchConfig) -> Self {
        Self {
            settle: Duration::from_millis(config.render_settle_ms),
        }
    }
}

#[async_trait]
impl Strategy for BrowserStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Rendered
    }

    async fn attempt(&self, url: &Url, budget: Duration) -> Attempt {
        let ua_arg = format!("--user-agent={}", user_agent_for(StrategyKind::Rendered));
        let config = BrowserConfig::builder()
            .args([
                "--disable-blink-features=AutomationControlled",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--disable-extensions",
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--no-first-run",
                "--window-size=1920,1080",
                ua_arg.as_str(),
            ])
            .build()
            .map_err(FailureReason::Engine)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FailureReason::Engine(e.to_string()))?;

        // The handler must be polled for the whole browser lifetime
        let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let settle = self.settle;
        let work = async {
            let page = browser.new_page(url.as_str()).await?;
            page.wait_for_navigation().await?;
            tokio::time::sleep(settle).await;
            page.content().await
        };
        let outcome = tokio::time::timeout(budget, work).await;

        // Teardown runs on every path before the outcome is reported
        browser.close().await.ok();
        let _ = tokio::time::timeout(TEARDOWN_WAIT, browser.wait()).await;
        driver.abort();

        match outcome {
            Err(_) => Err(FailureReason::Timeout),
            Ok(Err(e)) => Err(FailureReason::Engine(e.to_string())),
            Ok(Ok(content)) => Ok(content),
        }
    }
}
