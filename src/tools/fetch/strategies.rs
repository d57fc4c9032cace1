use super::client::client_for;
use super::headers::headers_for;
use super::strategy::{Attempt, Strategy};
use super::types::{FailureReason, FetchConfig, StrategyKind};
use super::utils::{is_text_media_type, read_capped};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Plain-transport rung: one GET with a strategy-specific fingerprint.
pub(super) struct HttpStrategy {
    kind: StrategyKind,
    client: Client,
    max_body_bytes: u64,
    lenient_status: bool,
}

impl HttpStrategy {
    pub(super) fn new(kind: StrategyKind, config: &FetchConfig) -> crate::Result<Self> {
        Ok(Self {
            kind,
            client: client_for(kind)?,
            max_body_bytes: config.max_body_bytes,
            // Only the last rung trades status rigor for content
            lenient_status: config.lenient_status && kind == StrategyKind::Minimal,
        })
    }

    fn acceptable(&self, status: reqwest::StatusCode) -> bool {
        status.is_success() || (self.lenient_status && status.is_client_error())
    }
}

#[async_trait]
impl Strategy for HttpStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn insecure_transport(&self) -> bool {
        self.kind == StrategyKind::Insecure
    }

    async fn attempt(&self, url: &Url, budget: Duration) -> Attempt {
        let response = self
            .client
            .get(url.as_str())
            .headers(headers_for(self.kind))
            .timeout(budget)
            .send()
            .await
            .map_err(super::utils::classify)?;

        let status = response.status();
        if !self.acceptable(status) {
            return Err(FailureReason::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if !is_text_media_type(content_type.as_deref()) {
            return Err(FailureReason::NonText(content_type.unwrap_or_default()));
        }

        read_capped(response, self.max_body_bytes).await
    }
}

/// Build the full ladder for a config, cheap to expensive.
pub(super) fn default_ladder(config: &FetchConfig) -> crate::Result<Vec<Box<dyn Strategy>>> {
    let mut ladder: Vec<Box<dyn Strategy>> = vec![
        Box::new(HttpStrategy::new(StrategyKind::Direct, config)?),
        Box::new(HttpStrategy::new(StrategyKind::Mobile, config)?),
    ];

    if config.allow_insecure {
        ladder.push(Box::new(HttpStrategy::new(StrategyKind::Insecure, config)?));
    }

    #[cfg(feature = "browser")]
    if config.render {
        ladder.push(Box::new(super::browser::BrowserStrategy::new(config)));
    }

    ladder.push(Box::new(HttpStrategy::new(StrategyKind::Minimal, config)?));

    Ok(ladder)
}
