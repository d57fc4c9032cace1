use super::types::StrategyKind;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use reqwest::{redirect, Client};
use std::time::Duration;

const CLIENT_TIMEOUT_MS: u64 = 30_000;
const REDIRECT_LIMIT: usize = 10;
const POOL_IDLE_TIMEOUT_SEC: u64 = 90;
const POOL_MAX_IDLE_PER_HOST: usize = 32;

/// One client per strategy kind, shared between fetches so connection pools
/// and cookies survive across calls.
static CLIENT_CACHE: Lazy<DashMap<StrategyKind, Client>> = Lazy::new(DashMap::new);

pub(super) fn client_for(kind: StrategyKind) -> crate::Result<Client> {
    if let Some(client) = CLIENT_CACHE.get(&kind) {
        return Ok(client.clone());
    }
    let client = build_client(kind)?;
    CLIENT_CACHE.insert(kind, client.clone());
    Ok(client)
}

/// Build a reqwest client tuned for the given strategy.
fn build_client(kind: StrategyKind) -> crate::Result<Client> {
    let builder = Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(Duration::from_millis(CLIENT_TIMEOUT_MS))
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SEC))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST);

    let builder = match kind {
        // Minimal: no cookies, fewer redirects
        StrategyKind::Minimal => builder
            .cookie_store(false)
            .redirect(redirect::Policy::limited(5)),
        // Insecure: same fingerprint as direct, but certificate errors pass
        StrategyKind::Insecure => builder.danger_accept_invalid_certs(true),
        _ => builder,
    };

    Ok(builder.build()?)
}
