use super::types::StrategyKind;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

/// Build the complete header map for a strategy, User-Agent included.
pub(super) fn headers_for(kind: StrategyKind) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (k, v) in header_pairs_for(kind) {
        let name = HeaderName::from_lowercase(k.to_ascii_lowercase().as_bytes())
            .unwrap_or_else(|_| HeaderName::from_static("accept"));
        if let Ok(val) = HeaderValue::from_str(v) {
            headers.insert(name, val);
        }
    }

    let ua = user_agent_for(kind);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(ua).unwrap_or(HeaderValue::from_static("Mozilla/5.0")),
    );

    headers
}

/// User-Agent string for the given strategy.
///
/// Also used by the rendered strategy to keep the browser's reported agent
/// consistent with the plain-transport rungs.
pub(super) fn user_agent_for(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Direct | StrategyKind::Insecure | StrategyKind::Rendered => {
            // Standard desktop browser - Chrome on Windows
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        }
        StrategyKind::Mobile => {
            // Mobile browser - Android Chrome
            "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36"
        }
        StrategyKind::Minimal => {
            // Minimal UA - simple but identifies as a browser
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36"
        }
    }
}

/// Header pairs for the given strategy (without User-Agent).
fn header_pairs_for(kind: StrategyKind) -> Vec<(&'static str, &'static str)> {
    match kind {
        StrategyKind::Direct | StrategyKind::Insecure => {
            // Standard desktop browser headers - Chrome on Windows.
            // Insecure differs only in transport, never in fingerprint.
            vec![
                ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
                ("Accept-Language", "en-US,en;q=0.9"),
                ("Accept-Encoding", "gzip, deflate, br"),
                ("Connection", "keep-alive"),
                ("Upgrade-Insecure-Requests", "1"),
                ("Sec-Fetch-Dest", "document"),
                ("Sec-Fetch-Mode", "navigate"),
                ("Sec-Fetch-Site", "none"),
                ("Sec-Ch-Ua", "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
                ("Sec-Ch-Ua-Mobile", "?0"),
                ("Sec-Ch-Ua-Platform", "\"Windows\""),
            ]
        }
        StrategyKind::Mobile => {
            // Mobile browser headers - Android Chrome
            vec![
                ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
                ("Accept-Language", "en-US,en;q=0.9"),
                ("Accept-Encoding", "gzip, deflate, br"),
                ("Connection", "keep-alive"),
                ("Upgrade-Insecure-Requests", "1"),
                ("Sec-Fetch-Dest", "document"),
                ("Sec-Fetch-Mode", "navigate"),
                ("Sec-Fetch-Site", "none"),
                ("Sec-Fetch-User", "?1"),
                ("Sec-Ch-Ua", "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
                ("Sec-Ch-Ua-Mobile", "?1"),
                ("Sec-Ch-Ua-Platform", "\"Android\""),
            ]
        }
        StrategyKind::Rendered => {
            // The browser sends its own headers; only the UA is steered
            vec![]
        }
        StrategyKind::Minimal => {
            // Bare minimum - just like curl
            vec![("Accept", "*/*"), ("Accept-Encoding", "gzip, deflate")]
        }
    }
}
