use super::types::FailureReason;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Media types under `application/` that still carry page source.
const TEXT_APPLICATION_TYPES: [&str; 6] = [
    "application/json",
    "application/xml",
    "application/javascript",
    "application/xhtml+xml",
    "application/rss+xml",
    "application/atom+xml",
];

/// Random-ish jitter in milliseconds within [0, range).
///
/// Uses high-resolution timing to generate pseudo-random jitter for
/// introducing variability in the delay between ladder rungs.
pub(super) fn jitter_ms(range: u64) -> u64 {
    if range == 0 {
        return 0;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_nanos(0));
    let nanos = now.subsec_nanos() as u64;
    let micros = (now.as_micros() & 0xFFFF) as u64;
    (nanos ^ (micros << 5)) % range
}

/// Map a transport error onto the failure taxonomy.
pub(super) fn classify(error: reqwest::Error) -> FailureReason {
    if error.is_timeout() {
        FailureReason::Timeout
    } else if error.is_redirect() {
        FailureReason::RedirectLoop
    } else if let Some(status) = error.status() {
        FailureReason::HttpStatus(status.as_u16())
    } else {
        FailureReason::Refused(error.to_string())
    }
}

/// Whether a Content-Type header names something we can return as source.
///
/// Absent or unparseable headers pass: plenty of plain-text endpoints never
/// set one, and rejecting them would lose real content.
pub(super) fn is_text_media_type(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return true;
    };
    let essence = raw
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() || essence.starts_with("text/") {
        return true;
    }
    TEXT_APPLICATION_TYPES.contains(&essence.as_str())
        || essence.ends_with("+xml")
        || essence.ends_with("+json")
}

/// Read a response body up to `limit` bytes, never buffering past the cap.
///
/// A declared Content-Length over the cap rejects before the first byte is
/// pulled; otherwise the body streams chunk by chunk and aborts the moment
/// the running total would cross the cap.
pub(super) async fn read_capped(
    mut response: reqwest::Response,
    limit: u64,
) -> Result<String, FailureReason> {
    if let Some(declared) = response.content_length() {
        if declared > limit {
            return Err(FailureReason::Oversized { limit });
        }
    }

    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(classify)? {
        if buf.len() as u64 + chunk.len() as u64 > limit {
            return Err(FailureReason::Oversized { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_in_range() {
        for _ in 0..100 {
            assert!(jitter_ms(50) < 50);
        }
    }

    #[test]
    fn jitter_zero_range() {
        assert_eq!(jitter_ms(0), 0);
    }

    #[test]
    fn html_and_json_count_as_text() {
        assert!(is_text_media_type(Some("text/html; charset=utf-8")));
        assert!(is_text_media_type(Some("text/plain")));
        assert!(is_text_media_type(Some("application/json")));
        assert!(is_text_media_type(Some("application/xhtml+xml")));
        assert!(is_text_media_type(Some("application/ld+json")));
    }

    #[test]
    fn binary_types_are_rejected() {
        assert!(!is_text_media_type(Some("application/octet-stream")));
        assert!(!is_text_media_type(Some("image/png")));
        assert!(!is_text_media_type(Some("application/pdf")));
        assert!(!is_text_media_type(Some("video/mp4")));
    }

    #[test]
    fn missing_content_type_passes() {
        assert!(is_text_media_type(None));
        assert!(is_text_media_type(Some("")));
    }
}
