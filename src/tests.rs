//! Tests

#[cfg(test)]
mod tests {
    use crate::api;
    use crate::error::FetchError;
    use crate::limit::RateLimiter;
    use crate::tools::fetch::{
        FailureReason, FetchConfig, FetchResult, StrategyFailure, StrategyKind,
    };
    use std::time::Duration;

    #[tokio::test]
    async fn gated_fetch_rejects_over_limit_callers() {
        let limiter = RateLimiter::new(0, Duration::from_secs(60));

        let err = api::fetch_url_gated(
            &limiter,
            "10.0.0.1",
            "https://example.com",
            &FetchConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn gated_fetch_validates_before_fetching() {
        let limiter = RateLimiter::default();

        let err = api::fetch_url_gated(&limiter, "10.0.0.1", "not a url", &FetchConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn error_messages_are_reportable() {
        let failure = StrategyFailure {
            strategy: StrategyKind::Direct,
            reason: FailureReason::HttpStatus(403),
            duration_ms: 120,
        };
        assert_eq!(failure.to_string(), "direct failed: status 403");

        let exhausted = FetchError::Exhausted {
            failures: vec![failure],
        };
        assert_eq!(
            exhausted.to_string(),
            "no retrieval strategy succeeded (1 tried)"
        );
    }

    #[test]
    fn results_serialize_with_provenance() {
        let result = FetchResult {
            content: "<html></html>".to_string(),
            strategy: StrategyKind::Insecure,
            duration_ms: 42,
            attempts: 3,
            bytes: 13,
            lines: 1,
            insecure_transport: true,
            failures: vec![],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy"], "insecure");
        assert_eq!(json["insecure_transport"], true);
        assert_eq!(json["attempts"], 3);
    }

    #[test]
    fn failure_reasons_serialize_by_kind() {
        let json = serde_json::to_value(FailureReason::Timeout).unwrap();
        assert_eq!(json, serde_json::json!("timeout"));

        let json = serde_json::to_value(FailureReason::HttpStatus(502)).unwrap();
        assert_eq!(json, serde_json::json!({ "http_status": 502 }));

        let json = serde_json::to_value(FailureReason::Oversized { limit: 64 }).unwrap();
        assert_eq!(json, serde_json::json!({ "oversized": { "limit": 64 } }));
    }
}
