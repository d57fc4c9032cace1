#[cfg(test)]
mod tests {
    use crate::error::FetchError;
    use crate::tools::batch::{batch, fetch_many, BatchOptions};
    use crate::tools::fetch::FetchConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_batch_basic() {
        let items = vec![1, 2, 3, 4, 5];

        let results = batch(items, 2, |n| async move { n * 2 }).await;

        assert_eq!(results.len(), 5);
        // Results may be in any order due to buffer_unordered
        let mut sorted = results.clone();
        sorted.sort();
        assert_eq!(sorted, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let items: Vec<i32> = vec![];
        let results = batch(items, 5, |n| async move { n }).await;
        assert_eq!(results.len(), 0);
    }

    #[tokio::test]
    async fn test_batch_concurrency_limit() {
        use std::sync::Arc;
        use tokio::sync::Mutex;

        let max_concurrent = Arc::new(Mutex::new(0));
        let current = Arc::new(Mutex::new(0));

        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let max_concurrent_handle = Arc::clone(&max_concurrent);
        let current_handle = Arc::clone(&current);

        let results = batch(items, 3, move |_n| {
            let max_concurrent = Arc::clone(&max_concurrent_handle);
            let current = Arc::clone(&current_handle);

            async move {
                // Increment current
                {
                    let mut curr = current.lock().await;
                    *curr += 1;
                    let mut max = max_concurrent.lock().await;
                    *max = (*max).max(*curr);
                }

                // Simulate work
                tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

                // Decrement current
                {
                    let mut curr = current.lock().await;
                    *curr -= 1;
                }

                42
            }
        })
        .await;

        assert_eq!(results.len(), 10);

        let max = max_concurrent.lock().await;
        // Should respect concurrency limit (allow 3-4 due to buffer_unordered behavior)
        assert!(*max <= 4, "Max concurrent was {}, expected <= 4", *max);
    }

    // Local HTTP server that answers a fixed number of connections.
    async fn serve_repeat(response: String, times: usize) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for _ in 0..times {
                if let Ok((mut socket, _)) = listener.accept().await {
                    let response = response.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 2048];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
            }
        });
        format!("http://{}", addr)
    }

    fn http_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn no_render() -> FetchConfig {
        FetchConfig {
            render: false,
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_many_rejects_oversized_batches() {
        let urls: Vec<String> = (0..6).map(|i| format!("https://example.com/{i}")).collect();

        let err = fetch_many(urls, &BatchOptions::default(), &no_render())
            .await
            .unwrap_err();

        match err {
            FetchError::BatchTooLarge { given, max } => {
                assert_eq!(given, 6);
                assert_eq!(max, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_many_reports_invalid_urls_in_slot() {
        let results = fetch_many(
            vec!["not a url".to_string()],
            &BatchOptions::default(),
            &no_render(),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "not a url");
        assert!(matches!(results[0].1, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn fetch_many_keeps_input_order_and_isolates_failures() {
        let body = "<html><body>batch page</body></html>";
        let good = serve_repeat(http_response(body), 2).await;

        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let urls = vec![good.clone(), dead.clone(), good.clone()];
        let results = fetch_many(urls, &BatchOptions::default(), &no_render())
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, good);
        assert_eq!(results[1].0, dead);
        assert_eq!(results[2].0, good);

        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_ok());
        if let Ok(result) = &results[0].1 {
            assert_eq!(result.content, body);
        }
    }
}
