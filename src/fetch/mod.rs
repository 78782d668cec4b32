//! Feed download with retry.

mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;
pub use auth::{ApiKey, DEFAULT_HEADER};

use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// How often and how patiently [`fetch_with_retry`] tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Downloads `url`, retrying gateway-side failures and transport errors.
///
/// 500/502/503/504 responses and connection errors are retried after
/// `policy.delay`; any other non-success status fails immediately.
#[tracing::instrument(skip(client, url, policy), fields(url = %url))]
pub async fn fetch_with_retry<C: HttpClient>(
    client: &C,
    url: &str,
    policy: &RetryPolicy,
) -> Result<Vec<u8>> {
    let url: reqwest::Url = url.parse()?;
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

        match client.execute(req).await {
            Ok(resp) if resp.status() == StatusCode::OK => {
                let bytes = resp.bytes().await?;
                debug!(attempt, bytes = bytes.len(), "Feed downloaded");
                return Ok(bytes.to_vec());
            }
            Ok(resp) if is_retryable(resp.status()) => {
                warn!(attempt, status = %resp.status(), "Server error, retrying");
            }
            Ok(resp) => {
                bail!("feed request returned HTTP {}", resp.status());
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, error = %e, "Network error, retrying");
            }
            Err(e) => {
                return Err(anyhow!(e).context(format!("feed request failed after {attempt} attempts")));
            }
        }

        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    bail!("feed request still failing after {attempts} attempts")
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers each request with the next scripted status.
    struct Scripted {
        statuses: Mutex<VecDeque<u16>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(statuses: &[u16]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl HttpClient for Scripted {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            *self.calls.lock().unwrap() += 1;
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
            Ok(http::Response::builder()
                .status(status)
                .body(b"feed".to_vec())
                .unwrap()
                .into())
        }
    }

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let client = Scripted::new(&[200]);
        let bytes = fetch_with_retry(&client, "http://localhost/feed", &no_wait(3))
            .await
            .unwrap();
        assert_eq!(bytes, b"feed");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let client = Scripted::new(&[503, 502, 200]);
        let bytes = fetch_with_retry(&client, "http://localhost/feed", &no_wait(3))
            .await
            .unwrap();
        assert_eq!(bytes, b"feed");
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let client = Scripted::new(&[500, 504, 503, 200]);
        let result = fetch_with_retry(&client, "http://localhost/feed", &no_wait(3)).await;
        assert!(result.is_err());
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let client = Scripted::new(&[404, 200]);
        let result = fetch_with_retry(&client, "http://localhost/feed", &no_wait(3)).await;
        assert!(result.unwrap_err().to_string().contains("404"));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = Scripted::new(&[]);
        assert!(fetch_with_retry(&client, "not a url", &no_wait(1)).await.is_err());
        assert_eq!(client.calls(), 0);
    }
}
