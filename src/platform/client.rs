//! HTTP client shared by the metadata and player-script fetch paths

use crate::error::SiftError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default user agent sent with every request
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// First retry delay; doubles per attempt
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);
/// Backoff ceiling
const MAX_BACKOFF: Duration = Duration::from_secs(30);
/// Jitter factor applied to each delay so concurrent retries spread out
const JITTER_FACTOR: f64 = 0.1;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Total attempts per request
    pub max_retries: u32,
    /// User agent string
    pub user_agent: Option<String>,
    /// Proxy URL
    pub proxy_url: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            user_agent: None,
            proxy_url: None,
        }
    }
}

/// GET client with retry, backoff and jitter
pub struct FetchClient {
    client: Client,
    config: HttpClientConfig,
}

impl FetchClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Self {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        } else {
            builder = builder.user_agent(DEFAULT_USER_AGENT);
        }

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET a URL and return the response body as text
    pub async fn get_text(&self, url: &str) -> Result<String, SiftError> {
        let response = self.get_with_retry(url).await?;
        Ok(response.text().await?)
    }

    /// GET a URL and return the response body as JSON
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, SiftError> {
        let response = self.get_with_retry(url).await?;
        Ok(response.json().await?)
    }

    /// Issue the request, retrying transient failures with backoff.
    ///
    /// Non-retryable statuses (4xx other than 429) fail on the first attempt.
    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, SiftError> {
        let mut last_error: Option<SiftError> = None;
        let mut delay = INITIAL_BACKOFF;

        for attempt in 0..self.config.max_retries {
            debug!(
                "GET {} attempt {}/{}",
                url,
                attempt + 1,
                self.config.max_retries
            );

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    let fetch_error = SiftError::HttpStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };
                    if !fetch_error.is_retryable() {
                        return Err(fetch_error);
                    }
                    warn!("GET {} returned status {}", url, status);
                    last_error = Some(fetch_error);
                }
                Err(e) => {
                    warn!("GET {} failed: {}", url, e);
                    last_error = Some(SiftError::FetchFailed(e));
                }
            }

            if attempt + 1 < self.config.max_retries {
                let jittered = with_jitter(delay);
                debug!("Retrying in {:?}", jittered);
                tokio::time::sleep(jittered).await;
                delay = (delay * 2).min(MAX_BACKOFF);
            }
        }

        error!("All {} attempts for {} failed", self.config.max_retries, url);
        Err(last_error.unwrap_or_else(|| SiftError::Generic("request failed".to_string())))
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Add random jitter on top of a backoff delay
fn with_jitter(delay: Duration) -> Duration {
    let range = delay.as_millis() as f64 * JITTER_FACTOR;
    let offset = (rand::random::<f64>() - 0.5) * 2.0 * range;
    delay + Duration::from_millis(offset.abs() as u64)
}
