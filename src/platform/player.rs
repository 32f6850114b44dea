//! Player script acquisition: HTTP fetch with caching, or local files

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, info};

use crate::error::SiftError;
use crate::platform::client::{FetchClient, HttpClientConfig};

/// Script cache time-to-live; player versions rotate slowly
const SCRIPT_CACHE_TTL: Duration = Duration::from_secs(600);
/// Script cache capacity, one entry per script URL
const SCRIPT_CACHE_CAPACITY: u64 = 10;

/// Fetches player scripts over HTTP, caching bodies per URL
pub struct ScriptFetcher {
    http: FetchClient,
    cache: Cache<String, String>,
}

impl ScriptFetcher {
    /// Create a fetcher with default HTTP configuration
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a fetcher with custom HTTP configuration
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self {
            http: FetchClient::with_config(config),
            cache: Cache::builder()
                .time_to_live(SCRIPT_CACHE_TTL)
                .max_capacity(SCRIPT_CACHE_CAPACITY)
                .build(),
        }
    }

    /// Fetch the script at `url`, serving repeats from cache
    pub async fn fetch(&self, url: &str) -> Result<String, SiftError> {
        if let Some(cached) = self.cache.get(url).await {
            debug!("Player script cache hit: {}", url);
            return Ok(cached);
        }

        info!("Fetching player script: {}", url);
        let body = self.http.get_text(url).await?;
        self.cache.insert(url.to_string(), body.clone()).await;
        Ok(body)
    }
}

impl Default for ScriptFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A source of player script text
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Where the script comes from, for logs and reports
    fn location(&self) -> String;

    /// Produce the script text
    async fn script_text(&self) -> Result<String, SiftError>;
}

/// Script fetched from a URL
pub struct RemoteScript {
    fetcher: ScriptFetcher,
    url: String,
}

impl RemoteScript {
    pub fn new(fetcher: ScriptFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ScriptSource for RemoteScript {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn script_text(&self) -> Result<String, SiftError> {
        self.fetcher.fetch(&self.url).await
    }
}

/// Script read from a local file
pub struct LocalScript {
    path: PathBuf,
}

impl LocalScript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScriptSource for LocalScript {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn script_text(&self) -> Result<String, SiftError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// Pick a script source for a URL or filesystem path
pub fn source_for(location: &str, config: HttpClientConfig) -> Box<dyn ScriptSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(RemoteScript::new(ScriptFetcher::with_config(config), location))
    } else {
        Box::new(LocalScript::new(location))
    }
}
