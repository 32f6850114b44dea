//! Metadata provider client and response model

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::normalizer::{normalize, RawFormatDescriptor, StreamInventory, StreamRecord};
use crate::error::SiftError;
use crate::platform::client::{FetchClient, HttpClientConfig};

/// Default metadata provider endpoint
pub const DEFAULT_API_BASE: &str = "https://api-teal-omega.vercel.app/get_data";

/// Playability statuses that make an item terminally unprocessable
const DENIAL_STATUSES: [&str; 2] = ["LOGIN_REQUIRED", "UNPLAYABLE"];

/// Playability verdict reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayabilityStatus {
    pub status: Option<String>,
    pub reason: Option<String>,
}

/// Video identity fields from the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: Option<String>,
    pub title: Option<String>,
}

/// Stream listings from the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    pub formats: Option<Vec<RawFormatDescriptor>>,
    pub adaptive_formats: Option<Vec<RawFormatDescriptor>>,
}

/// Provider response document.
///
/// Typed loosely: every branch is optional and unknown fields are ignored,
/// since the provider schema is not under our control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub status: Option<String>,
    pub playability_status: Option<PlayabilityStatus>,
    pub video_details: Option<VideoDetails>,
    pub streaming_data: Option<StreamingData>,
}

impl MetadataResponse {
    /// Provider-reported denial status, if the item cannot be processed
    pub fn denial_status(&self) -> Option<&str> {
        if self.status.as_deref() == Some("error") {
            return Some("error");
        }
        self.playability_status
            .as_ref()
            .and_then(|playability| playability.status.as_deref())
            .filter(|status| DENIAL_STATUSES.contains(status))
    }

    /// Video title when present
    pub fn title(&self) -> Option<&str> {
        self.video_details
            .as_ref()
            .and_then(|details| details.title.as_deref())
    }

    /// All format descriptors: `formats` first, then `adaptiveFormats`,
    /// provider order preserved within each
    pub fn all_formats(&self) -> Vec<&RawFormatDescriptor> {
        let mut formats = Vec::new();
        if let Some(streaming) = &self.streaming_data {
            if let Some(list) = &streaming.formats {
                formats.extend(list.iter());
            }
            if let Some(list) = &streaming.adaptive_formats {
                formats.extend(list.iter());
            }
        }
        formats
    }

    /// Normalize every descriptor into stream records
    pub fn normalized_streams(&self) -> Vec<StreamRecord> {
        self.all_formats().into_iter().map(normalize).collect()
    }
}

/// Client for the metadata provider endpoint
pub struct MetadataClient {
    http: FetchClient,
    base_url: String,
}

impl MetadataClient {
    /// Create a client against the default provider endpoint
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom HTTP configuration
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self {
            http: FetchClient::with_config(config),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the provider base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch and classify the provider document for a video.
    ///
    /// Denial (`LOGIN_REQUIRED`, `UNPLAYABLE` or top-level `status=="error"`)
    /// comes back as `AccessDenied` carrying the raw payload unchanged, so
    /// the caller can surface exactly what the provider said.
    pub async fn fetch_metadata(&self, video_id: &str) -> Result<MetadataResponse, SiftError> {
        let request_url = format!("{}?id={}", self.base_url, video_id);
        info!("Fetching metadata for {}", video_id);

        let payload = self.http.get_json(&request_url).await?;
        let response: MetadataResponse = serde_json::from_value(payload.clone())?;

        if let Some(status) = response.denial_status() {
            warn!("Provider denied access for {}: {}", video_id, status);
            return Err(SiftError::AccessDenied {
                status: status.to_string(),
                payload,
            });
        }

        Ok(response)
    }

    /// Fetch metadata and assemble the normalized stream inventory
    pub async fn fetch_streams(&self, video_id: &str) -> Result<StreamInventory, SiftError> {
        let response = self.fetch_metadata(video_id).await?;
        let streams = response.normalized_streams();
        debug!("Normalized {} stream records for {}", streams.len(), video_id);

        Ok(StreamInventory {
            video_id: video_id.to_string(),
            title: response.title().map(|title| title.to_string()),
            streams,
        })
    }
}

impl Default for MetadataClient {
    fn default() -> Self {
        Self::new()
    }
}
