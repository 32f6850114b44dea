//! Error types for streamsift

use thiserror::Error;

/// Main error type for streamsift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Decipher pattern not found: {0}")]
    PatternNotFound(String),

    #[error("Transform table not found: {0}")]
    TableNotFound(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Access denied by provider: {status}")]
    AccessDenied {
        status: String,
        payload: serde_json::Value,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl SiftError {
    /// Check if error is a transient transport failure worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            SiftError::FetchFailed(_) => true,
            SiftError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if error means the recognized pattern set is stale.
    ///
    /// These recur on every call for a given script version; the fix is
    /// updating the strategies, not retrying.
    pub fn needs_pattern_update(&self) -> bool {
        matches!(
            self,
            SiftError::PatternNotFound(_) | SiftError::TableNotFound(_)
        )
    }

    /// Check if error is a provider-reported denial for the item
    pub fn is_access_denied(&self) -> bool {
        matches!(self, SiftError::AccessDenied { .. })
    }
}
