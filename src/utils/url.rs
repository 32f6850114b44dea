//! URL utilities for extracting video IDs from video platform URLs

use crate::error::SiftError;
use url::Url;

/// Extract video ID from various video platform URL formats.
///
/// Accepts bare 11-character IDs as-is, so callers can pass either form.
pub fn extract_video_id(input: &str) -> Result<String, SiftError> {
    if is_bare_video_id(input) {
        return Ok(input.to_string());
    }

    let parsed = Url::parse(input)
        .map_err(|_| SiftError::InvalidInput(format!("Not a video URL or ID: {}", input)))?;

    match parsed.host_str() {
        Some("youtu.be") => {
            let path = parsed.path().trim_start_matches('/');
            if path.is_empty() {
                return Err(SiftError::InvalidInput("Missing video ID".to_string()));
            }
            Ok(path.to_string())
        }
        Some("youtube.com") | Some("www.youtube.com") | Some("m.youtube.com") => {
            if parsed.path().starts_with("/watch") {
                parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.to_string())
                    .ok_or_else(|| SiftError::InvalidInput("Missing v parameter".to_string()))
            } else if parsed.path().starts_with("/shorts/") {
                let video_id = parsed.path().trim_start_matches("/shorts/");
                if video_id.is_empty() {
                    return Err(SiftError::InvalidInput(
                        "Missing video ID in shorts path".to_string(),
                    ));
                }
                Ok(video_id.to_string())
            } else if parsed.path().starts_with("/embed/") {
                let video_id = parsed.path().trim_start_matches("/embed/");
                if video_id.is_empty() {
                    return Err(SiftError::InvalidInput(
                        "Missing video ID in embed path".to_string(),
                    ));
                }
                Ok(video_id.to_string())
            } else {
                Err(SiftError::InvalidInput(
                    "Unsupported video URL format".to_string(),
                ))
            }
        }
        _ => Err(SiftError::InvalidInput(
            "Not a supported video platform URL".to_string(),
        )),
    }
}

/// Check if input looks like a bare video ID rather than a URL
fn is_bare_video_id(input: &str) -> bool {
    input.len() == 11
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
