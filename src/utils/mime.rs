//! MIME type utilities for stream records

/// Derive the container name from a MIME type.
///
/// Takes the portion before any `;` parameter suffix, then the subtype after
/// the final `/`. A base type with no slash comes back whole.
pub fn container_from_mime(mime_type: &str) -> &str {
    let base = mime_type.split(';').next().unwrap_or(mime_type);
    base.rsplit('/').next().unwrap_or(base)
}

/// Check if MIME type is a video format
pub fn is_video_mime(mime_type: &str) -> bool {
    mime_type.starts_with("video/")
}

/// Check if MIME type is an audio format
pub fn is_audio_mime(mime_type: &str) -> bool {
    mime_type.starts_with("audio/")
}
