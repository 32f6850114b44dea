//! Stream-record normalization from provider format descriptors

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::utils::mime::container_from_mime;

/// Fallback signature parameter name when a cipher blob omits `sp`
pub const DEFAULT_SIGNATURE_PARAM: &str = "sig";

/// One raw format descriptor from a metadata provider response.
///
/// Semi-structured, read-only input. Every field is optional so any provider
/// object deserializes, `{}` included; unknown provider fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFormatDescriptor {
    pub itag: Option<u32>,
    pub url: Option<String>,
    pub signature_cipher: Option<String>,
    pub mime_type: Option<String>,
    pub quality_label: Option<String>,
    pub quality: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

/// One normalized stream record, derived from a single descriptor.
///
/// Built once by [`normalize`] and never mutated afterwards. A record with
/// `is_ciphered` set logically depends on the decipher program for its
/// script version before the URL becomes usable; that join happens in the
/// caller, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itag: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Subtype segment of the MIME type, absent when no MIME type was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub is_ciphered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciphered_signature: Option<String>,
    /// Query parameter the deciphered signature must be attached under
    pub signature_param_name: String,
    /// True only when `url` is usable without further decipherment
    pub is_playable: bool,
}

/// Normalized output for one video: identity plus every stream record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInventory {
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub streams: Vec<StreamRecord>,
}

impl StreamInventory {
    /// Number of stream records
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Records playable without deciphering
    pub fn playable(&self) -> impl Iterator<Item = &StreamRecord> {
        self.streams.iter().filter(|record| record.is_playable)
    }

    /// Records that still need the decipher program applied
    pub fn ciphered(&self) -> impl Iterator<Item = &StreamRecord> {
        self.streams.iter().filter(|record| record.is_ciphered)
    }
}

/// Signature-cipher parameters pulled out of a `signatureCipher` blob
#[derive(Debug, Default)]
struct CipherParams {
    url: Option<String>,
    signature: Option<String>,
    param_name: Option<String>,
}

impl CipherParams {
    /// Parse the URL-encoded blob. Keys can repeat; the first occurrence of
    /// each wins.
    fn parse(blob: &str) -> Self {
        let mut params = CipherParams::default();
        for (key, value) in form_urlencoded::parse(blob.as_bytes()) {
            match key.as_ref() {
                "url" if params.url.is_none() => params.url = Some(value.into_owned()),
                "s" if params.signature.is_none() => params.signature = Some(value.into_owned()),
                "sp" if params.param_name.is_none() => {
                    params.param_name = Some(value.into_owned())
                }
                _ => {}
            }
        }
        params
    }
}

/// Normalize one provider descriptor into a stream record.
///
/// Total: any input shape yields a record, with absent fields left out
/// rather than erroring.
pub fn normalize(descriptor: &RawFormatDescriptor) -> StreamRecord {
    let mut record = StreamRecord {
        itag: descriptor.itag,
        mime_type: descriptor.mime_type.clone(),
        container: descriptor
            .mime_type
            .as_deref()
            .map(|mime| container_from_mime(mime).to_string()),
        quality_label: descriptor
            .quality_label
            .clone()
            .or_else(|| descriptor.quality.clone()),
        video_codec: descriptor.vcodec.clone(),
        audio_codec: descriptor.acodec.clone(),
        url: None,
        is_ciphered: false,
        ciphered_signature: None,
        signature_param_name: DEFAULT_SIGNATURE_PARAM.to_string(),
        is_playable: false,
    };

    if let Some(url) = &descriptor.url {
        record.url = Some(url.clone());
        record.is_playable = true;
    } else if let Some(blob) = &descriptor.signature_cipher {
        let params = CipherParams::parse(blob);
        record.url = params.url;
        record.ciphered_signature = params.signature;
        if let Some(param_name) = params.param_name {
            record.signature_param_name = param_name;
        }
        record.is_ciphered = true;
    }

    record
}
