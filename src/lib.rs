//! # streamsift - Stream Metadata Sifter
//!
//! Recovers the signature decipher routine from minified player scripts and
//! normalizes provider stream metadata into uniform records.
//!
//! ## Features
//!
//! - Decipher routine recognition across known player layouts
//! - Transform table recovery with the full function map declaration
//! - Stream descriptor normalization with cipher and playability flags
//! - Metadata endpoint client with retries and access denial detection
//! - Cached player script acquisition from URLs or local files
//!
//! ## Example
//!
//! ```rust
//! use streamsift::{extract, normalize, RawFormatDescriptor};
//!
//! let script = r#"var Nv={kT:function(a){a.reverse()}};
//! Mta.sig||Mta.sig=function(a){a=a.split("");Nv.kT(a,0);return a.join("")};"#;
//! let program = extract(script).unwrap();
//! assert_eq!(program.transform_table_name, "Nv");
//!
//! let descriptor = RawFormatDescriptor {
//!     itag: Some(18),
//!     url: Some("https://cdn.example.com/stream".to_string()),
//!     mime_type: Some("video/mp4; codecs=\"avc1\"".to_string()),
//!     ..Default::default()
//! };
//! let record = normalize(&descriptor);
//! assert!(record.is_playable);
//! assert_eq!(record.container.as_deref(), Some("mp4"));
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{
    extract, normalize, DecipherProgram, RawFormatDescriptor, StreamInventory, StreamRecord,
};
pub use crate::error::SiftError;
pub use crate::platform::{FetchClient, MetadataClient, ScriptFetcher};

/// Result type alias for streamsift operations
pub type Result<T> = std::result::Result<T, SiftError>;
