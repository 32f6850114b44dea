//! Utility functions for streamsift

pub mod mime;
pub mod url;

pub use mime::*;
pub use self::url::*;
