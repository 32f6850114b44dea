//! Core functionality for streamsift: pure extraction and normalization

pub mod extractor;
pub mod normalizer;

pub use extractor::*;
pub use normalizer::*;
