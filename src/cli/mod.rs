//! Command line interface for streamsift

pub mod args;
pub mod output;

pub use args::*;
pub use output::*;
