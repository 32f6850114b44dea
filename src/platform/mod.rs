//! Provider-facing clients: metadata endpoint and player script sources

pub mod client;
pub mod metadata;
pub mod player;

pub use client::*;
pub use metadata::*;
pub use player::*;
