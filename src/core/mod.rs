//! Core types: the error model and the tool result envelope.

pub mod content;
pub mod error;

pub use error::SpotifyError;
