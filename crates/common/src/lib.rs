//! Utilities shared by the `hdcred` binaries, such as bootstrapping the tracing subscriber.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
