//! Error types for the CPU health sampler.

use std::io;
use thiserror::Error;

/// Result type alias for sampler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostic error type.
///
/// The snapshot path (`HealthSampler::sample`) never surfaces these; it
/// collapses every failure into zero fields or an all-zero snapshot, which
/// is what the owning monitor expects. `try_sample` exposes them for
/// callers that want to know why a snapshot came back empty.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Device not found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Readiness probe failed or was never run
    #[error("Sampler not ready")]
    NotReady,
}
