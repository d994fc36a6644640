//! Terminator error types.

use aether_astro::{InvalidInstantError, UtcInstant};

/// Errors that can occur when building or publishing a terminator polygon.
#[derive(Debug, thiserror::Error)]
pub enum TerminatorError {
    /// Resolution is the number of samples per degree and must be positive.
    #[error("resolution must be at least 1 sample per degree, got {0}")]
    InvalidResolution(u32),

    /// Every latitude sample was NaN or infinite.
    #[error("no finite terminator latitude at {instant}")]
    Degenerate { instant: UtcInstant },

    /// The requested instant could not be constructed.
    #[error(transparent)]
    Instant(#[from] InvalidInstantError),

    /// GeoJSON encoding failed.
    #[error("failed to serialize GeoJSON: {0}")]
    Serialize(#[from] serde_json::Error),
}
