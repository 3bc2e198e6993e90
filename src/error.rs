//! Error types for configuration validation and audio capture.

use thiserror::Error;

/// Invalid construction parameters. Raised before any simulation state exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must be non-zero")]
    ZeroCount { name: &'static str },

    #[error("{name} must be at most {max}, got {value}")]
    TooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("{name} must lie in {expected}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("{name} range is empty or inverted: {min}..{max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    #[error("spawn volume extends to {extent} on {axis} axis, beyond bounds {bounds}")]
    SpawnOutsideBounds {
        axis: &'static str,
        extent: f32,
        bounds: f32,
    },
}

/// Audio capture failures. Recoverable: the extractor keeps its last energies.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio input device available")]
    NoInputDevice,

    #[error("failed to query input config: {0}")]
    Config(String),

    #[error("failed to build input stream: {0}")]
    BuildStream(String),

    #[error("failed to start input stream: {0}")]
    PlayStream(String),

    #[error("failed to read audio file: {0}")]
    File(#[from] hound::Error),

    #[error("audio file contains no samples")]
    EmptyFile,
}

/// Check that a value is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(())
}

/// Check that `min..max` is a finite, non-inverted range.
pub(crate) fn require_range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}
