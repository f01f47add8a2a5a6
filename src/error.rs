//! Crate-wide error type

use thiserror::Error;

/// Errors surfaced by the probe library
///
/// The detection routines are pure functions: every failure they report
/// is a caller precondition violation and is returned synchronously,
/// never retried or degraded into a partial result.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Input frames to the motion mask do not share dimensions
    #[error("frame dimensions disagree: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Difference threshold outside the representable intensity range
    #[error("threshold {0} outside the valid range 0-255")]
    InvalidThreshold(u32),

    /// Template is larger than the frame being searched
    #[error("template {template:?} exceeds frame {frame:?}")]
    TemplateExceedsFrame {
        template: (u32, u32),
        frame: (u32, u32),
    },

    /// Frame source is exhausted or the device disconnected
    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),

    /// Configuration file could not be parsed
    #[error("config error: {0}")]
    Config(String),

    /// Image decode/encode failure at a file boundary
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
