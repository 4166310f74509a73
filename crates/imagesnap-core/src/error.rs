//! Error types for the crop-box engine.
//!
//! Geometry operations never fail: an invalid drag degrades to a no-op that
//! keeps the last valid frame. Errors only surface at the crate boundary, when
//! configuration, preset records or raster inputs are validated.

use thiserror::Error;

/// Errors reported when validating inputs to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapError {
    /// A configuration constant is negative, non-finite, or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A fixed aspect ratio must be finite and positive.
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    /// The configuration forces this ratio; the user cannot change it.
    #[error("Aspect ratio is forced to {0}")]
    ForcedAspectRatio(f64),

    /// The source image has a zero or negative dimension.
    #[error("Image has no area: {width}x{height}")]
    EmptyImage {
        /// Reported width
        width: f64,
        /// Reported height
        height: f64,
    },

    /// A transformation record or normalized preset cannot be applied.
    #[error("Invalid transformation: {0}")]
    InvalidTransformation(String),

    /// The clip operation received geometry it cannot map back to pixels.
    #[error("Invalid snap info: {0}")]
    InvalidSnapInfo(String),

    /// Pixel buffer length does not match `width * height * 3`.
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    PixelBufferMismatch {
        /// Bytes required by the dimensions
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SnapError>;
