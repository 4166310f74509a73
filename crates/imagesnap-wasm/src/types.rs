//! WASM-compatible wrapper types for image data and enum arguments.
//!
//! This module provides JavaScript-friendly types that wrap the core ImageSnap types,
//! handling the conversion between Rust and JavaScript data representations.

use imagesnap_core::{Interpolation, Orientation, RotationDirection, SnapImage};
use wasm_bindgen::prelude::*;

/// An RGB image wrapper for JavaScript.
///
/// This type wraps the core `SnapImage` type and provides a JavaScript-friendly
/// interface for accessing image dimensions and pixel data.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. Keep the image in WASM memory between
/// clips and only extract pixels when they need to be drawn.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsSnapImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsSnapImage {
    /// Create a new JsSnapImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsSnapImage {
        JsSnapImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsSnapImage {
    /// Wrap a core SnapImage without copying its pixels.
    pub(crate) fn from_snap(img: SnapImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core SnapImage, validating the buffer length.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_snap(&self) -> imagesnap_core::Result<SnapImage> {
        SnapImage::new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert a u8 orientation value to the core Orientation enum.
///
/// Values:
/// - 0 = Portrait (dial below the content)
/// - 1 = LandscapeLeft (dial to the right)
/// - 2 = LandscapeRight (dial to the left)
///
/// Any other value defaults to Portrait.
pub(crate) fn orientation_from_u8(value: u8) -> Orientation {
    match value {
        1 => Orientation::LandscapeLeft,
        2 => Orientation::LandscapeRight,
        _ => Orientation::Portrait,
    }
}

pub(crate) fn direction_from_bool(clockwise: bool) -> RotationDirection {
    if clockwise {
        RotationDirection::Clockwise
    } else {
        RotationDirection::Counterclockwise
    }
}

pub(crate) fn interpolation_from_bool(use_lanczos: bool) -> Interpolation {
    if use_lanczos {
        Interpolation::Lanczos3
    } else {
        Interpolation::Bilinear
    }
}
