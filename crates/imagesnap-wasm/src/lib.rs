//! ImageSnap WASM - WebAssembly bindings for ImageSnap
//!
//! This crate provides WASM bindings to expose the imagesnap-core crop engine
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `controller` - Interactive crop session (gestures, rotation, ratios, state records)
//! - `clip` - Cut the final crop out of an RGB image
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSnapController, JsSnapImage, clip_image } from '@imagesnap/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const controller = new JsSnapController(undefined, 800, 600);
//! controller.set_view_bounds(0, 0, 400, 800, 0);
//!
//! // ... user drags handles, rotates ...
//!
//! const image = new JsSnapImage(width, height, pixels);
//! const cropped = clip_image(image, controller.snap_info(), true);
//! console.log(`Cropped to ${cropped.width}x${cropped.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod clip;
mod controller;
mod types;

// Re-export public types
pub use clip::clip_image;
pub use controller::JsSnapController;
pub use types::JsSnapImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
