//! Crop clipping WASM bindings.
//!
//! Cuts the region described by an `ImageSnapInfo` record out of an RGB image.
//! The record usually comes straight from `JsSnapController.snap_info()`.
//!
//! # Example
//!
//! ```typescript
//! import { clip_image, JsSnapImage } from '@imagesnap/wasm';
//!
//! const source = new JsSnapImage(width, height, pixels);
//! const info = controller.snap_info();
//!
//! // Bilinear for the on-screen preview
//! const preview = clip_image(source, info, false);
//!
//! // Lanczos3 for export
//! const full = clip_image(source, info, true);
//! ```

use crate::types::{interpolation_from_bool, JsSnapImage};
use imagesnap_core::ImageSnapInfo;
use wasm_bindgen::prelude::*;

/// Clip an image to the crop described by `info`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `info` - `ImageSnapInfo` record (`translation`, `rotation`, `scale`,
///   `snap_size`, `source_size`)
/// * `use_lanczos` - Use Lanczos3 filter (true) or bilinear (false)
///
/// # Returns
///
/// A new JsSnapImage containing the clipped pixels.
///
/// # Errors
///
/// Returns an error if the record cannot be parsed, fails validation, asks for
/// an output larger than the clip's pixel limit, or the image buffer does not
/// match its dimensions.
#[wasm_bindgen]
pub fn clip_image(
    image: &JsSnapImage,
    info: JsValue,
    use_lanczos: bool,
) -> Result<JsSnapImage, JsValue> {
    let info: ImageSnapInfo = serde_wasm_bindgen::from_value(info)
        .map_err(|e| JsValue::from_str(&format!("Invalid snap info: {}", e)))?;
    clip_with_info(image, &info, use_lanczos).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Clip without going through JsValue, shared with native tests.
pub(crate) fn clip_with_info(
    image: &JsSnapImage,
    info: &ImageSnapInfo,
    use_lanczos: bool,
) -> imagesnap_core::Result<JsSnapImage> {
    let source = image.to_snap()?;
    let clipped =
        imagesnap_core::clip_image(&source, info, interpolation_from_bool(use_lanczos))?;
    Ok(JsSnapImage::from_snap(clipped))
}
