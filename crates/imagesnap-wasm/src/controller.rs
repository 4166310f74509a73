//! Crop controller WASM bindings.
//!
//! `JsSnapController` drives a crop session from JavaScript: pointer events,
//! the rotation dial, 90° turns, aspect ratio presets and device rotation.
//! Geometry records cross the boundary as plain objects via serde-wasm-bindgen.
//!
//! # Example
//!
//! ```typescript
//! import { JsSnapController } from '@imagesnap/wasm';
//!
//! const controller = new JsSnapController({ fixed_ratio: { mode: 'free' } }, 800, 600);
//! controller.set_observer((status) => console.log(status.kind));
//! controller.set_view_bounds(0, 0, 400, 800, 0);
//!
//! canvas.onpointerdown = (e) => controller.pointer_down(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => draw(controller.pointer_move(e.offsetX, e.offsetY));
//! canvas.onpointerup = () => controller.pointer_up() && draw(controller.frame());
//! ```

use crate::types::{direction_from_bool, orientation_from_u8};
use imagesnap_core::{Point, Rect, Size, SnapConfig, SnapController, SnapStatus, Transformation};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn core_err(e: imagesnap_core::SnapError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Interactive crop session for JavaScript.
///
/// All coordinates are view points with y growing downward. Angles are in
/// radians, positive turning clockwise on screen.
#[wasm_bindgen]
pub struct JsSnapController {
    inner: SnapController,
}

#[wasm_bindgen]
impl JsSnapController {
    /// Create a controller for an image of the given size.
    ///
    /// # Arguments
    /// * `config` - Partial `SnapConfig` object; `undefined` or `null` uses defaults
    /// * `image_width` - Image width in view points
    /// * `image_height` - Image height in view points
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be parsed or is invalid, or the
    /// image size is empty.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        image_width: f64,
        image_height: f64,
    ) -> Result<JsSnapController, JsValue> {
        let config: SnapConfig = if config.is_undefined() || config.is_null() {
            SnapConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Self::with_config(config, image_width, image_height).map_err(core_err)
    }

    /// Register a callback receiving every status change as `{ kind, ... }`.
    ///
    /// Errors thrown by the callback are logged to the console and otherwise
    /// ignored.
    pub fn set_observer(&mut self, callback: js_sys::Function) {
        self.inner.set_observer(move |status: &SnapStatus| {
            let value = match serde_wasm_bindgen::to_value(status) {
                Ok(value) => value,
                Err(e) => {
                    web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
                    return;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                web_sys::console::error_1(&e);
            }
        });
    }

    /// Remove the status callback.
    pub fn clear_observer(&mut self) {
        self.inner.clear_observer();
    }

    /// Lay the view out for new bounds.
    ///
    /// `orientation`: 0 = portrait, 1 = landscape left, 2 = landscape right.
    pub fn set_view_bounds(&mut self, x: f64, y: f64, width: f64, height: f64, orientation: u8) {
        self.inner
            .set_view_bounds(Rect::new(x, y, width, height), orientation_from_u8(orientation));
    }

    /// Current crop box as `{ x, y, width, height }`.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.frame())
    }

    /// Current image placement as `{ center, size, ... }`.
    pub fn placement(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.placement())
    }

    /// Current status as `{ kind, ... }`.
    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.status())
    }

    /// Region available for the crop box.
    pub fn content_bounds(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.content_bounds())
    }

    /// Whether a pointer is down on the image, a handle or the dial.
    #[wasm_bindgen(getter)]
    pub fn is_touching(&self) -> bool {
        self.inner.status().is_touching()
    }

    /// Total rotation (quarter turns plus dial angle) in radians.
    #[wasm_bindgen(getter)]
    pub fn total_radians(&self) -> f64 {
        self.inner.total_radians()
    }

    /// Whether the aspect ratio is currently locked.
    #[wasm_bindgen(getter)]
    pub fn aspect_locked(&self) -> bool {
        self.inner.aspect_lock().enabled
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(Point::new(x, y));
    }

    /// Feed a pointer position; returns the crop box after the move.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let frame = self.inner.pointer_move(Point::new(x, y));
        to_js(&frame)
    }

    /// End the gesture. Returns `true` when the crop box changed and was re-fitted.
    pub fn pointer_up(&mut self) -> bool {
        self.inner.pointer_up()
    }

    pub fn touch_rotation_dial(&mut self) {
        self.inner.touch_rotation_dial();
    }

    /// Set the dial angle in radians.
    pub fn rotate_dial(&mut self, radians: f64) {
        self.inner.rotate_dial(radians);
    }

    pub fn release_rotation_dial(&mut self) {
        self.inner.release_rotation_dial();
    }

    /// Start a 90° turn and return its plan for the animation.
    ///
    /// Call `finish_rotate_90()` once the animation completes.
    pub fn begin_rotate_90(&mut self, clockwise: bool) -> Result<JsValue, JsValue> {
        let plan = self.inner.begin_rotate_90(direction_from_bool(clockwise));
        to_js(&plan)
    }

    pub fn finish_rotate_90(&mut self) {
        self.inner.finish_rotate_90();
    }

    /// Lock the crop box to `ratio` (width / height).
    ///
    /// # Errors
    ///
    /// Returns an error if the ratio is not a positive finite number or the
    /// configuration forces a ratio.
    pub fn set_fixed_ratio(&mut self, ratio: f64) -> Result<(), JsValue> {
        self.inner.set_fixed_ratio(ratio).map_err(core_err)
    }

    pub fn unlock_aspect_ratio(&mut self) {
        self.inner.unlock_aspect_ratio();
    }

    /// Swap the locked ratio between landscape and portrait.
    pub fn flip_crop_box_orientation(&mut self) {
        self.inner.flip_crop_box_orientation();
    }

    /// Image aspect ratio under the current quarter turn.
    pub fn image_ratio(&self) -> f64 {
        self.inner.image_ratio()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn is_resettable(&self) -> bool {
        self.inner.is_resettable()
    }

    #[wasm_bindgen(getter)]
    pub fn needs_crop(&self) -> bool {
        self.inner.needs_crop()
    }

    /// Remember the crop region before the device rotates.
    pub fn prepare_for_device_rotation(&mut self) {
        self.inner.prepare_for_device_rotation();
    }

    /// Re-lay out for the rotated view, keeping the saved crop region.
    pub fn handle_device_rotation(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        orientation: u8,
    ) {
        self.inner.handle_device_rotation(
            Rect::new(x, y, width, height),
            orientation_from_u8(orientation),
        );
    }

    /// Crop geometry for `clip_image`.
    pub fn snap_info(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snap_info())
    }

    /// Full interactive state, for persisting and restoring a session.
    pub fn transformation(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.transformation())
    }

    /// Restore a state produced by `transformation()`.
    pub fn apply_transformation(&mut self, transformation: JsValue) -> Result<(), JsValue> {
        let transformation: Transformation = serde_wasm_bindgen::from_value(transformation)
            .map_err(|e| JsValue::from_str(&format!("Invalid transformation: {}", e)))?;
        self.inner
            .apply_transformation(&transformation)
            .map_err(core_err)
    }

    /// Show the region given in normalized image coordinates (0..1).
    ///
    /// Returns the transformation that was applied.
    pub fn apply_normalized_preset(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<JsValue, JsValue> {
        let transformation = self
            .inner
            .apply_normalized_preset(Rect::new(x, y, width, height))
            .map_err(core_err)?;
        to_js(&transformation)
    }
}

impl JsSnapController {
    pub(crate) fn with_config(
        config: SnapConfig,
        image_width: f64,
        image_height: f64,
    ) -> imagesnap_core::Result<Self> {
        let inner = SnapController::new(config, Size::new(image_width, image_height))?;
        Ok(Self { inner })
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &SnapController {
        &self.inner
    }
}
