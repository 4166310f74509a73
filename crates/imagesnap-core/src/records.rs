//! Output records handed to collaborators.
//!
//! [`ImageSnapInfo`] is everything the pixel clip needs; [`Transformation`]
//! is enough to restore the interactive state later (after a device rotation
//! or to replay a previous crop).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::geometry::{Point, Rect, Size};

/// Geometry of a crop, in view units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSnapInfo {
    /// Image center minus crop box center
    pub translation: Point,
    /// Total rotation in radians (positive turns clockwise on screen)
    pub rotation: f64,
    /// Zoom of the image view
    pub scale: f64,
    /// Crop box size
    pub snap_size: Size,
    /// Unscaled image view size
    pub source_size: Size,
}

impl ImageSnapInfo {
    /// Check the record can drive a clip.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SnapError::InvalidSnapInfo(format!(
                "scale must be finite and positive, got {}",
                self.scale
            )));
        }
        if self.snap_size.is_empty() || self.source_size.is_empty() {
            return Err(SnapError::InvalidSnapInfo(format!(
                "empty size: snap {}x{}, source {}x{}",
                self.snap_size.width,
                self.snap_size.height,
                self.source_size.width,
                self.source_size.height
            )));
        }
        let values = [
            self.translation.x,
            self.translation.y,
            self.rotation,
            self.snap_size.width,
            self.snap_size.height,
            self.source_size.width,
            self.source_size.height,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SnapError::InvalidSnapInfo(
                "non-finite geometry".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full interactive state of the crop view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// Scroll offset of the image surface
    pub offset: Point,
    /// Total rotation in radians
    pub rotation: f64,
    /// Zoom of the image view
    pub scale: f64,
    pub manually_zoomed: bool,
    /// Crop box right after the last reset
    pub initial_mask_frame: Rect,
    /// Crop box
    pub mask_frame: Rect,
    /// Scroll surface bounds (origin is the scroll offset)
    pub scroll_bounds: Rect,
}

impl Transformation {
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SnapError::InvalidTransformation(format!(
                "scale must be finite and positive, got {}",
                self.scale
            )));
        }
        let finite = self.offset.x.is_finite()
            && self.offset.y.is_finite()
            && self.rotation.is_finite()
            && self.initial_mask_frame.is_finite()
            && self.mask_frame.is_finite()
            && self.scroll_bounds.is_finite();
        if !finite {
            return Err(SnapError::InvalidTransformation(
                "non-finite geometry".to_string(),
            ));
        }
        if self.mask_frame.width < 0.0 || self.mask_frame.height < 0.0 {
            return Err(SnapError::InvalidTransformation(format!(
                "negative mask frame size {}x{}",
                self.mask_frame.width, self.mask_frame.height
            )));
        }
        Ok(())
    }
}
