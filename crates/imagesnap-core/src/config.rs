//! Fixed configuration constants for the crop view.
//!
//! All values are in view points. `SnapConfig` deserializes from partial JSON
//! (missing fields take their defaults), which is how the bindings crate
//! receives it from TypeScript.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};

/// How the crop box aspect ratio may be changed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "ratio", rename_all = "camelCase")]
pub enum FixedRatioMode {
    /// No ratio is imposed; the user may lock one later.
    #[default]
    Free,
    /// Always use this ratio. The user cannot unlock it.
    /// A ratio of 0 means "use the image's own ratio".
    Forced(f64),
    /// Start locked at this ratio; the user may unlock or change it.
    /// A ratio of 0 means no default.
    Default(f64),
}

impl FixedRatioMode {
    /// Whether the aspect ratio is permanently forced.
    pub fn is_forced(self) -> bool {
        matches!(self, FixedRatioMode::Forced(_))
    }
}

/// Configuration for a [`SnapController`](crate::SnapController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Smallest width or height a dragged crop box may have
    pub minimum_box_size: f64,
    /// Floor for `min(w, h) / max(w, h)` in free-aspect mode (0 = unconstrained)
    pub minimum_aspect_ratio: f64,
    /// Side length of the touch zones around crop box handles
    pub hot_area_unit: f64,
    /// Padding between the view bounds and the content bounds
    pub padding: f64,
    /// Space reserved for the rotation dial
    pub dial_height: f64,
    /// Slack allowed when checking that the image still covers the crop box
    pub containment_tolerance: f64,
    /// Duration of the 90° rotation animation, in seconds
    pub rotation_animation_secs: f64,
    /// Aspect ratio policy
    pub fixed_ratio: FixedRatioMode,
    /// Whether the rotation dial is shown (no dial space is reserved otherwise)
    pub show_rotation_dial: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            minimum_box_size: 42.0,
            minimum_aspect_ratio: 0.0,
            hot_area_unit: 32.0,
            padding: 14.0,
            dial_height: 60.0,
            containment_tolerance: 0.25,
            rotation_animation_secs: 0.25,
            fixed_ratio: FixedRatioMode::Free,
            show_rotation_dial: true,
        }
    }
}

impl SnapConfig {
    /// Height actually reserved for the dial.
    pub fn effective_dial_height(&self) -> f64 {
        if self.show_rotation_dial {
            self.dial_height
        } else {
            0.0
        }
    }

    /// Check every constant for a usable value.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("minimum_box_size", self.minimum_box_size),
            ("minimum_aspect_ratio", self.minimum_aspect_ratio),
            ("hot_area_unit", self.hot_area_unit),
            ("padding", self.padding),
            ("dial_height", self.dial_height),
            ("containment_tolerance", self.containment_tolerance),
            ("rotation_animation_secs", self.rotation_animation_secs),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SnapError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.minimum_aspect_ratio > 1.0 {
            return Err(SnapError::InvalidConfig(format!(
                "minimum_aspect_ratio must not exceed 1, got {}",
                self.minimum_aspect_ratio
            )));
        }

        match self.fixed_ratio {
            FixedRatioMode::Forced(ratio) | FixedRatioMode::Default(ratio)
                if !ratio.is_finite() || ratio < 0.0 =>
            {
                Err(SnapError::InvalidAspectRatio(ratio))
            }
            _ => Ok(()),
        }
    }
}
