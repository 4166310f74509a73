//! ImageSnap Core - Crop-box geometry engine
//!
//! This crate holds the interactive crop logic for ImageSnap: the state
//! machine for pointer, dial and 90° rotation gestures, the free and locked
//! aspect frame updaters, the rotation model, and the bounds resolver that
//! keeps the crop box on the image. It never renders; the renderer observes
//! status transitions and reads the geometry back.
//!
//! A reference pixel clip consumes the resulting [`ImageSnapInfo`].

pub mod clip;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod records;
pub mod resolver;
pub mod rotation;
pub mod status;
pub mod updater;

pub use clip::{clip_image, Interpolation, SnapImage, MAX_OUTPUT_PIXELS};
pub use config::{FixedRatioMode, SnapConfig};
pub use controller::{
    Anchors, AspectRatioLock, CropBox, FitResult, RatioOrientation, Rotation90Plan,
    SnapController,
};
pub use error::{Result, SnapError};
pub use geometry::{Point, Rect, Size};
pub use hit_test::{hit_test, Edge};
pub use layout::{content_bounds, ImagePlacement, Orientation, ViewportState};
pub use records::{ImageSnapInfo, Transformation};
pub use resolver::{BoundsResolver, Fallback, Resolution};
pub use rotation::{Quadrant, RotationDirection, RotationModel};
pub use status::{SnapObserver, SnapStatus};
pub use updater::{FrameUpdater, FreeAspectUpdater, LockedAspectUpdater};
