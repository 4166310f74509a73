//! Frame updaters: compute a new crop box from a handle drag.
//!
//! Both updaters are pure functions of the gesture snapshot (the dragged
//! edge and the origin frame captured at pointer-down) plus the cumulative
//! pointer delta. Every move recomputes the frame from the snapshot, so a
//! drag never accumulates rounding drift.
//!
//! # Modes
//!
//! - [`FreeAspectUpdater`]: width and height change independently
//! - [`LockedAspectUpdater`]: the origin frame's aspect ratio is preserved
//!
//! The mode is chosen once per gesture, at pointer-down.

mod free;
mod locked;

pub use free::FreeAspectUpdater;
pub use locked::LockedAspectUpdater;

use crate::geometry::Rect;
use crate::hit_test::Edge;

/// Frame updater selected for the current gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameUpdater {
    Free(FreeAspectUpdater),
    Locked(LockedAspectUpdater),
}

impl FrameUpdater {
    /// Pick the updater for a gesture.
    ///
    /// # Arguments
    ///
    /// * `aspect_locked` - Whether the crop box ratio is locked
    /// * `edge` - Handle under the pointer at pointer-down
    /// * `origin_frame` - Crop box at pointer-down
    /// * `content_frame` - Content bounds, used to cap locked-aspect growth
    /// * `minimum_aspect_ratio` - Aspect floor for free-aspect drags
    pub fn for_gesture(
        aspect_locked: bool,
        edge: Edge,
        origin_frame: Rect,
        content_frame: Rect,
        minimum_aspect_ratio: f64,
    ) -> Self {
        if aspect_locked {
            FrameUpdater::Locked(LockedAspectUpdater::new(edge, origin_frame, content_frame))
        } else {
            FrameUpdater::Free(
                FreeAspectUpdater::new(edge, origin_frame)
                    .with_minimum_aspect_ratio(minimum_aspect_ratio),
            )
        }
    }

    /// Handle being dragged.
    pub fn edge(&self) -> Edge {
        match self {
            FrameUpdater::Free(updater) => updater.edge(),
            FrameUpdater::Locked(updater) => updater.edge(),
        }
    }

    /// Compute the candidate frame for a cumulative pointer delta.
    ///
    /// `frame` is the current crop box; it is returned unchanged for
    /// [`Edge::None`] and provides the values of any axis whose update is
    /// skipped.
    pub fn update(&self, frame: Rect, x_delta: f64, y_delta: f64) -> Rect {
        match self {
            FrameUpdater::Free(updater) => updater.update(frame, x_delta, y_delta),
            FrameUpdater::Locked(updater) => updater.update(frame, x_delta, y_delta),
        }
    }
}
