//! Free-aspect frame updates.
//!
//! Each handle maps to a fixed sign combination applied to the origin frame's
//! size. Sides change one dimension; corners change both. Each axis of a
//! corner drag is written separately, but both are validated against the same
//! combined size, so they are accepted or skipped together.

use crate::geometry::{Rect, Size};
use crate::hit_test::Edge;

/// Computes crop box frames when the aspect ratio is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeAspectUpdater {
    edge: Edge,
    origin_frame: Rect,
    minimum_aspect_ratio: f64,
}

impl FreeAspectUpdater {
    pub fn new(edge: Edge, origin_frame: Rect) -> Self {
        Self {
            edge,
            origin_frame,
            minimum_aspect_ratio: 0.0,
        }
    }

    /// Require `min(w, h) / max(w, h)` to stay at or above `ratio`.
    pub fn with_minimum_aspect_ratio(mut self, ratio: f64) -> Self {
        self.minimum_aspect_ratio = ratio;
        self
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Apply a cumulative pointer delta.
    ///
    /// A drag whose new size would break the aspect floor leaves `frame`
    /// unchanged.
    pub fn update(&self, frame: Rect, x_delta: f64, y_delta: f64) -> Rect {
        let Some(new_size) = self.resized(x_delta, y_delta) else {
            return frame;
        };
        if !self.aspect_valid(new_size) {
            return frame;
        }

        let mut frame = frame;

        let origin = self.origin_frame;
        let moves_left = matches!(self.edge, Edge::Left | Edge::TopLeft | Edge::BottomLeft);
        let moves_top = matches!(self.edge, Edge::Top | Edge::TopLeft | Edge::TopRight);
        let horizontal = !matches!(self.edge, Edge::Top | Edge::Bottom);
        let vertical = !matches!(self.edge, Edge::Left | Edge::Right);

        if vertical {
            if moves_top {
                frame.y = origin.y + y_delta;
            }
            frame.height = new_size.height;
        }
        if horizontal {
            if moves_left {
                frame.x = origin.x + x_delta;
            }
            frame.width = new_size.width;
        }
        frame
    }

    /// Size after the drag, or `None` for [`Edge::None`].
    fn resized(&self, x_delta: f64, y_delta: f64) -> Option<Size> {
        let (dw, dh) = match self.edge {
            Edge::Left => (-x_delta, 0.0),
            Edge::Right => (x_delta, 0.0),
            Edge::Top => (0.0, -y_delta),
            Edge::Bottom => (0.0, y_delta),
            Edge::TopLeft => (-x_delta, -y_delta),
            Edge::TopRight => (x_delta, -y_delta),
            Edge::BottomLeft => (-x_delta, y_delta),
            Edge::BottomRight => (x_delta, y_delta),
            Edge::None => return None,
        };
        Some(Size::new(
            self.origin_frame.width + dw,
            self.origin_frame.height + dh,
        ))
    }

    fn aspect_valid(&self, size: Size) -> bool {
        size.width.min(size.height) / size.width.max(size.height) >= self.minimum_aspect_ratio
    }
}
