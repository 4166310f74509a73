//! Locked-aspect frame updates.
//!
//! The aspect ratio is taken from the origin frame at pointer-down. Side drags
//! change one dimension, derive the other from the ratio and re-center the box
//! on the origin frame's center along the perpendicular axis. Corner drags
//! scale the box uniformly and keep the opposite corner fixed.

use crate::geometry::{Rect, Size};
use crate::hit_test::Edge;

/// Computes crop box frames when the aspect ratio is locked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockedAspectUpdater {
    edge: Edge,
    origin_frame: Rect,
    content_frame: Rect,
}

impl LockedAspectUpdater {
    pub fn new(edge: Edge, origin_frame: Rect, content_frame: Rect) -> Self {
        Self {
            edge,
            origin_frame,
            content_frame,
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Width over height of the origin frame.
    pub fn aspect_ratio(&self) -> f64 {
        self.origin_frame.width / self.origin_frame.height
    }

    /// Apply a cumulative pointer delta.
    pub fn update(&self, frame: Rect, x_delta: f64, y_delta: f64) -> Rect {
        if self.origin_frame.is_empty() {
            return frame;
        }

        let origin = self.origin_frame;
        let ratio = self.aspect_ratio();

        match self.edge {
            Edge::Left => {
                let x_delta = x_delta.max(0.0);
                let width = origin.width - x_delta;
                self.centered_vertically(origin.x + x_delta, width, width / ratio)
            }
            Edge::Right => {
                let width = (origin.width + x_delta).min(self.content_frame.height * ratio);
                self.centered_vertically(origin.x, width, width / ratio)
            }
            Edge::Top => {
                let y_delta = y_delta.max(0.0);
                let height = origin.height - y_delta;
                self.centered_horizontally(origin.y + y_delta, height * ratio, height)
            }
            Edge::Bottom => {
                let height = (origin.height + y_delta).min(self.content_frame.width / ratio);
                self.centered_horizontally(origin.y, height * ratio, height)
            }
            Edge::TopLeft => {
                let size = self.scaled_size(x_delta.max(0.0), y_delta.max(0.0));
                Rect::new(
                    origin.max_x() - size.width,
                    origin.max_y() - size.height,
                    size.width,
                    size.height,
                )
            }
            Edge::TopRight => {
                let size = self.scaled_size(-(x_delta.max(0.0)), y_delta.max(0.0));
                Rect::new(origin.x, origin.max_y() - size.height, size.width, size.height)
            }
            Edge::BottomLeft => {
                let size = self.scaled_size(x_delta, -y_delta);
                Rect::new(origin.max_x() - size.width, origin.y, size.width, size.height)
            }
            Edge::BottomRight => {
                let size = self.scaled_size(-x_delta, -y_delta);
                Rect::from_origin_size(origin.origin(), size)
            }
            Edge::None => frame,
        }
    }

    fn centered_vertically(&self, x: f64, width: f64, height: f64) -> Rect {
        Rect::new(x, self.origin_frame.mid_y() - height / 2.0, width, height)
    }

    fn centered_horizontally(&self, y: f64, width: f64, height: f64) -> Rect {
        Rect::new(self.origin_frame.mid_x() - width / 2.0, y, width, height)
    }

    /// Uniformly scaled size for a corner drag.
    ///
    /// The scale is the mean of the fractional shrink on each axis
    /// (`1 - delta / dimension`). The longer side is derived from the
    /// rounded-up shorter one so the result keeps the exact ratio.
    fn scaled_size(&self, x_shrink: f64, y_shrink: f64) -> Size {
        let origin = self.origin_frame;
        let distance_x = 1.0 - x_shrink / origin.width;
        let distance_y = 1.0 - y_shrink / origin.height;
        let scale = (distance_x + distance_y) * 0.5;
        let ratio = self.aspect_ratio();

        // Long side derived from the ceiled short side, never ceiled itself
        if ratio >= 1.0 {
            let height = (origin.height * scale).ceil();
            Size::new(height * ratio, height)
        } else {
            let width = (origin.width * scale).ceil();
            Size::new(width, width / ratio)
        }
    }
}
