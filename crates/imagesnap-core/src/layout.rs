//! Layout inputs: content bounds, image placement and viewport state.
//!
//! These values come from the layout collaborator (the renderer). The engine
//! never measures views itself; it only combines what it is given with its
//! own crop box and rotation.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Interface orientation, which decides where the rotation dial sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Dial below the content
    #[default]
    Portrait,
    /// Dial to the right of the content
    LandscapeLeft,
    /// Dial to the left of the content
    LandscapeRight,
}

/// Region available for the image and crop box.
///
/// The view bounds minus `padding` on every side and the dial reservation on
/// the side the dial occupies for `orientation`.
pub fn content_bounds(
    view_bounds: &Rect,
    padding: f64,
    dial_height: f64,
    orientation: Orientation,
) -> Rect {
    let inner = view_bounds.inset_by(padding, padding);
    let rect = match orientation {
        Orientation::Portrait => Rect::new(inner.x, inner.y, inner.width, inner.height - dial_height),
        Orientation::LandscapeLeft => {
            Rect::new(inner.x, inner.y, inner.width - dial_height, inner.height)
        }
        Orientation::LandscapeRight => Rect::new(
            inner.x + dial_height,
            inner.y,
            inner.width - dial_height,
            inner.height,
        ),
    };
    Rect::new(rect.x, rect.y, rect.width.max(0.0), rect.height.max(0.0))
}

/// Where the image view sits in view coordinates.
///
/// `size` is the unzoomed image view size; the displayed image is `size`
/// scaled by `scale` and turned by the controller's total rotation around
/// `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub center: Point,
    pub size: Size,
    pub scale: f64,
}

impl ImagePlacement {
    /// An unrotated image view exactly filling `frame`.
    pub fn filling(frame: &Rect) -> Self {
        Self {
            center: frame.center(),
            size: frame.size(),
            scale: 1.0,
        }
    }

    /// Image size on screen, before rotation.
    pub fn displayed_size(&self) -> Size {
        Size::new(self.size.width * self.scale, self.size.height * self.scale)
    }

    /// Map a view point into the image's local frame, in scaled units
    /// relative to the image center.
    fn local_offset(&self, point: Point, rotation: f64) -> Point {
        (point - self.center).rotated(-rotation)
    }

    /// Map a view point to normalized image coordinates (0..1 inside the image).
    pub fn normalized(&self, point: Point, rotation: f64) -> Point {
        let local = self.local_offset(point, rotation).scaled(1.0 / self.scale);
        Point::new(
            (local.x + self.size.width / 2.0) / self.size.width,
            (local.y + self.size.height / 2.0) / self.size.height,
        )
    }

    /// Map normalized image coordinates back to a view point.
    pub fn denormalized(&self, normalized: Point, rotation: f64) -> Point {
        let local = Point::new(
            normalized.x * self.size.width - self.size.width / 2.0,
            normalized.y * self.size.height - self.size.height / 2.0,
        );
        self.center + local.scaled(self.scale).rotated(rotation)
    }

    /// Whether all corners of `rect` fall on the rotated, scaled image.
    pub fn contains_rect(&self, rect: &Rect, rotation: f64, tolerance: f64) -> bool {
        let half = self.displayed_size();
        let (half_w, half_h) = (half.width / 2.0 + tolerance, half.height / 2.0 + tolerance);
        rect.corners().iter().all(|corner| {
            let local = self.local_offset(*corner, rotation);
            local.x.abs() <= half_w && local.y.abs() <= half_h
        })
    }

    /// Zoom by `factor` around a fixed view point.
    pub fn zoomed_about(&self, anchor: Point, factor: f64) -> Self {
        Self {
            center: anchor + (self.center - anchor).scaled(factor),
            size: self.size,
            scale: self.scale * factor,
        }
    }

    /// Turn the image by `delta` radians around a fixed view point.
    pub fn rotated_about(&self, anchor: Point, delta: f64) -> Self {
        Self {
            center: anchor + (self.center - anchor).rotated(delta),
            ..*self
        }
    }

    /// Move the image by `delta` view units.
    pub fn translated(&self, delta: Point) -> Self {
        Self {
            center: self.center + delta,
            ..*self
        }
    }

    /// Smallest adjustment that makes the image cover `rect` again.
    ///
    /// Returns `self` when the rect is already covered. Otherwise the image
    /// is zoomed about the rect's center until it is large enough to hold the
    /// rect's rotated bounding box, then moved only as far as needed to bring
    /// that box inside the image. The rect's center keeps its place on the
    /// image unless the box would hang off an edge.
    pub fn covering(&self, rect: &Rect, rotation: f64) -> Self {
        if self.contains_rect(rect, rotation, 0.0) || self.size.is_empty() || self.scale <= 0.0 {
            return *self;
        }

        let anchor = rect.center();
        let bounds = rect.size().rotated_bounds(rotation);
        let min_scale = (bounds.width / self.size.width).max(bounds.height / self.size.height);

        let mut placement = *self;
        if placement.scale < min_scale {
            placement = placement.zoomed_about(anchor, min_scale / placement.scale);
        }

        // Rect center in the image's local frame, clamped so its rotated
        // bounding box stays on the image
        let displayed = placement.displayed_size();
        let slack_x = ((displayed.width - bounds.width) / 2.0).max(0.0);
        let slack_y = ((displayed.height - bounds.height) / 2.0).max(0.0);
        let local = placement.local_offset(anchor, rotation);
        let clamped = Point::new(
            local.x.clamp(-slack_x, slack_x),
            local.y.clamp(-slack_y, slack_y),
        );

        placement.translated((local - clamped).rotated(rotation))
    }
}

/// Scroll-surface state shared with the renderer and echoed back in a
/// [`Transformation`](crate::records::Transformation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub offset: Point,
    pub scale: f64,
    pub scroll_bounds: Rect,
    pub manually_zoomed: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            scale: 1.0,
            scroll_bounds: Rect::ZERO,
            manually_zoomed: false,
        }
    }
}
