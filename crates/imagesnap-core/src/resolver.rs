//! Bounds containment for candidate crop boxes.
//!
//! A candidate produced by a frame updater goes through two gates:
//!
//! 1. Size and content bounds. A candidate below the minimum box size or
//!    poking out of the content bounds is rejected outright and the current
//!    frame is kept.
//! 2. Image containment. A candidate that leaves the displayed (rotated)
//!    image is corrected by trying an ordered list of fallback rectangles
//!    built from the old/new extents. The first one inside the content
//!    bounds and fully on the image wins; if none is, the plain intersection
//!    of old and new frames is used.
//!
//! The fallback order favors the dimension being dragged over the other one.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Fallback rectangles, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fallback {
    /// Requested width, vertical extent clamped to the old/new overlap
    KeepWidth,
    /// Requested height, horizontal extent clamped to the overlap
    KeepHeight,
    /// Requested horizontal origin and width, vertical extent clamped
    KeepHorizontal,
    /// Requested vertical origin and height, horizontal extent clamped
    KeepVertical,
}

impl Fallback {
    pub const ORDER: [Fallback; 4] = [
        Fallback::KeepWidth,
        Fallback::KeepHeight,
        Fallback::KeepHorizontal,
        Fallback::KeepVertical,
    ];

    /// Build this fallback's rectangle from the overlap of `current` and
    /// `candidate`.
    pub fn rect(self, current: &Rect, candidate: &Rect) -> Rect {
        let overlap = Overlap::of(current, candidate);
        let clamped_width = (overlap.max_x - overlap.min_x).max(0.0);
        let clamped_height = (overlap.max_y - overlap.min_y).max(0.0);
        match self {
            Fallback::KeepWidth => {
                Rect::new(overlap.min_x, overlap.min_y, candidate.width, clamped_height)
            }
            Fallback::KeepHeight => {
                Rect::new(overlap.min_x, overlap.min_y, clamped_width, candidate.height)
            }
            Fallback::KeepHorizontal => {
                Rect::new(candidate.min_x(), overlap.min_y, candidate.width, clamped_height)
            }
            Fallback::KeepVertical => {
                Rect::new(overlap.min_x, candidate.min_y(), clamped_width, candidate.height)
            }
        }
    }
}

/// Extents shared by the current and candidate frames.
struct Overlap {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Overlap {
    fn of(a: &Rect, b: &Rect) -> Self {
        Self {
            min_x: a.min_x().max(b.min_x()),
            min_y: a.min_y().max(b.min_y()),
            max_x: a.max_x().min(b.max_x()),
            max_y: a.max_y().min(b.max_y()),
        }
    }

    fn rect(&self) -> Rect {
        Rect::from_extents(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Outcome of resolving a candidate frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution {
    /// The candidate passed every check
    Accepted { frame: Rect },
    /// The candidate left the image; a fallback rectangle was used
    Corrected { frame: Rect, fallback: Fallback },
    /// No fallback fit; the old/new intersection was used
    Intersection { frame: Rect },
    /// Failed size or content-bounds checks; the current frame stays
    Rejected,
}

impl Resolution {
    /// The frame to commit, given the current one.
    pub fn frame_or(self, current: Rect) -> Rect {
        match self {
            Resolution::Accepted { frame }
            | Resolution::Corrected { frame, .. }
            | Resolution::Intersection { frame } => frame,
            Resolution::Rejected => current,
        }
    }
}

/// Validates candidate frames against the box size floor, the content bounds
/// and the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsResolver {
    content_bounds: Rect,
    minimum_box_size: f64,
}

impl BoundsResolver {
    pub fn new(content_bounds: Rect, minimum_box_size: f64) -> Self {
        Self {
            content_bounds,
            minimum_box_size,
        }
    }

    /// Size and content-bounds gate.
    pub fn within_bounds(&self, candidate: &Rect) -> bool {
        candidate.width >= self.minimum_box_size
            && candidate.height >= self.minimum_box_size
            && self.content_bounds.contains_rect(candidate)
    }

    /// Resolve `candidate` against the current frame.
    ///
    /// # Arguments
    ///
    /// * `current` - Frame before this move
    /// * `candidate` - Frame proposed by the frame updater
    /// * `on_image` - Whether a rectangle lies fully on the displayed image
    pub fn resolve(
        &self,
        current: &Rect,
        candidate: &Rect,
        on_image: impl Fn(&Rect) -> bool,
    ) -> Resolution {
        if !self.within_bounds(candidate) {
            tracing::trace!(?candidate, "candidate frame rejected by size or content bounds");
            return Resolution::Rejected;
        }

        if on_image(candidate) {
            return Resolution::Accepted { frame: *candidate };
        }

        let corrected = Fallback::ORDER
            .iter()
            .map(|fallback| (*fallback, fallback.rect(current, candidate)))
            .find(|(_, rect)| self.content_bounds.contains_rect(rect) && on_image(rect));

        match corrected {
            Some((fallback, frame)) => {
                tracing::trace!(?fallback, ?frame, "candidate frame corrected");
                Resolution::Corrected { frame, fallback }
            }
            None => {
                let frame = Overlap::of(current, candidate).rect();
                tracing::warn!(?frame, "no fallback fits the image, using intersection");
                Resolution::Intersection { frame }
            }
        }
    }
}
