//! The crop view state machine.
//!
//! [`SnapController`] is the single writer of the crop box and the rotation.
//! Every user action goes through one of its operations, which update the
//! geometry synchronously and report the resulting [`SnapStatus`] to the
//! registered observer. Animated transitions (90° turns) are split in two:
//! a `begin_*` call computes the start and end geometry up front, and a
//! `finish_*` call commits it once the renderer's animation completes.
//!
//! # Gesture transaction
//!
//! `pointer_down` snapshots the crop box into its origin frame and picks a
//! frame updater. Each `pointer_move` recomputes the candidate from that
//! snapshot and the cumulative delta, then runs it through the
//! [`BoundsResolver`]. `pointer_up` re-fits the box to the content bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{FixedRatioMode, SnapConfig};
use crate::error::{Result, SnapError};
use crate::geometry::{Point, Rect, Size};
use crate::hit_test::{hit_test, Edge};
use crate::layout::{content_bounds, ImagePlacement, Orientation, ViewportState};
use crate::records::{ImageSnapInfo, Transformation};
use crate::resolver::BoundsResolver;
use crate::rotation::{RotationDirection, RotationModel};
use crate::status::{SnapObserver, SnapStatus};
use crate::updater::FrameUpdater;

/// Slack for the per-move image containment check, absorbing float error on
/// boxes that sit exactly on the image edge.
const ON_IMAGE_EPSILON: f64 = 1e-6;

/// Tolerance for deciding whether the view is back at its initial state.
const RESETTABLE_EPSILON: f64 = 1e-6;

/// Crop box value and its gesture snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropBox {
    frame: Rect,
    origin_frame: Rect,
}

impl CropBox {
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Frame captured at the start of the current gesture.
    pub fn origin_frame(&self) -> Rect {
        self.origin_frame
    }

    /// Whether the frame moved since the last snapshot.
    pub fn needs_crop(&self) -> bool {
        self.frame != self.origin_frame
    }

    fn reset_to(&mut self, frame: Rect) {
        self.frame = frame;
        self.origin_frame = frame;
    }

    fn snapshot(&mut self) {
        self.origin_frame = self.frame;
    }
}

/// Aspect ratio lock. `ratio` is width / height, or [`AspectRatioLock::UNSET`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatioLock {
    pub enabled: bool,
    pub ratio: f64,
}

impl AspectRatioLock {
    pub const UNSET: f64 = -1.0;

    pub fn unlocked() -> Self {
        Self {
            enabled: false,
            ratio: Self::UNSET,
        }
    }

    pub fn locked(ratio: f64) -> Self {
        Self {
            enabled: true,
            ratio,
        }
    }

    pub fn is_set(&self) -> bool {
        self.ratio > 0.0
    }
}

impl Default for AspectRatioLock {
    fn default() -> Self {
        Self::unlocked()
    }
}

/// Crop box corners in normalized image coordinates (0..1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchors {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            top_left: Point::ZERO,
            bottom_right: Point::new(1.0, 1.0),
        }
    }
}

impl Anchors {
    /// Whether the anchors still describe the whole image.
    pub fn is_full_image(&self, tolerance: f64) -> bool {
        let full = Anchors::default();
        self.top_left.approx_eq(full.top_left, tolerance)
            && self.bottom_right.approx_eq(full.bottom_right, tolerance)
    }
}

/// Geometry of a 90° turn, computed before the animation starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation90Plan {
    pub direction: RotationDirection,
    /// Crop box when the turn started
    pub from_frame: Rect,
    /// Crop box once the turn completes
    pub target_frame: Rect,
    /// Total rotation before the turn
    pub start_radians: f64,
    /// Total rotation after the turn
    pub end_radians: f64,
    pub duration_secs: f64,
}

/// Result of fitting the crop box back into the content bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Crop box after the fit
    pub frame: Rect,
    /// Zoom applied to both the crop box and the image
    pub zoom: f64,
    /// Bounding size of the crop box under the current rotation
    pub scroll_size: Size,
}

/// Which ratio presets apply given the current quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RatioOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    pan_origin: Point,
    updater: FrameUpdater,
}

/// Owns the crop box and rotation and drives every interaction.
pub struct SnapController {
    config: SnapConfig,
    image_size: Size,
    view_bounds: Rect,
    orientation: Orientation,
    crop_box: CropBox,
    initial_frame: Rect,
    rotation: RotationModel,
    aspect_lock: AspectRatioLock,
    anchors: Anchors,
    placement: ImagePlacement,
    viewport: ViewportState,
    status: SnapStatus,
    gesture: Option<Gesture>,
    pending_rotation: Option<Rotation90Plan>,
    observer: Option<Box<dyn SnapObserver>>,
}

impl fmt::Debug for SnapController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapController")
            .field("image_size", &self.image_size)
            .field("view_bounds", &self.view_bounds)
            .field("orientation", &self.orientation)
            .field("crop_box", &self.crop_box)
            .field("rotation", &self.rotation)
            .field("aspect_lock", &self.aspect_lock)
            .field("placement", &self.placement)
            .field("status", &self.status)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl SnapController {
    /// Create a controller for an image of `image_size` view units.
    ///
    /// The crop box stays empty until [`set_view_bounds`](Self::set_view_bounds)
    /// provides a layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the image has no area.
    pub fn new(config: SnapConfig, image_size: Size) -> Result<Self> {
        config.validate()?;
        if image_size.is_empty() || !image_size.width.is_finite() || !image_size.height.is_finite()
        {
            return Err(SnapError::EmptyImage {
                width: image_size.width,
                height: image_size.height,
            });
        }

        let forced = config.fixed_ratio.is_forced();
        let aspect_lock = initial_lock(&config, image_size);
        Ok(Self {
            config,
            image_size,
            view_bounds: Rect::ZERO,
            orientation: Orientation::Portrait,
            crop_box: CropBox::default(),
            initial_frame: Rect::ZERO,
            rotation: RotationModel::new(forced),
            aspect_lock,
            anchors: Anchors::default(),
            placement: ImagePlacement {
                center: Point::ZERO,
                size: Size::ZERO,
                scale: 1.0,
            },
            viewport: ViewportState::default(),
            status: SnapStatus::Initial,
            gesture: None,
            pending_rotation: None,
            observer: None,
        })
    }

    /// Register the observer notified on every status transition.
    pub fn set_observer(&mut self, observer: impl SnapObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ----- Accessors -----

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn status(&self) -> SnapStatus {
        self.status
    }

    pub fn crop_box(&self) -> CropBox {
        self.crop_box
    }

    pub fn frame(&self) -> Rect {
        self.crop_box.frame
    }

    pub fn rotation(&self) -> RotationModel {
        self.rotation
    }

    pub fn aspect_lock(&self) -> AspectRatioLock {
        self.aspect_lock
    }

    pub fn placement(&self) -> ImagePlacement {
        self.placement
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Plan of the 90° turn awaiting [`finish_rotate_90`](Self::finish_rotate_90).
    pub fn pending_rotation(&self) -> Option<Rotation90Plan> {
        self.pending_rotation
    }

    /// Anchors saved by the last [`prepare_for_device_rotation`](Self::prepare_for_device_rotation).
    pub fn saved_anchors(&self) -> Anchors {
        self.anchors
    }

    /// Total rotation used for rendering and clipping.
    pub fn total_radians(&self) -> f64 {
        self.rotation.total_radians()
    }

    /// Region available for the image and crop box.
    pub fn content_bounds(&self) -> Rect {
        content_bounds(
            &self.view_bounds,
            self.config.padding,
            self.config.effective_dial_height(),
            self.orientation,
        )
    }

    // ----- Layout inputs -----

    /// Lay the view out for new bounds, rebuilding the crop box at its
    /// initial position for the current rotation.
    pub fn set_view_bounds(&mut self, view_bounds: Rect, orientation: Orientation) {
        self.view_bounds = view_bounds;
        self.orientation = orientation;
        self.layout_initial_frame();
    }

    /// Replace the image placement reported by the renderer.
    pub fn set_image_placement(&mut self, placement: ImagePlacement) {
        self.placement = placement;
    }

    /// Replace the scroll-surface state reported by the renderer.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
    }

    /// Back to the state right after construction: no rotation, initial crop
    /// box, full-image anchors.
    ///
    /// A forced ratio stays locked. Otherwise the lock returns to the
    /// configured default.
    pub fn reset(&mut self) {
        self.rotation.reset();
        if !self.rotation.is_forced() {
            self.aspect_lock = initial_lock(&self.config, self.image_size);
        }
        self.anchors = Anchors::default();
        self.viewport = ViewportState::default();
        self.gesture = None;
        self.pending_rotation = None;
        self.layout_initial_frame();
        self.set_status(SnapStatus::Initial);
    }

    // ----- Pointer gestures -----

    /// Start a gesture at `point`.
    ///
    /// Commits any 90° turn still animating, snapshots the crop box and picks
    /// the frame updater for the handle under the point.
    pub fn pointer_down(&mut self, point: Point) {
        if self.pending_rotation.is_some() {
            self.finish_rotate_90();
        }

        self.crop_box.snapshot();
        let frame = self.crop_box.frame;
        let edge = hit_test(point, &frame, self.config.hot_area_unit);

        if edge == Edge::None {
            self.gesture = None;
            tracing::debug!(?point, "gesture started on image");
            self.set_status(SnapStatus::TouchingImage);
            return;
        }

        let updater = FrameUpdater::for_gesture(
            self.aspect_lock.enabled,
            edge,
            frame,
            self.content_bounds(),
            self.config.minimum_aspect_ratio,
        );
        self.gesture = Some(Gesture {
            pan_origin: point,
            updater,
        });
        tracing::debug!(?point, ?edge, locked = self.aspect_lock.enabled, "crop handle gesture started");
        self.set_status(SnapStatus::TouchingCropHandle { edge });
    }

    /// Feed a pointer position into the active gesture.
    ///
    /// Returns the crop box after the move. Moves outside a handle gesture
    /// leave the box unchanged.
    pub fn pointer_move(&mut self, point: Point) -> Rect {
        let Some(gesture) = self.gesture else {
            return self.crop_box.frame;
        };

        let content = self.content_bounds();
        let point = Point::new(
            point.x.max(content.min_x() - self.config.padding),
            point.y.max(content.min_y() - self.config.padding),
        );
        let x_delta = (point.x - gesture.pan_origin.x).ceil();
        let y_delta = (point.y - gesture.pan_origin.y).ceil();

        let current = self.crop_box.frame;
        let candidate = gesture.updater.update(current, x_delta, y_delta);

        let resolver = BoundsResolver::new(content, self.config.minimum_box_size);
        let placement = self.placement;
        let radians = self.total_radians();
        let resolution = resolver.resolve(&current, &candidate, |rect: &Rect| {
            placement.contains_rect(rect, radians, ON_IMAGE_EPSILON)
        });

        self.crop_box.frame = resolution.frame_or(current);
        self.crop_box.frame
    }

    /// End the current gesture.
    ///
    /// Returns `true` when the crop box changed, in which case it has been
    /// zoomed back to fill the content bounds.
    pub fn pointer_up(&mut self) -> bool {
        let gesture = self.gesture.take();
        let changed = self.crop_box.needs_crop();
        if changed {
            let fit = self.fit_to_content();
            tracing::debug!(frame = ?fit.frame, zoom = fit.zoom, "crop box re-fitted after gesture");
        } else if gesture.is_some() {
            tracing::debug!("gesture ended without change");
        }
        self.set_status(SnapStatus::BetweenOperations);
        changed
    }

    /// Zoom the crop box and the image together so the box fills the content
    /// bounds again, keeping the cropped region.
    pub fn fit_to_content(&mut self) -> FitResult {
        let content = self.content_bounds();
        let frame = self.crop_box.frame;
        let radians = self.total_radians();

        if frame.is_empty() || content.is_empty() {
            return FitResult {
                frame,
                zoom: 1.0,
                scroll_size: frame.size().rotated_bounds(radians),
            };
        }

        let zoom = (content.width / frame.width).min(content.height / frame.height);
        let new_frame = Rect::inscribed(&content, frame.size());

        self.placement = self
            .placement
            .zoomed_about(frame.center(), zoom)
            .translated(new_frame.center() - frame.center());
        self.crop_box.reset_to(new_frame);
        self.ensure_image_covers_frame();

        let scroll_size = new_frame.size().rotated_bounds(radians);
        self.viewport.scale = self.placement.scale;
        self.viewport.scroll_bounds = Rect::from_origin_size(self.viewport.offset, scroll_size);
        self.viewport.manually_zoomed = true;

        FitResult {
            frame: new_frame,
            zoom,
            scroll_size,
        }
    }

    // ----- Rotation dial -----

    pub fn touch_rotation_dial(&mut self) {
        if !self.config.show_rotation_dial {
            tracing::trace!("rotation dial hidden, touch ignored");
            return;
        }
        self.gesture = None;
        self.set_status(SnapStatus::TouchingRotationDial);
    }

    /// Set the dial angle. In forced-ratio mode this is the absolute rotation.
    pub fn rotate_dial(&mut self, radians: f64) {
        if !radians.is_finite() {
            tracing::trace!(radians, "non-finite dial angle ignored");
            return;
        }
        let before = self.total_radians();
        self.rotation.set_continuous_radians(radians);
        let after = self.total_radians();

        let pivot = self.crop_box.frame.center();
        self.placement = self.placement.rotated_about(pivot, after - before);
        self.placement = self.placement.covering(&self.crop_box.frame, after);
        self.set_status(SnapStatus::Rotating { radians });
    }

    pub fn release_rotation_dial(&mut self) {
        self.set_status(SnapStatus::BetweenOperations);
    }

    // ----- 90° rotation -----

    /// Compute a quarter turn and enter `Degree90Rotating`.
    ///
    /// The geometry is committed by [`finish_rotate_90`](Self::finish_rotate_90)
    /// once the renderer has animated from `start_radians` to `end_radians`.
    pub fn begin_rotate_90(&mut self, direction: RotationDirection) -> Rotation90Plan {
        if self.pending_rotation.is_some() {
            self.finish_rotate_90();
        }
        self.gesture = None;

        let from_frame = self.crop_box.frame;
        let target_frame = if self.rotation.is_forced() {
            from_frame
        } else {
            Rect::inscribed(&self.content_bounds(), from_frame.size().swapped())
        };
        let plan = Rotation90Plan {
            direction,
            from_frame,
            target_frame,
            start_radians: self.total_radians(),
            end_radians: self.rotation.total_radians_after(direction),
            duration_secs: self.config.rotation_animation_secs,
        };

        tracing::debug!(?direction, forced = self.rotation.is_forced(), "90° rotation started");
        self.pending_rotation = Some(plan);
        self.set_status(SnapStatus::Degree90Rotating);
        if self.rotation.is_forced() {
            self.set_status(SnapStatus::Rotating {
                radians: plan.start_radians,
            });
        }
        plan
    }

    /// Commit the pending quarter turn. Does nothing when none is pending.
    pub fn finish_rotate_90(&mut self) {
        let Some(plan) = self.pending_rotation.take() else {
            return;
        };

        let delta = plan.end_radians - plan.start_radians;
        let pivot = plan.from_frame.center();
        let mut placement = self.placement.rotated_about(pivot, delta);

        if !self.rotation.is_forced() && !plan.from_frame.is_empty() {
            let zoom = plan.target_frame.width / plan.from_frame.height;
            placement = placement
                .translated(plan.target_frame.center() - pivot)
                .zoomed_about(plan.target_frame.center(), zoom);
        }

        self.rotation.rotate_90(plan.direction);
        self.crop_box.reset_to(plan.target_frame);
        self.placement = placement.covering(&plan.target_frame, self.total_radians());

        tracing::debug!(
            direction = ?plan.direction,
            quadrant = ?self.rotation.quadrant(),
            continuous_degrees = self.rotation.continuous_degrees(),
            "90° rotation finished"
        );
        if self.rotation.is_forced() {
            self.set_status(SnapStatus::Rotating {
                radians: self.rotation.continuous_radians(),
            });
        }
        self.set_status(SnapStatus::BetweenOperations);
    }

    // ----- Aspect ratio -----

    /// Lock the crop box to `ratio` (width / height) and lay it out again
    /// inside the initial box.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::InvalidAspectRatio`] unless `ratio` is finite and
    /// positive, and [`SnapError::ForcedAspectRatio`] when the configuration
    /// forces a ratio.
    pub fn set_fixed_ratio(&mut self, ratio: f64) -> Result<()> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(SnapError::InvalidAspectRatio(ratio));
        }
        if self.rotation.is_forced() {
            return Err(SnapError::ForcedAspectRatio(self.aspect_lock.ratio));
        }
        tracing::debug!(ratio, "fixed ratio set");
        self.aspect_lock = AspectRatioLock::locked(ratio);
        self.apply_fixed_ratio(self.initial_frame);
        self.set_status(SnapStatus::BetweenOperations);
        Ok(())
    }

    /// Let the user drag freely again. A forced ratio cannot be unlocked.
    pub fn unlock_aspect_ratio(&mut self) {
        if self.rotation.is_forced() {
            tracing::debug!("forced ratio cannot be unlocked");
            return;
        }
        tracing::debug!("aspect ratio unlocked");
        self.aspect_lock = AspectRatioLock::unlocked();
    }

    /// Swap the crop box ratio to height / width. A forced ratio stays as is.
    pub fn flip_crop_box_orientation(&mut self) {
        if self.rotation.is_forced() {
            tracing::debug!("forced ratio cannot be flipped");
            return;
        }
        let frame = self.crop_box.frame;
        if frame.is_empty() {
            return;
        }
        let ratio = frame.height / frame.width;
        tracing::debug!(ratio, "crop box orientation flipped");
        self.aspect_lock.ratio = ratio;
        self.apply_fixed_ratio(self.initial_frame);
        self.set_status(SnapStatus::BetweenOperations);
    }

    /// Image width / height as currently displayed (inverted when sideways).
    pub fn image_ratio(&self) -> f64 {
        let ratio = self.image_size.aspect_ratio();
        if self.rotation.is_up_or_upside_down() {
            ratio
        } else {
            1.0 / ratio
        }
    }

    /// Which ratio presets to offer for an image of the given unrotated shape.
    pub fn ratio_orientation(&self, image_is_horizontal: bool) -> RatioOrientation {
        if image_is_horizontal == self.rotation.is_up_or_upside_down() {
            RatioOrientation::Horizontal
        } else {
            RatioOrientation::Vertical
        }
    }

    // ----- Device rotation -----

    /// Save the crop box position relative to the image before the view
    /// bounds change.
    pub fn prepare_for_device_rotation(&mut self) {
        self.anchors = self.current_anchors();
        self.gesture = None;
        tracing::debug!(anchors = ?self.anchors, "anchors saved for device rotation");
        self.set_status(SnapStatus::Degree90Rotating);
    }

    /// Rebuild the crop box for new view bounds from the saved anchors.
    pub fn handle_device_rotation(&mut self, view_bounds: Rect, orientation: Orientation) {
        if self.pending_rotation.is_some() {
            self.finish_rotate_90();
        }
        self.view_bounds = view_bounds;
        self.orientation = orientation;
        self.layout_initial_frame();

        let radians = self.total_radians();
        let top_left = self.placement.denormalized(self.anchors.top_left, radians);
        let bottom_right = self.placement.denormalized(self.anchors.bottom_right, radians);
        let rebuilt = Rect::from_points(top_left, bottom_right);
        if !rebuilt.is_empty() && rebuilt.is_finite() {
            self.crop_box.reset_to(rebuilt);
            self.fit_to_content();
        }

        tracing::debug!(?orientation, frame = ?self.crop_box.frame, "crop box rebuilt after device rotation");
        self.set_status(SnapStatus::BetweenOperations);
    }

    // ----- Queries -----

    /// Whether anything differs from the freshly reset state.
    pub fn is_resettable(&self) -> bool {
        self.total_radians().abs() > RESETTABLE_EPSILON
            || !self.current_anchors().is_full_image(RESETTABLE_EPSILON)
    }

    /// Whether the crop box changed since the current gesture started.
    pub fn needs_crop(&self) -> bool {
        self.crop_box.needs_crop()
    }

    /// Crop box corners in normalized image coordinates.
    pub fn current_anchors(&self) -> Anchors {
        if self.placement.size.is_empty() || self.placement.scale <= 0.0 {
            return self.anchors;
        }
        let frame = self.crop_box.frame;
        let radians = self.total_radians();
        Anchors {
            top_left: self.placement.normalized(frame.origin(), radians),
            bottom_right: self
                .placement
                .normalized(Point::new(frame.max_x(), frame.max_y()), radians),
        }
    }

    // ----- Records -----

    /// Everything the pixel clip needs for the current crop.
    pub fn snap_info(&self) -> ImageSnapInfo {
        let frame = self.crop_box.frame;
        ImageSnapInfo {
            translation: self.placement.center - frame.center(),
            rotation: self.total_radians(),
            scale: self.placement.scale,
            snap_size: frame.size(),
            source_size: self.placement.size,
        }
    }

    /// Serializable snapshot of the interactive state.
    ///
    /// The scroll surface is modeled as the crop box's rotated bounding box,
    /// centered on the crop box and scrolled by `offset`.
    pub fn transformation(&self) -> Transformation {
        let frame = self.crop_box.frame;
        let radians = self.total_radians();
        let scroll_size = frame.size().rotated_bounds(radians);
        let local = (self.placement.center - frame.center()).rotated(-radians);
        let displayed = self.placement.displayed_size();
        let offset = Point::new(
            displayed.width / 2.0 - scroll_size.width / 2.0 - local.x,
            displayed.height / 2.0 - scroll_size.height / 2.0 - local.y,
        );

        Transformation {
            offset,
            rotation: radians,
            scale: self.placement.scale,
            manually_zoomed: self.viewport.manually_zoomed,
            initial_mask_frame: self.initial_frame,
            mask_frame: frame,
            scroll_bounds: Rect::from_origin_size(offset, scroll_size),
        }
    }

    /// Restore a state captured by [`transformation`](Self::transformation).
    ///
    /// A zero `mask_frame` keeps the current crop box; a zero `scroll_bounds`
    /// derives the scroll surface from the crop box.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::InvalidTransformation`] for non-finite values or a
    /// non-positive scale.
    pub fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        transformation.validate()?;

        let radians = transformation.rotation;
        let continuous = if self.rotation.is_forced() {
            radians
        } else {
            radians - self.rotation.quadrant().radians()
        };
        self.rotation.set_continuous_radians(continuous);
        self.set_status(SnapStatus::Rotating {
            radians: self.rotation.continuous_radians(),
        });

        if transformation.mask_frame != Rect::ZERO {
            self.crop_box.reset_to(transformation.mask_frame);
        }
        let frame = self.crop_box.frame;

        let scroll_size = if transformation.scroll_bounds != Rect::ZERO {
            transformation.scroll_bounds.size()
        } else {
            frame.size().rotated_bounds(radians)
        };

        let mut placement = self.placement;
        placement.scale = transformation.scale;
        let displayed = placement.displayed_size();
        let local = Point::new(
            displayed.width / 2.0 - scroll_size.width / 2.0 - transformation.offset.x,
            displayed.height / 2.0 - scroll_size.height / 2.0 - transformation.offset.y,
        );
        placement.center = frame.center() + local.rotated(radians);
        self.placement = placement;

        self.viewport = ViewportState {
            offset: transformation.offset,
            scale: transformation.scale,
            scroll_bounds: Rect::from_origin_size(transformation.offset, scroll_size),
            manually_zoomed: transformation.manually_zoomed,
        };

        tracing::debug!(rotation = radians, scale = transformation.scale, "transformation applied");
        self.set_status(SnapStatus::BetweenOperations);
        Ok(())
    }

    /// Crop to a region given in normalized image coordinates (0..1).
    ///
    /// Returns the transformation that was applied.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::InvalidTransformation`] for a non-finite or empty
    /// region.
    pub fn apply_normalized_preset(&mut self, normalized: Rect) -> Result<Transformation> {
        if !normalized.is_finite() || normalized.is_empty() {
            return Err(SnapError::InvalidTransformation(format!(
                "normalized region must be finite and non-empty, got {}x{}",
                normalized.width, normalized.height
            )));
        }

        let frame = self.crop_box.frame;
        let scale = (1.0 / normalized.width).min(1.0 / normalized.height);
        let offset = Point::new(
            frame.width * normalized.x * scale,
            frame.height * normalized.y * scale,
        );

        let mut mask_frame = frame;
        if normalized.width > normalized.height {
            mask_frame.height = normalized.height * frame.height / normalized.width;
            mask_frame.y += (frame.height - mask_frame.height) / 2.0;
        } else if normalized.width < normalized.height {
            mask_frame.width = normalized.width * frame.width / normalized.height;
            mask_frame.x += (frame.width - mask_frame.width) / 2.0;
        }

        let transformation = Transformation {
            offset,
            rotation: 0.0,
            scale,
            manually_zoomed: scale != 1.0,
            initial_mask_frame: Rect::ZERO,
            mask_frame,
            scroll_bounds: Rect::ZERO,
        };
        self.apply_transformation(&transformation)?;
        Ok(transformation)
    }

    // ----- Internals -----

    fn set_status(&mut self, status: SnapStatus) {
        tracing::trace!(from = ?self.status, to = ?status, "status transition");
        self.status = status;
        if let Some(observer) = self.observer.as_mut() {
            observer.status_changed(&status);
        }
    }

    /// Crop box inscribing the image (turned by the current quarter turns)
    /// into the content bounds.
    fn initial_crop_rect(&self) -> Rect {
        let inside = if self.rotation.is_up_or_upside_down() {
            self.image_size
        } else {
            self.image_size.swapped()
        };
        Rect::inscribed(&self.content_bounds(), inside)
    }

    /// Put the crop box at its initial rect with the image filling it, then
    /// apply the current rotation and fixed ratio.
    fn layout_initial_frame(&mut self) {
        let frame = self.initial_crop_rect();
        self.initial_frame = frame;
        self.crop_box.reset_to(frame);

        let size = if self.rotation.is_up_or_upside_down() {
            frame.size()
        } else {
            frame.size().swapped()
        };
        let placement = ImagePlacement::filling(&Rect::centered(frame.center(), size));
        self.placement = placement.covering(&frame, self.total_radians());

        if self.aspect_lock.enabled && self.aspect_lock.is_set() {
            self.apply_fixed_ratio(frame);
        }
    }

    /// Shape the crop box to the locked ratio inside `reference`, centered,
    /// then fit it to the content bounds.
    fn apply_fixed_ratio(&mut self, reference: Rect) {
        if !self.aspect_lock.is_set() || reference.is_empty() {
            return;
        }
        let ratio = self.aspect_lock.ratio;

        let mut size = reference.size();
        if ratio > self.image_ratio() {
            size.height = size.width / ratio;
        } else {
            size.width = size.height * ratio;
        }
        self.crop_box.reset_to(Rect::centered(reference.center(), size));
        self.fit_to_content();
    }

    fn ensure_image_covers_frame(&mut self) {
        let frame = self.crop_box.frame;
        let radians = self.total_radians();
        if !self
            .placement
            .contains_rect(&frame, radians, self.config.containment_tolerance)
        {
            self.placement = self.placement.covering(&frame, radians);
        }
    }
}

fn initial_lock(config: &SnapConfig, image_size: Size) -> AspectRatioLock {
    match config.fixed_ratio {
        FixedRatioMode::Free => AspectRatioLock::unlocked(),
        FixedRatioMode::Forced(ratio) if ratio == 0.0 => {
            AspectRatioLock::locked(image_size.aspect_ratio())
        }
        FixedRatioMode::Forced(ratio) => AspectRatioLock::locked(ratio),
        FixedRatioMode::Default(ratio) if ratio > 0.0 => AspectRatioLock::locked(ratio),
        FixedRatioMode::Default(_) => AspectRatioLock::unlocked(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Quadrant;
    use std::cell::RefCell;
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::rc::Rc;

    const EPS: f64 = 1e-6;

    fn view() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 800.0)
    }

    /// 800x600 image in a 400x800 portrait view.
    ///
    /// Content bounds: (14, 14, 372, 712). Initial crop box: (14, 230.5, 372, 279).
    fn controller_with(config: SnapConfig) -> SnapController {
        let mut controller = SnapController::new(config, Size::new(800.0, 600.0)).unwrap();
        controller.set_view_bounds(view(), Orientation::Portrait);
        controller
    }

    fn controller() -> SnapController {
        controller_with(SnapConfig::default())
    }

    fn recorded(controller: &mut SnapController) -> Rc<RefCell<Vec<SnapStatus>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        controller.set_observer(move |status: &SnapStatus| sink.borrow_mut().push(*status));
        log
    }

    fn assert_rect_eq(actual: Rect, expected: Rect) {
        assert!(
            (actual.x - expected.x).abs() < EPS
                && (actual.y - expected.y).abs() < EPS
                && (actual.width - expected.width).abs() < EPS
                && (actual.height - expected.height).abs() < EPS,
            "{actual:?} != {expected:?}"
        );
    }

    fn image_covers_frame(controller: &SnapController) -> bool {
        controller
            .placement()
            .contains_rect(&controller.frame(), controller.total_radians(), EPS)
    }

    #[test]
    fn test_new_rejects_empty_image() {
        let result = SnapController::new(SnapConfig::default(), Size::new(0.0, 10.0));
        assert!(matches!(result, Err(SnapError::EmptyImage { .. })));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SnapConfig {
            padding: -1.0,
            ..SnapConfig::default()
        };
        let result = SnapController::new(config, Size::new(10.0, 10.0));
        assert!(matches!(result, Err(SnapError::InvalidConfig(_))));
    }

    #[test]
    fn test_initial_layout() {
        let controller = controller();
        assert_rect_eq(controller.content_bounds(), Rect::new(14.0, 14.0, 372.0, 712.0));
        assert_rect_eq(controller.frame(), Rect::new(14.0, 230.5, 372.0, 279.0));
        assert_eq!(controller.status(), SnapStatus::Initial);
        assert!(!controller.needs_crop());
        assert!(!controller.is_resettable());
        assert!(image_covers_frame(&controller));
    }

    #[test]
    fn test_pointer_down_on_handle() {
        let mut controller = controller();
        let log = recorded(&mut controller);

        controller.pointer_down(Point::new(386.0, 370.0));
        assert_eq!(
            controller.status(),
            SnapStatus::TouchingCropHandle { edge: Edge::Right }
        );
        assert_eq!(
            *log.borrow(),
            vec![SnapStatus::TouchingCropHandle { edge: Edge::Right }]
        );
    }

    #[test]
    fn test_pointer_down_inside_touches_image() {
        let mut controller = controller();
        controller.pointer_down(Point::new(200.0, 370.0));
        assert_eq!(controller.status(), SnapStatus::TouchingImage);

        let before = controller.frame();
        assert_eq!(controller.pointer_move(Point::new(100.0, 300.0)), before);
        assert!(!controller.pointer_up());
        assert_eq!(controller.status(), SnapStatus::BetweenOperations);
    }

    #[test]
    fn test_right_edge_drag_inward() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        let frame = controller.pointer_move(Point::new(286.0, 370.0));
        assert_rect_eq(frame, Rect::new(14.0, 230.5, 272.0, 279.0));
        assert!(controller.needs_crop());
    }

    #[test]
    fn test_moves_recompute_from_snapshot() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(300.0, 370.0));
        let first = controller.pointer_move(Point::new(286.0, 370.0));
        controller.pointer_move(Point::new(330.0, 370.0));
        let again = controller.pointer_move(Point::new(286.0, 370.0));
        assert_eq!(first, again);
        assert_rect_eq(
            controller.crop_box().origin_frame(),
            Rect::new(14.0, 230.5, 372.0, 279.0),
        );
    }

    #[test]
    fn test_drag_past_content_bounds_is_rejected() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        let frame = controller.pointer_move(Point::new(396.0, 370.0));
        assert_rect_eq(frame, Rect::new(14.0, 230.5, 372.0, 279.0));
    }

    #[test]
    fn test_drag_past_image_is_corrected() {
        let mut controller = controller();
        // Bottom edge of the box sits on the bottom of the image
        controller.pointer_down(Point::new(200.0, 509.5));
        assert_eq!(
            controller.status(),
            SnapStatus::TouchingCropHandle { edge: Edge::Bottom }
        );
        let frame = controller.pointer_move(Point::new(200.0, 559.5));
        assert_rect_eq(frame, Rect::new(14.0, 230.5, 372.0, 279.0));
    }

    #[test]
    fn test_drag_below_minimum_size_is_rejected() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(300.0, 370.0));
        let kept = controller.frame();
        let frame = controller.pointer_move(Point::new(40.0, 370.0));
        assert_eq!(frame, kept);
    }

    #[test]
    fn test_pointer_up_fits_to_content() {
        let mut controller = controller();
        let log = recorded(&mut controller);
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(286.0, 370.0));

        assert!(controller.pointer_up());
        let frame = controller.frame();
        let zoom = 372.0 / 272.0;
        assert!((frame.width - 372.0).abs() < EPS);
        assert!((frame.height - 279.0 * zoom).abs() < EPS);
        assert!((frame.center().x - 200.0).abs() < EPS);
        assert!((frame.center().y - 370.0).abs() < EPS);
        assert!((controller.placement().scale - zoom).abs() < EPS);
        assert!(controller.viewport().manually_zoomed);
        assert!(image_covers_frame(&controller));
        assert!(controller.is_resettable());
        assert_eq!(
            log.borrow().last().copied(),
            Some(SnapStatus::BetweenOperations)
        );
    }

    #[test]
    fn test_fit_keeps_cropped_region() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(286.0, 370.0));
        let before = controller.current_anchors();
        controller.pointer_up();
        let after = controller.current_anchors();
        assert!(before.top_left.approx_eq(after.top_left, EPS));
        assert!(before.bottom_right.approx_eq(after.bottom_right, EPS));
    }

    #[test]
    fn test_dial_keeps_cropped_region() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(286.0, 370.0));
        controller.pointer_up();
        let before = controller.current_anchors();

        controller.touch_rotation_dial();
        controller.rotate_dial(0.01);
        controller.release_rotation_dial();

        let after = controller.current_anchors();
        assert!(image_covers_frame(&controller));
        assert!(before.top_left.approx_eq(after.top_left, 0.02));
        assert!(before.bottom_right.approx_eq(after.bottom_right, 0.02));
    }

    #[test]
    fn test_dial_round_trip_keeps_crop_center() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(286.0, 370.0));
        controller.pointer_up();
        let center = |c: &SnapController| {
            let anchors = c.current_anchors();
            Point::new(
                (anchors.top_left.x + anchors.bottom_right.x) / 2.0,
                (anchors.top_left.y + anchors.bottom_right.y) / 2.0,
            )
        };
        let before = center(&controller);

        controller.rotate_dial(0.2);
        controller.rotate_dial(-0.2);
        controller.rotate_dial(0.0);

        assert!(image_covers_frame(&controller));
        assert!(center(&controller).approx_eq(before, 0.05));
    }

    #[test]
    fn test_locked_gesture_keeps_ratio() {
        let mut controller = controller();
        controller.set_fixed_ratio(1.0).unwrap();
        let frame = controller.frame();
        assert!((frame.width / frame.height - 1.0).abs() < EPS);

        controller.pointer_down(Point::new(frame.max_x(), frame.max_y()));
        assert_eq!(
            controller.status(),
            SnapStatus::TouchingCropHandle {
                edge: Edge::BottomRight
            }
        );
        let moved = controller.pointer_move(Point::new(frame.max_x() - 60.0, frame.max_y() - 60.0));
        assert!((moved.width / moved.height - 1.0).abs() < EPS);
        assert_eq!(moved.origin(), frame.origin());
    }

    #[test]
    fn test_dial_rotation() {
        let mut controller = controller();
        let log = recorded(&mut controller);

        controller.touch_rotation_dial();
        controller.rotate_dial(0.1);
        controller.release_rotation_dial();

        assert_eq!(
            *log.borrow(),
            vec![
                SnapStatus::TouchingRotationDial,
                SnapStatus::Rotating { radians: 0.1 },
                SnapStatus::BetweenOperations,
            ]
        );
        assert!((controller.total_radians() - 0.1).abs() < EPS);
        assert!(controller.placement().scale > 1.0);
        assert!(image_covers_frame(&controller));
        assert!(controller.is_resettable());
    }

    #[test]
    fn test_hidden_dial_ignores_touch() {
        let config = SnapConfig {
            show_rotation_dial: false,
            ..SnapConfig::default()
        };
        let mut controller = controller_with(config);
        controller.touch_rotation_dial();
        assert_eq!(controller.status(), SnapStatus::Initial);
        // No dial space reserved
        assert_rect_eq(controller.content_bounds(), Rect::new(14.0, 14.0, 372.0, 772.0));
    }

    #[test]
    fn test_rotate_90_free() {
        let mut controller = controller();
        let log = recorded(&mut controller);

        let plan = controller.begin_rotate_90(RotationDirection::Clockwise);
        assert_eq!(controller.status(), SnapStatus::Degree90Rotating);
        assert_rect_eq(plan.target_frame, Rect::new(14.0, 122.0, 372.0, 496.0));
        assert!((plan.start_radians - 0.0).abs() < EPS);
        assert!((plan.end_radians + 3.0 * FRAC_PI_2).abs() < EPS);
        assert!((plan.duration_secs - 0.25).abs() < EPS);

        controller.finish_rotate_90();
        assert_eq!(controller.rotation().quadrant(), Quadrant::CounterClockwise270);
        assert_rect_eq(controller.frame(), plan.target_frame);
        assert!((controller.placement().scale - 372.0 / 279.0).abs() < EPS);
        assert!(image_covers_frame(&controller));
        assert!(controller.pending_rotation().is_none());
        assert_eq!(
            *log.borrow(),
            vec![SnapStatus::Degree90Rotating, SnapStatus::BetweenOperations]
        );
    }

    #[test]
    fn test_rotate_90_four_times_returns_upright() {
        let mut controller = controller();
        for _ in 0..4 {
            controller.begin_rotate_90(RotationDirection::Counterclockwise);
            controller.finish_rotate_90();
        }
        assert_eq!(controller.rotation().quadrant(), Quadrant::None);
        assert!(controller.total_radians().abs() < EPS);
        let frame = controller.frame();
        assert!((frame.width / frame.height - 372.0 / 279.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_90_forced_folds_into_dial() {
        let config = SnapConfig {
            fixed_ratio: FixedRatioMode::Forced(1.0),
            ..SnapConfig::default()
        };
        let mut controller = controller_with(config);
        controller.rotate_dial(10f64.to_radians());
        let log = recorded(&mut controller);

        let plan = controller.begin_rotate_90(RotationDirection::Clockwise);
        assert_eq!(plan.target_frame, plan.from_frame);
        controller.finish_rotate_90();

        let rotation = controller.rotation();
        assert!((rotation.continuous_degrees() + 80.0).abs() < EPS);
        assert_eq!(rotation.quadrant(), Quadrant::None);
        assert!(image_covers_frame(&controller));
        assert_eq!(log.borrow().first(), Some(&SnapStatus::Degree90Rotating));
        assert_eq!(log.borrow().last(), Some(&SnapStatus::BetweenOperations));
    }

    #[test]
    fn test_pointer_down_commits_pending_rotation() {
        let mut controller = controller();
        let plan = controller.begin_rotate_90(RotationDirection::Clockwise);
        controller.pointer_down(Point::new(200.0, 370.0));
        assert!(controller.pending_rotation().is_none());
        assert_rect_eq(controller.frame(), plan.target_frame);
        assert_eq!(controller.status(), SnapStatus::TouchingImage);
    }

    #[test]
    fn test_forced_ratio_layout() {
        let config = SnapConfig {
            fixed_ratio: FixedRatioMode::Forced(1.0),
            ..SnapConfig::default()
        };
        let mut controller = controller_with(config);
        assert_rect_eq(controller.frame(), Rect::new(14.0, 184.0, 372.0, 372.0));
        assert!(image_covers_frame(&controller));

        controller.unlock_aspect_ratio();
        assert!(controller.aspect_lock().enabled);
    }

    #[test]
    fn test_forced_ratio_rejects_new_ratio() {
        let config = SnapConfig {
            fixed_ratio: FixedRatioMode::Forced(1.0),
            ..SnapConfig::default()
        };
        let mut controller = controller_with(config);
        let frame = controller.frame();

        assert_eq!(
            controller.set_fixed_ratio(2.0),
            Err(SnapError::ForcedAspectRatio(1.0))
        );
        assert_eq!(controller.aspect_lock(), AspectRatioLock::locked(1.0));
        assert_rect_eq(controller.frame(), frame);
    }

    #[test]
    fn test_forced_ratio_ignores_flip() {
        let config = SnapConfig {
            fixed_ratio: FixedRatioMode::Forced(2.0),
            ..SnapConfig::default()
        };
        let mut controller = controller_with(config);
        let log = recorded(&mut controller);
        let frame = controller.frame();

        controller.flip_crop_box_orientation();
        assert_rect_eq(controller.frame(), frame);
        assert!((controller.aspect_lock().ratio - 2.0).abs() < EPS);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_forced_zero_ratio_uses_image_ratio() {
        let config = SnapConfig {
            fixed_ratio: FixedRatioMode::Forced(0.0),
            ..SnapConfig::default()
        };
        let controller = controller_with(config);
        assert!((controller.aspect_lock().ratio - 800.0 / 600.0).abs() < EPS);
    }

    #[test]
    fn test_set_fixed_ratio_rejects_invalid() {
        let mut controller = controller();
        assert_eq!(
            controller.set_fixed_ratio(0.0),
            Err(SnapError::InvalidAspectRatio(0.0))
        );
        assert!(controller.set_fixed_ratio(f64::NAN).is_err());
        assert!(!controller.aspect_lock().enabled);
    }

    #[test]
    fn test_set_fixed_ratio_wide() {
        let mut controller = controller();
        controller.set_fixed_ratio(2.0).unwrap();
        assert!(controller.aspect_lock().enabled);
        assert_rect_eq(controller.frame(), Rect::new(14.0, 277.0, 372.0, 186.0));
        assert_eq!(controller.status(), SnapStatus::BetweenOperations);
        assert!(image_covers_frame(&controller));
    }

    #[test]
    fn test_flip_crop_box_orientation() {
        let mut controller = controller();
        controller.set_fixed_ratio(2.0).unwrap();
        controller.flip_crop_box_orientation();

        let frame = controller.frame();
        assert!((controller.aspect_lock().ratio - 0.5).abs() < EPS);
        assert!((frame.width / frame.height - 0.5).abs() < EPS);
        assert!(controller.content_bounds().contains_rect(&frame.inset_by(EPS, EPS)));
        assert!(image_covers_frame(&controller));
    }

    #[test]
    fn test_unlock_aspect_ratio() {
        let mut controller = controller();
        controller.set_fixed_ratio(1.0).unwrap();
        controller.unlock_aspect_ratio();
        assert_eq!(controller.aspect_lock(), AspectRatioLock::unlocked());
    }

    #[test]
    fn test_default_ratio_mode_starts_locked() {
        let config = SnapConfig {
            fixed_ratio: FixedRatioMode::Default(1.0),
            ..SnapConfig::default()
        };
        let mut controller = controller_with(config);
        assert!(controller.aspect_lock().enabled);
        controller.unlock_aspect_ratio();
        assert!(!controller.aspect_lock().enabled);
        controller.reset();
        assert!(controller.aspect_lock().enabled);
    }

    #[test]
    fn test_reset() {
        let mut controller = controller();
        controller.rotate_dial(0.3);
        controller.begin_rotate_90(RotationDirection::Clockwise);
        controller.finish_rotate_90();
        controller.set_fixed_ratio(1.5).unwrap();
        let log = recorded(&mut controller);

        controller.reset();
        assert_eq!(controller.rotation().quadrant(), Quadrant::None);
        assert_eq!(controller.total_radians(), 0.0);
        assert!(!controller.aspect_lock().enabled);
        assert_rect_eq(controller.frame(), Rect::new(14.0, 230.5, 372.0, 279.0));
        assert!(!controller.is_resettable());
        assert_eq!(*log.borrow(), vec![SnapStatus::Initial]);
    }

    #[test]
    fn test_image_ratio_and_orientation() {
        let mut controller = controller();
        assert!((controller.image_ratio() - 800.0 / 600.0).abs() < EPS);
        assert_eq!(controller.ratio_orientation(true), RatioOrientation::Horizontal);
        assert_eq!(controller.ratio_orientation(false), RatioOrientation::Vertical);

        controller.begin_rotate_90(RotationDirection::Counterclockwise);
        controller.finish_rotate_90();
        assert!((controller.image_ratio() - 600.0 / 800.0).abs() < EPS);
        assert_eq!(controller.ratio_orientation(true), RatioOrientation::Vertical);
    }

    #[test]
    fn test_snap_info_initial() {
        let controller = controller();
        let info = controller.snap_info();
        assert!(info.translation.approx_eq(Point::ZERO, EPS));
        assert_eq!(info.rotation, 0.0);
        assert_eq!(info.scale, 1.0);
        assert!((info.snap_size.width - 372.0).abs() < EPS);
        assert!((info.snap_size.height - 279.0).abs() < EPS);
        assert!((info.source_size.width - 372.0).abs() < EPS);
        assert!((info.source_size.height - 279.0).abs() < EPS);
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_snap_info_after_crop() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(286.0, 370.0));
        let info = controller.snap_info();
        // Image center stays at 200, box center moved to 150
        assert!(info.translation.approx_eq(Point::new(50.0, 0.0), EPS));
        assert!((info.snap_size.width - 272.0).abs() < EPS);
        assert!((info.snap_size.height - 279.0).abs() < EPS);
    }

    #[test]
    fn test_transformation_round_trip() {
        let mut controller = controller();
        controller.rotate_dial(0.2);
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(336.0, 370.0));
        controller.pointer_up();

        let transformation = controller.transformation();
        let placement = controller.placement();
        let frame = controller.frame();

        controller.reset();
        controller.apply_transformation(&transformation).unwrap();

        assert!((controller.total_radians() - 0.2).abs() < EPS);
        assert_rect_eq(controller.frame(), frame);
        assert!(controller.placement().center.approx_eq(placement.center, EPS));
        assert!((controller.placement().scale - placement.scale).abs() < EPS);
        assert_eq!(controller.status(), SnapStatus::BetweenOperations);
    }

    #[test]
    fn test_transformation_rotation_in_free_mode_keeps_quadrant() {
        let mut controller = controller();
        controller.begin_rotate_90(RotationDirection::Counterclockwise);
        controller.finish_rotate_90();
        controller.rotate_dial(0.1);
        let transformation = controller.transformation();

        controller.apply_transformation(&transformation).unwrap();
        assert!((controller.rotation().continuous_radians() - 0.1).abs() < EPS);
        assert_eq!(controller.rotation().quadrant(), Quadrant::CounterClockwise90);
    }

    #[test]
    fn test_apply_transformation_rejects_invalid() {
        let mut controller = controller();
        let mut transformation = controller.transformation();
        transformation.scale = 0.0;
        assert!(matches!(
            controller.apply_transformation(&transformation),
            Err(SnapError::InvalidTransformation(_))
        ));
    }

    #[test]
    fn test_normalized_preset_full_image() {
        let mut controller = controller();
        let transformation = controller
            .apply_normalized_preset(Rect::new(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        assert_eq!(transformation.scale, 1.0);
        assert!(!transformation.manually_zoomed);
        assert!(controller
            .placement()
            .center
            .approx_eq(controller.frame().center(), EPS));
        assert!(!controller.is_resettable());
    }

    #[test]
    fn test_normalized_preset_right_half() {
        let mut controller = controller();
        let frame = controller.frame();
        controller
            .apply_normalized_preset(Rect::new(0.5, 0.0, 0.5, 1.0))
            .unwrap();

        let anchors = controller.current_anchors();
        assert!(anchors.top_left.approx_eq(Point::new(0.5, 0.0), EPS));
        assert!(anchors.bottom_right.approx_eq(Point::new(1.0, 1.0), EPS));
        assert!((controller.frame().width - frame.width / 2.0).abs() < EPS);
    }

    #[test]
    fn test_normalized_preset_rejects_empty() {
        let mut controller = controller();
        assert!(controller
            .apply_normalized_preset(Rect::new(0.0, 0.0, 0.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_device_rotation_keeps_anchors() {
        let mut controller = controller();
        controller.pointer_down(Point::new(386.0, 370.0));
        controller.pointer_move(Point::new(286.0, 370.0));
        controller.pointer_up();
        let log = recorded(&mut controller);

        controller.prepare_for_device_rotation();
        let saved = controller.saved_anchors();
        assert_eq!(controller.status(), SnapStatus::Degree90Rotating);

        controller.handle_device_rotation(
            Rect::new(0.0, 0.0, 800.0, 400.0),
            Orientation::LandscapeLeft,
        );
        let anchors = controller.current_anchors();
        assert!(anchors.top_left.approx_eq(saved.top_left, EPS));
        assert!(anchors.bottom_right.approx_eq(saved.bottom_right, EPS));
        assert!(controller.content_bounds().contains_rect(&controller.frame().inset_by(EPS, EPS)));
        assert!(image_covers_frame(&controller));
        assert_eq!(
            *log.borrow(),
            vec![SnapStatus::Degree90Rotating, SnapStatus::BetweenOperations]
        );
    }

    #[test]
    fn test_upside_down_is_resettable() {
        let mut controller = controller();
        controller.begin_rotate_90(RotationDirection::Clockwise);
        controller.finish_rotate_90();
        controller.begin_rotate_90(RotationDirection::Clockwise);
        controller.finish_rotate_90();
        assert!((controller.total_radians().abs() - PI).abs() < EPS);
        assert!(controller.is_resettable());
    }

    #[test]
    fn test_debug_omits_observer() {
        let mut controller = controller();
        controller.set_observer(|_: &SnapStatus| {});
        let text = format!("{controller:?}");
        assert!(text.contains("has_observer: true"));
    }
}
