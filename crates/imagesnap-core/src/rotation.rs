//! Rotation model: continuous dial rotation plus discrete quarter turns.
//!
//! In free mode the two components are kept apart and composed on demand:
//! `total = continuous + quadrant`. When the aspect ratio is permanently
//! forced there is a single absolute angle instead; each quarter turn is
//! folded into the continuous value when it completes and the quadrant stays
//! at [`Quadrant::None`].
//!
//! # Coordinate System
//!
//! - Angles are stored in degrees and reported in radians
//! - Positive angles turn clockwise on screen

use serde::{Deserialize, Serialize};

/// Discrete rotation accumulated from 90° actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Quadrant {
    #[default]
    None,
    CounterClockwise90,
    CounterClockwise180,
    CounterClockwise270,
}

impl Quadrant {
    /// Offset in degrees (0, -90, -180 or -270).
    pub fn degrees(self) -> f64 {
        match self {
            Quadrant::None => 0.0,
            Quadrant::CounterClockwise90 => -90.0,
            Quadrant::CounterClockwise180 => -180.0,
            Quadrant::CounterClockwise270 => -270.0,
        }
    }

    pub fn radians(self) -> f64 {
        self.degrees().to_radians()
    }

    /// none → -270 → -180 → -90 → none
    pub fn clockwise_rotate_90(self) -> Quadrant {
        match self {
            Quadrant::None => Quadrant::CounterClockwise270,
            Quadrant::CounterClockwise270 => Quadrant::CounterClockwise180,
            Quadrant::CounterClockwise180 => Quadrant::CounterClockwise90,
            Quadrant::CounterClockwise90 => Quadrant::None,
        }
    }

    /// none → -90 → -180 → -270 → none
    pub fn counterclockwise_rotate_90(self) -> Quadrant {
        match self {
            Quadrant::None => Quadrant::CounterClockwise90,
            Quadrant::CounterClockwise90 => Quadrant::CounterClockwise180,
            Quadrant::CounterClockwise180 => Quadrant::CounterClockwise270,
            Quadrant::CounterClockwise270 => Quadrant::None,
        }
    }

    /// Whether the image is upright or upside down (not sideways).
    pub fn is_up_or_upside_down(self) -> bool {
        matches!(self, Quadrant::None | Quadrant::CounterClockwise180)
    }
}

/// Direction of a 90° rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationDirection {
    Clockwise,
    Counterclockwise,
}

impl RotationDirection {
    /// Degrees added to the absolute angle when a quarter turn is folded.
    pub fn fold_degrees(self) -> f64 {
        match self {
            RotationDirection::Clockwise => -90.0,
            RotationDirection::Counterclockwise => 90.0,
        }
    }

    fn apply(self, quadrant: Quadrant) -> Quadrant {
        match self {
            RotationDirection::Clockwise => quadrant.clockwise_rotate_90(),
            RotationDirection::Counterclockwise => quadrant.counterclockwise_rotate_90(),
        }
    }
}

/// Continuous + discrete rotation of the image under the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationModel {
    continuous_degrees: f64,
    quadrant: Quadrant,
    forced: bool,
}

impl RotationModel {
    /// A model at zero rotation. `forced` selects the folded representation.
    pub fn new(forced: bool) -> Self {
        Self {
            continuous_degrees: 0.0,
            quadrant: Quadrant::None,
            forced,
        }
    }

    pub fn continuous_degrees(&self) -> f64 {
        self.continuous_degrees
    }

    pub fn continuous_radians(&self) -> f64 {
        self.continuous_degrees.to_radians()
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// Set the dial angle. In forced mode this is the absolute rotation.
    pub fn set_continuous_radians(&mut self, radians: f64) {
        self.continuous_degrees = radians.to_degrees();
    }

    /// Effective rotation used for rendering and clipping.
    pub fn total_radians(&self) -> f64 {
        if self.forced {
            self.continuous_radians()
        } else {
            self.continuous_radians() + self.quadrant.radians()
        }
    }

    /// Effective rotation in degrees, normalized to `[0, 360)`.
    pub fn total_degrees_normalized(&self) -> f64 {
        self.total_radians().to_degrees().rem_euclid(360.0)
    }

    /// Apply a completed quarter turn.
    pub fn rotate_90(&mut self, direction: RotationDirection) {
        if self.forced {
            self.continuous_degrees += direction.fold_degrees();
        } else {
            self.quadrant = direction.apply(self.quadrant);
        }
    }

    /// Total rotation after a quarter turn in `direction`, without applying it.
    pub fn total_radians_after(&self, direction: RotationDirection) -> f64 {
        let mut next = *self;
        next.rotate_90(direction);
        next.total_radians()
    }

    /// Whether the image is upright or upside down (not sideways).
    ///
    /// In forced mode the quarter turns live in the continuous angle, so the
    /// nearest multiple of 90° decides.
    pub fn is_up_or_upside_down(&self) -> bool {
        if self.forced {
            let quarters = (self.continuous_degrees / 90.0).round() as i64;
            quarters.rem_euclid(2) == 0
        } else {
            self.quadrant.is_up_or_upside_down()
        }
    }

    /// Back to zero rotation, keeping the mode.
    pub fn reset(&mut self) {
        self.continuous_degrees = 0.0;
        self.quadrant = Quadrant::None;
    }
}
