//! Interaction phases and the observer that renders them.

use serde::{Deserialize, Serialize};

use crate::hit_test::Edge;

/// Current phase of user interaction.
///
/// `Initial` is entered at construction and on reset only. Every completed
/// operation ends in `BetweenOperations`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SnapStatus {
    #[default]
    Initial,
    /// Dial rotation in progress, carrying the dial angle in radians
    Rotating { radians: f64 },
    /// A 90° rotation (or device rotation) is animating
    Degree90Rotating,
    TouchingImage,
    TouchingRotationDial,
    TouchingCropHandle { edge: Edge },
    BetweenOperations,
}

impl SnapStatus {
    /// Whether a pointer is currently down on the crop view.
    pub fn is_touching(&self) -> bool {
        matches!(
            self,
            SnapStatus::TouchingImage
                | SnapStatus::TouchingRotationDial
                | SnapStatus::TouchingCropHandle { .. }
        )
    }
}

/// Receives every status transition, synchronously.
pub trait SnapObserver {
    fn status_changed(&mut self, status: &SnapStatus);
}

impl<F> SnapObserver for F
where
    F: FnMut(&SnapStatus),
{
    fn status_changed(&mut self, status: &SnapStatus) {
        self(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_initial() {
        assert_eq!(SnapStatus::default(), SnapStatus::Initial);
    }

    #[test]
    fn test_is_touching() {
        assert!(SnapStatus::TouchingImage.is_touching());
        assert!(SnapStatus::TouchingCropHandle { edge: Edge::Left }.is_touching());
        assert!(!SnapStatus::BetweenOperations.is_touching());
        assert!(!SnapStatus::Rotating { radians: 0.1 }.is_touching());
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |status: &SnapStatus| seen.push(*status);
            observer.status_changed(&SnapStatus::TouchingImage);
            observer.status_changed(&SnapStatus::BetweenOperations);
        }
        assert_eq!(
            seen,
            vec![SnapStatus::TouchingImage, SnapStatus::BetweenOperations]
        );
    }
}
