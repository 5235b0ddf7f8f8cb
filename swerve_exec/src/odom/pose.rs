//! Chassis pose on the field

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::{maths::wrap_degrees, vector::PlanarVector};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Location and heading of the chassis in the field frame.
///
/// Immutable, all operations return a new pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Units: inches
    location: PlanarVector,

    /// Clockwise from the field +Y axis.
    ///
    /// Units: degrees [0, 360)
    heading_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// New pose, the heading is wrapped into [0, 360).
    pub fn new(location: PlanarVector, heading_deg: f64) -> Self {
        Self {
            location,
            heading_deg: wrap_degrees(heading_deg),
        }
    }

    /// At the field origin facing +Y.
    pub fn origin() -> Self {
        Self::default()
    }

    pub fn location(&self) -> PlanarVector {
        self.location
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    /// Same location with a different heading.
    pub fn with_heading(&self, heading_deg: f64) -> Self {
        Self::new(self.location, heading_deg)
    }

    /// Pose after moving by `movement` and turning to `heading_deg`.
    pub fn moved_by(&self, movement: PlanarVector, heading_deg: f64) -> Self {
        Self::new(self.location + movement, heading_deg)
    }

    /// Vector from this pose's location to `other`'s.
    ///
    /// Units: inches
    pub fn movement_to(&self, other: &Pose) -> PlanarVector {
        other.location - self.location
    }

    /// Units: inches
    pub fn distance_from(&self, other: &Pose) -> f64 {
        self.movement_to(other).magnitude()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.location.x().is_finite()
            && self.location.y().is_finite()
            && self.heading_deg.is_finite()
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) in @ {:.1} deg",
            self.location.x(),
            self.location.y(),
            self.heading_deg
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_heading_wrapped() {
        assert_eq!(Pose::new(PlanarVector::zero(), -90.0).heading_deg(), 270.0);
        assert_eq!(Pose::origin().with_heading(720.0).heading_deg(), 0.0);
    }

    #[test]
    fn test_movement_between_poses() {
        let a = Pose::new(PlanarVector::new(1.0, 2.0), 0.0);
        let b = Pose::new(PlanarVector::new(4.0, 6.0), 90.0);

        assert_eq!(a.movement_to(&b), PlanarVector::new(3.0, 4.0));
        assert_abs_diff_eq!(a.distance_from(&b), 5.0);
        assert_abs_diff_eq!(b.distance_from(&a), 5.0);

        let c = a.moved_by(a.movement_to(&b), 450.0);
        assert_eq!(c, b);
    }
}
