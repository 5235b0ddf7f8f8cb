//! Planar vector type
//!
//! An immutable 2D vector used for strafe demands, per-wheel target vectors
//! and field positions. Angles are given in compass degrees (see
//! [`crate::maths`]).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

// Internal
use crate::maths::wrap_degrees;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A vector in the cartesian plane, +X to the right and +Y forwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarVector(Vector2<f64>);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PlanarVector {
    /// The zero vector.
    pub fn zero() -> Self {
        Self(Vector2::zeros())
    }

    pub fn new(x: f64, y: f64) -> Self {
        Self(Vector2::new(x, y))
    }

    /// Build a vector from a compass angle in degrees and a magnitude.
    ///
    /// A negative magnitude produces a vector pointing in the opposite
    /// direction to `angle_deg`.
    pub fn from_polar(angle_deg: f64, magnitude: f64) -> Self {
        let angle_rad = angle_deg.to_radians();
        Self::new(magnitude * angle_rad.sin(), magnitude * angle_rad.cos())
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn scale(&self, s: f64) -> Self {
        Self(self.0 * s)
    }

    /// Reflect across the X axis, negating the Y component.
    pub fn reflect_across_x(&self) -> Self {
        Self::new(self.0.x, -self.0.y)
    }

    /// Reflect across the Y axis, negating the X component.
    pub fn reflect_across_y(&self) -> Self {
        Self::new(-self.0.x, self.0.y)
    }

    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// Compass angle of the vector in degrees, in the range [0, 360).
    ///
    /// The zero vector has an angle of 0.
    pub fn angle(&self) -> f64 {
        if self.magnitude() == 0.0 {
            return 0.0;
        }

        // atan2(x, y) measures clockwise from +Y, which is the compass angle
        wrap_degrees(self.0.x.atan2(self.0.y).to_degrees())
    }

    /// Return a vector with the same magnitude pointing at `angle_deg`.
    pub fn with_angle(&self, angle_deg: f64) -> Self {
        Self::from_polar(angle_deg, self.magnitude())
    }
}

impl Default for PlanarVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for PlanarVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for PlanarVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for PlanarVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::fmt::Display for PlanarVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) |{:.2}| @ {:.1} deg",
            self.0.x,
            self.0.y,
            self.magnitude(),
            self.angle()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::maths::{ang_dist_deg, degrees_to_radians};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_angle_quadrants() {
        assert_eq!(PlanarVector::new(0.0, 1.0).angle(), 0.0);
        assert_abs_diff_eq!(PlanarVector::new(1.0, 1.0).angle(), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(PlanarVector::new(1.0, -1.0).angle(), 135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(PlanarVector::new(-1.0, -1.0).angle(), 225.0, epsilon = 1e-9);
        assert_abs_diff_eq!(PlanarVector::new(-1.0, 1.0).angle(), 315.0, epsilon = 1e-9);
        assert_abs_diff_eq!(PlanarVector::new(0.0, -2.0).angle(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_vector_angle() {
        let v = PlanarVector::zero();
        assert_eq!(v.magnitude(), 0.0);
        assert_eq!(v.angle(), 0.0);
        assert!(!degrees_to_radians(v.angle()).is_nan());
    }

    #[test]
    fn test_from_polar_inverts_angle() {
        for &(angle, mag) in &[(0.0, 1.0), (30.0, 2.5), (135.0, 0.7), (300.0, 4.0)] {
            let v = PlanarVector::from_polar(angle, mag);
            assert_abs_diff_eq!(v.magnitude(), mag, epsilon = 1e-9);
            assert_abs_diff_eq!(ang_dist_deg(v.angle(), angle), 0.0, epsilon = 1e-9);
        }

        // Negative magnitude points the other way
        let v = PlanarVector::from_polar(90.0, -1.0);
        assert_abs_diff_eq!(v.x(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_algebra() {
        let a = PlanarVector::new(1.0, -2.0);
        let b = PlanarVector::new(0.5, 4.0);

        assert_eq!(a + b, PlanarVector::new(1.5, 2.0));
        assert_eq!(a - b, PlanarVector::new(0.5, -6.0));
        assert_eq!(a.scale(-2.0), PlanarVector::new(-2.0, 4.0));
        assert_eq!(a.reflect_across_x(), PlanarVector::new(1.0, 2.0));
        assert_eq!(a.reflect_across_y(), PlanarVector::new(-1.0, -2.0));
        assert_eq!(-a, PlanarVector::new(-1.0, 2.0));
        assert_abs_diff_eq!(PlanarVector::new(3.0, 4.0).magnitude(), 5.0);
    }
}
