//! Utility maths functions
//!
//! # Angle conventions
//!
//! Two conventions are used throughout the swerve software:
//!
//! - **Compass degrees**: zero points along the chassis (or field) +Y axis
//!   (forwards) and angles increase clockwise when viewed from above. All
//!   wheel directions and headings use this convention.
//! - **Maths radians**: zero points along the +X axis (right) and angles
//!   increase counter-clockwise.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of degrees in a full revolution.
pub const DEGREES_PER_REV: f64 = 360.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Apply polynomial coefficients to a value.
///
/// Coefficients are given highest power first, so `[a, b, c]` evaluates
/// `a*x^2 + b*x + c`.
pub fn poly_val<T>(value: &T, coeffs: &[T]) -> T
where
    T: Float + std::ops::AddAssign
{
    let mut res = T::zero();

    for (i, coeff) in coeffs.iter().enumerate() {
        res += value.powi((coeffs.len() - 1 - i) as i32) * *coeff;
    }

    res
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`. The wrapping functions in this module fold that
/// case back to zero.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in degrees into the range [0, 360).
///
/// Closed form, so arbitrarily large magnitudes take constant time.
pub fn wrap_degrees<T>(degrees: T) -> T
where
    T: Float
{
    wrap_to(degrees, deg_per_rev())
}

/// Wrap an angle in degrees into the range [-180, 180).
pub fn wrap_degrees_zero_centred<T>(degrees: T) -> T
where
    T: Float
{
    let half = deg_per_rev::<T>() / T::from(2.0).unwrap();
    wrap_degrees(degrees + half) - half
}

/// Wrap an angle in radians into the range [0, 2pi).
pub fn wrap_radians<T>(radians: T) -> T
where
    T: Float
{
    wrap_to(radians, T::from(std::f64::consts::TAU).unwrap())
}

/// Convert a compass angle in degrees into a maths angle in radians.
///
/// The result is wrapped into [0, 2pi).
pub fn degrees_to_radians<T>(degrees: T) -> T
where
    T: Float
{
    let quarter = deg_per_rev::<T>() / T::from(4.0).unwrap();
    wrap_radians((quarter - degrees).to_radians())
}

/// Convert a maths angle in radians into a compass angle in degrees.
///
/// The result is wrapped into [0, 360), so that
/// `radians_to_degrees(degrees_to_radians(d)) == wrap_degrees(d)`.
pub fn radians_to_degrees<T>(radians: T) -> T
where
    T: Float
{
    let quarter = deg_per_rev::<T>() / T::from(4.0).unwrap();
    wrap_degrees(quarter - radians.to_degrees())
}

/// Get the signed shortest angular distance from `from` to `to`, in degrees.
///
/// The result is in [-180, 180).
pub fn ang_dist_deg<T>(from: T, to: T) -> T
where
    T: Float
{
    wrap_degrees_zero_centred(to - from)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn deg_per_rev<T: Float>() -> T {
    T::from(DEGREES_PER_REV).unwrap()
}

fn wrap_to<T: Float>(value: T, period: T) -> T {
    let r = rem_euclid(value, period);
    if r >= period { T::zero() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0f64), 0f64);
        assert_eq!(wrap_degrees(360f64), 0f64);
        assert_eq!(wrap_degrees(-90f64), 270f64);
        assert_eq!(wrap_degrees(725f64), 5f64);
        assert_eq!(wrap_degrees(-1e-20f64), 0f64);

        // Large magnitudes must still land in range
        let w = wrap_degrees(1.0e12f64 + 12.5);
        assert!(w >= 0.0 && w < 360.0);

        for k in -5..=5 {
            let d = 47.25f64;
            assert_abs_diff_eq!(
                wrap_degrees(d + 360.0 * k as f64),
                wrap_degrees(d),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_wrap_degrees_zero_centred() {
        assert_eq!(wrap_degrees_zero_centred(180f64), -180f64);
        assert_eq!(wrap_degrees_zero_centred(-180f64), -180f64);
        assert_eq!(wrap_degrees_zero_centred(190f64), -170f64);
        assert_eq!(wrap_degrees_zero_centred(-190f64), 170f64);
        assert_eq!(wrap_degrees_zero_centred(90f64), 90f64);
        assert_eq!(wrap_degrees_zero_centred(-3600f64), 0f64);
    }

    #[test]
    fn test_degrees_radians_conventions() {
        const PI: f64 = std::f64::consts::PI;

        // Compass north is maths pi/2, compass east is maths 0
        assert_abs_diff_eq!(degrees_to_radians(0f64), PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(degrees_to_radians(90f64), 0f64, epsilon = 1e-12);
        assert_abs_diff_eq!(degrees_to_radians(180f64), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(radians_to_degrees(PI), 270f64, epsilon = 1e-12);
    }

    #[test]
    fn test_degrees_radians_round_trip() {
        let mut d = -1000.0f64;
        while d < 1000.0 {
            let back = radians_to_degrees(degrees_to_radians(d));
            assert!(back >= 0.0 && back < 360.0);
            assert_abs_diff_eq!(ang_dist_deg(back, wrap_degrees(d)), 0.0, epsilon = 1e-9);
            d += 13.7;
        }
    }

    #[test]
    fn test_ang_dist_deg() {
        assert_eq!(ang_dist_deg(10f64, 200f64), -170f64);
        assert_eq!(ang_dist_deg(350f64, 10f64), 20f64);
        assert_eq!(ang_dist_deg(10f64, 350f64), -20f64);
    }

    #[test]
    fn test_poly_val() {
        assert_eq!(poly_val(&2f64, &[1.0, 0.0, 3.0]), 7.0);
        assert_eq!(poly_val(&0.5f64, &[]), 0.0);
    }
}
