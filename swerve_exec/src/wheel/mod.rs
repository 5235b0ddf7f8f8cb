//! Swerve wheel module
//!
//! # Wheel actuation
//!
//! A swerve wheel can steer to any direction and drive forwards or
//! backwards. [`SwerveWheel`] turns a desired (direction, speed) pair into a
//! steer target and drive demand on the wheel's hardware, always taking the
//! shortest path: if the target is more than 90 degrees away the wheel turns
//! to the opposite direction and drives in reverse instead.
//!
//! Hardware is provided through the [`WheelHw`] capability trait, so one
//! implementation exists per hardware binding (see `sim` for the simulated
//! one).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod hw;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
pub use hw::*;
use util::maths::{ang_dist_deg, wrap_degrees, DEGREES_PER_REV};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest steering change made before reversing the drive direction instead.
pub const MAX_STEER_CHANGE_DEG: f64 = 90.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single swerve wheel wrapping its hardware binding.
#[derive(Debug)]
pub struct SwerveWheel<H> {
    hw: H,
}

/// The demands issued to the hardware by one `steer_and_drive` call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct WheelOutput {
    /// Unbounded steer target in revolutions.
    ///
    /// Units: revolutions
    pub steer_target_revs: f64,

    /// Drive demand, negative when driving in reverse.
    ///
    /// Units: normalised [-1, 1]
    pub drive_speed: f64,

    /// True if the wheel was flipped to drive in reverse.
    pub reversed: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors from wheel actuation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WheelError {
    #[error("Wheel speed must be within [0, 1], found {0}")]
    InvalidSpeed(f64),

    #[error("Wheel direction must be within [0, 360), found {0}")]
    InvalidDirection(f64),

    #[error("Margin of error must be within (0, 360), found {0}")]
    InvalidMargin(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H: WheelHw> SwerveWheel<H> {
    pub fn new(hw: H) -> Self {
        Self { hw }
    }

    /// Steer towards `target_direction_deg` and drive at `speed`.
    ///
    /// `target_direction_deg` is a compass direction in [0, 360) relative to
    /// the chassis and `speed` is in [0, 1]. Invalid inputs are rejected
    /// without touching the hardware.
    pub fn steer_and_drive(
        &mut self,
        target_direction_deg: f64,
        speed: f64
    ) -> Result<WheelOutput, WheelError> {
        check_direction(target_direction_deg)?;
        if !(0.0..=1.0).contains(&speed) {
            return Err(WheelError::InvalidSpeed(speed));
        }

        let current_revs = self.hw.raw_steer_position();

        // Shortest path from the current wrapped direction
        let mut delta_deg = ang_dist_deg(wrap_degrees(current_revs * DEGREES_PER_REV), target_direction_deg);

        // Reverse the drive rather than turning more than a quarter turn
        let mut reversed = false;
        if delta_deg.abs() > MAX_STEER_CHANGE_DEG {
            reversed = true;
            delta_deg += if delta_deg > 0.0 { -180.0 } else { 180.0 };
            debug!("Wheel reversing to reach {:.1} deg", target_direction_deg);
        }

        // Apply the change to the unbounded position so the steer axis never
        // unwinds through a full revolution
        let output = WheelOutput {
            steer_target_revs: current_revs + delta_deg / DEGREES_PER_REV,
            drive_speed: if reversed { -speed } else { speed },
            reversed,
        };

        trace!(
            "Wheel {:.1} deg -> {:.1} deg: delta {:.1} deg, drive {:.3}",
            wrap_degrees(current_revs * DEGREES_PER_REV),
            target_direction_deg,
            delta_deg,
            output.drive_speed
        );

        self.hw.set_steer_target(output.steer_target_revs);
        self.hw.set_drive_speed(output.drive_speed);

        Ok(output)
    }

    /// Current measured direction in compass degrees, in [0, 360).
    pub fn direction(&self) -> f64 {
        wrap_degrees(self.hw.raw_steer_position() * DEGREES_PER_REV)
    }

    /// Check whether the wheel is within `margin_deg` of `direction_deg`.
    pub fn check_within_range(
        &self,
        direction_deg: f64,
        margin_deg: f64
    ) -> Result<bool, WheelError> {
        check_direction(direction_deg)?;
        check_margin(margin_deg)?;

        Ok(ang_dist_deg(self.direction(), direction_deg).abs() <= margin_deg)
    }

    /// As `check_within_range`, but also accepts the wheel pointing the
    /// opposite way, which is equivalent when driving in reverse.
    pub fn check_within_180_range(
        &self,
        direction_deg: f64,
        margin_deg: f64
    ) -> Result<bool, WheelError> {
        Ok(self.check_within_range(direction_deg, margin_deg)?
            || self.check_within_range(wrap_degrees(direction_deg + 180.0), margin_deg)?)
    }

    /// Stop driving and steering immediately.
    pub fn stop(&mut self) {
        self.hw.set_drive_speed(0.0);
        self.hw.stop_steering();
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

impl<H: OdomWheelHw> SwerveWheel<H> {
    /// Distance travelled by the wheel since its zero reference.
    ///
    /// Units: inches
    pub fn travel_distance(&self) -> f64 {
        self.hw.travel_distance()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_direction(direction_deg: f64) -> Result<(), WheelError> {
    if (0.0..DEGREES_PER_REV).contains(&direction_deg) {
        Ok(())
    }
    else {
        Err(WheelError::InvalidDirection(direction_deg))
    }
}

fn check_margin(margin_deg: f64) -> Result<(), WheelError> {
    if margin_deg > 0.0 && margin_deg < DEGREES_PER_REV {
        Ok(())
    }
    else {
        Err(WheelError::InvalidMargin(margin_deg))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use util::vector::PlanarVector;

    /// Steer axis that snaps straight to its target.
    #[derive(Default)]
    struct MockHw {
        pos_revs: f64,
        drive: f64,
        steering_stopped: bool,
    }

    impl WheelHw for MockHw {
        fn set_steer_target(&mut self, target_revs: f64) {
            self.pos_revs = target_revs;
            self.steering_stopped = false;
        }

        fn set_drive_speed(&mut self, speed: f64) {
            self.drive = speed;
        }

        fn stop_steering(&mut self) {
            self.steering_stopped = true;
        }

        fn raw_steer_position(&self) -> f64 {
            self.pos_revs
        }
    }

    fn wheel_at(direction_deg: f64) -> SwerveWheel<MockHw> {
        SwerveWheel::new(MockHw {
            pos_revs: direction_deg / 360.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_flip_to_reverse() {
        let mut w = wheel_at(10.0);
        let o = w.steer_and_drive(200.0, 0.5).unwrap();

        // 190 deg clockwise, or -170 deg; flipped to +10 deg and reversed
        assert!(o.reversed);
        assert_eq!(o.drive_speed, -0.5);
        assert_abs_diff_eq!(o.steer_target_revs * 360.0, 20.0, epsilon = 1e-9);
        assert!(((o.steer_target_revs * 360.0) - 10.0).abs() <= 90.0);
        assert_abs_diff_eq!(w.direction(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_keeps_unbounded_position() {
        // Two and a bit revolutions wound up
        let mut w = SwerveWheel::new(MockHw {
            pos_revs: 2.0 + 350.0 / 360.0,
            ..Default::default()
        });

        let o = w.steer_and_drive(10.0, 1.0).unwrap();

        // 350 -> 10 is +20 deg, so the axis continues into its fourth turn
        assert!(!o.reversed);
        assert_abs_diff_eq!(o.steer_target_revs, 3.0 + 10.0 / 360.0, epsilon = 1e-9);
    }

    #[test]
    fn test_steer_change_never_exceeds_quarter_turn() {
        let mut current = 0.0;
        while current < 360.0 {
            let mut target = 0.0;
            while target < 360.0 {
                let mut w = wheel_at(current);
                let start = w.hw().raw_steer_position();
                let o = w.steer_and_drive(target, 1.0).unwrap();

                let change_deg = (o.steer_target_revs - start) * 360.0;
                assert!(change_deg.abs() <= 90.0 + 1e-9);

                // Resulting ground velocity is the one demanded
                let ground = PlanarVector::from_polar(w.direction(), o.drive_speed);
                let demanded = PlanarVector::from_polar(target, 1.0);
                assert_abs_diff_eq!(ground.x(), demanded.x(), epsilon = 1e-9);
                assert_abs_diff_eq!(ground.y(), demanded.y(), epsilon = 1e-9);

                target += 15.0;
            }
            current += 7.5;
        }
    }

    #[test]
    fn test_opposite_targets_are_equivalent() {
        for &(current, target) in &[(0.0, 30.0), (45.0, 300.0), (170.0, 10.0)] {
            let mut a = wheel_at(current);
            let mut b = wheel_at(current);

            let oa = a.steer_and_drive(target, 0.8).unwrap();
            let ob = b.steer_and_drive(wrap_degrees(target + 180.0), 0.8).unwrap();

            // Same steer position, opposite drive flags
            assert_abs_diff_eq!(oa.steer_target_revs, ob.steer_target_revs, epsilon = 1e-9);
            assert_ne!(oa.reversed, ob.reversed);

            let va = PlanarVector::from_polar(a.direction(), oa.drive_speed);
            let vb = PlanarVector::from_polar(b.direction(), -ob.drive_speed);
            assert_abs_diff_eq!(va.x(), vb.x(), epsilon = 1e-9);
            assert_abs_diff_eq!(va.y(), vb.y(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut w = wheel_at(45.0);

        assert_eq!(w.steer_and_drive(90.0, 1.5), Err(WheelError::InvalidSpeed(1.5)));
        assert_eq!(w.steer_and_drive(90.0, -0.1), Err(WheelError::InvalidSpeed(-0.1)));
        assert_eq!(w.steer_and_drive(360.0, 0.5), Err(WheelError::InvalidDirection(360.0)));
        assert!(w.steer_and_drive(f64::NAN, 0.5).is_err());
        assert!(w.check_within_range(10.0, 0.0).is_err());

        // Hardware untouched
        assert_abs_diff_eq!(w.direction(), 45.0, epsilon = 1e-9);
        assert_eq!(w.hw().drive, 0.0);
    }

    #[test]
    fn test_range_checks() {
        let w = wheel_at(355.0);

        assert!(w.check_within_range(2.0, 10.0).unwrap());
        assert!(!w.check_within_range(20.0, 10.0).unwrap());
        assert!(!w.check_within_range(175.0, 10.0).unwrap());
        assert!(w.check_within_180_range(175.0, 10.0).unwrap());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut w = wheel_at(0.0);
        w.steer_and_drive(30.0, 1.0).unwrap();

        w.stop();
        w.stop();

        assert_eq!(w.hw().drive, 0.0);
        assert!(w.hw().steering_stopped);
    }
}
