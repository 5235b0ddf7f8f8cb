//! Implementations for the Odometry state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;

// Internal
use super::{OdomError, Pose};
use crate::drive_ctrl::{WheelPos, NUM_WHEELS};
use util::{maths::wrap_degrees, vector::PlanarVector};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const WHEEL_WEIGHT: f64 = 1.0 / NUM_WHEELS as f64;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One wheel's measurements at the time of an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WheelSample {
    /// Measured direction relative to the chassis.
    ///
    /// Units: degrees
    pub direction_deg: f64,

    /// Distance travelled since the encoder's zero reference.
    ///
    /// Units: inches
    pub travel_in: f64,
}

/// Pose estimator state.
#[derive(Debug, Clone)]
pub struct Odometry {
    pose: Pose,

    /// Sensor reading at the last reset.
    ///
    /// Units: degrees (unbounded)
    anchor_sensor_heading_deg: f64,

    /// Pose heading at the last reset.
    ///
    /// Units: degrees
    anchor_pose_heading_deg: f64,

    /// Wheel travel seen by the last update, `None` until the first one.
    last_travel_in: Option<[f64; NUM_WHEELS]>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Odometry {
    /// Start at the origin, the current sensor heading becoming heading 0.
    pub fn new(sensor_heading_deg: f64) -> Result<Self, OdomError> {
        check_heading(sensor_heading_deg)?;

        Ok(Self {
            pose: Pose::origin(),
            anchor_sensor_heading_deg: sensor_heading_deg,
            anchor_pose_heading_deg: 0.0,
            last_travel_in: None,
        })
    }

    /// Fold the wheel movement since the last update into the pose.
    ///
    /// The first update only records the travel baseline. Invalid samples
    /// are rejected before anything is changed.
    pub fn update(
        &mut self,
        samples: &[WheelSample; NUM_WHEELS],
        sensor_heading_deg: f64
    ) -> Result<Pose, OdomError> {
        check_heading(sensor_heading_deg)?;
        for (pos, s) in WheelPos::ALL.iter().zip(samples.iter()) {
            if !(s.direction_deg.is_finite() && s.travel_in.is_finite()) {
                return Err(OdomError::NonFiniteWheelSample(*pos, s.direction_deg, s.travel_in));
            }
        }

        let heading_deg = self.field_heading(sensor_heading_deg);

        let mut travel = [0.0; NUM_WHEELS];
        for (t, s) in travel.iter_mut().zip(samples.iter()) {
            *t = s.travel_in;
        }
        let last = self.last_travel_in.unwrap_or(travel);

        // Each wheel's displacement in the field frame, averaged
        let mut movement = PlanarVector::zero();
        for i in 0..NUM_WHEELS {
            movement = movement + PlanarVector::from_polar(
                heading_deg + samples[i].direction_deg,
                travel[i] - last[i]
            );
        }
        let movement = movement.scale(WHEEL_WEIGHT);

        self.pose = self.pose.moved_by(movement, heading_deg);
        self.last_travel_in = Some(travel);

        trace!("Odometry moved by {}, pose {}", movement, self.pose);

        Ok(self.pose)
    }

    /// Overwrite the pose.
    ///
    /// The heading sensor is left alone, instead the heading offset is moved
    /// so that following updates continue from `pose`'s heading.
    pub fn reset_position(&mut self, pose: Pose, sensor_heading_deg: f64) -> Result<(), OdomError> {
        check_heading(sensor_heading_deg)?;
        if !pose.is_finite() {
            return Err(OdomError::NonFinitePose(pose));
        }

        self.pose = pose;
        self.anchor_sensor_heading_deg = sensor_heading_deg;
        self.anchor_pose_heading_deg = pose.heading_deg();

        info!("Odometry reset to {}", pose);

        Ok(())
    }

    /// Keep the current heading after the heading sensor has been zeroed,
    /// `sensor_heading_deg` being its new reading.
    pub fn rebase_heading(&mut self, sensor_heading_deg: f64) -> Result<(), OdomError> {
        check_heading(sensor_heading_deg)?;

        self.anchor_sensor_heading_deg = sensor_heading_deg;
        self.anchor_pose_heading_deg = self.pose.heading_deg();

        Ok(())
    }

    /// Field heading implied by a sensor reading.
    ///
    /// Units: degrees [0, 360)
    pub fn field_heading(&self, sensor_heading_deg: f64) -> f64 {
        wrap_degrees(
            self.anchor_pose_heading_deg
            + (sensor_heading_deg - self.anchor_sensor_heading_deg)
        )
    }

    /// Pose as of the last update.
    ///
    /// To include movement since then run `update` first.
    pub fn pose(&self) -> Pose {
        self.pose
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_heading(heading_deg: f64) -> Result<(), OdomError> {
    if heading_deg.is_finite() {
        Ok(())
    }
    else {
        Err(OdomError::NonFiniteHeading(heading_deg))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn samples(direction_deg: f64, travel_in: f64) -> [WheelSample; NUM_WHEELS] {
        [WheelSample { direction_deg, travel_in }; NUM_WHEELS]
    }

    #[test]
    fn test_first_update_is_baseline() {
        let mut odom = Odometry::new(0.0).unwrap();

        // Encoders already show travel from before start-up
        let pose = odom.update(&samples(0.0, 120.0), 0.0).unwrap();
        assert_eq!(pose.location(), PlanarVector::zero());
    }

    #[test]
    fn test_straight_line() {
        let mut odom = Odometry::new(0.0).unwrap();
        odom.update(&samples(90.0, 0.0), 0.0).unwrap();

        let pose = odom.update(&samples(90.0, 12.0), 0.0).unwrap();
        assert_abs_diff_eq!(pose.location().x(), 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.location().y(), 0.0, epsilon = 1e-9);

        // Same again but facing field +X, so chassis forwards is field +X
        let mut odom = Odometry::new(0.0).unwrap();
        odom.update(&samples(0.0, 0.0), 90.0).unwrap();
        let pose = odom.update(&samples(0.0, -5.0), 90.0).unwrap();
        assert_abs_diff_eq!(pose.location().x(), -5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.heading_deg(), 90.0);
    }

    #[test]
    fn test_wheels_averaged() {
        let mut odom = Odometry::new(0.0).unwrap();
        odom.update(&samples(0.0, 0.0), 0.0).unwrap();

        let mut s = samples(0.0, 4.0);
        s[3].travel_in = 8.0;
        let pose = odom.update(&s, 0.0).unwrap();

        assert_abs_diff_eq!(pose.location().y(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_idempotent_without_movement() {
        let mut odom = Odometry::new(33.0).unwrap();
        odom.update(&samples(10.0, 1.0), 40.0).unwrap();
        odom.update(&samples(10.0, 7.0), 40.0).unwrap();

        let a = odom.update(&samples(10.0, 7.0), 40.0).unwrap();
        let b = odom.update(&samples(10.0, 7.0), 40.0).unwrap();
        assert_eq!(a, b);
        assert_abs_diff_eq!(a.heading_deg(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_then_get_is_exact() {
        let mut odom = Odometry::new(0.0).unwrap();
        odom.update(&samples(0.0, 0.0), 12.5).unwrap();
        odom.update(&samples(0.0, 30.0), 12.5).unwrap();

        let target = Pose::new(PlanarVector::new(-14.3, 101.7), 271.3);
        odom.reset_position(target, 1234.56).unwrap();

        assert_eq!(odom.update(&samples(0.0, 30.0), 1234.56).unwrap(), target);

        // Turning 10 deg clockwise carries on from the reset heading
        let pose = odom.update(&samples(0.0, 30.0), 1244.56).unwrap();
        assert_abs_diff_eq!(pose.heading_deg(), 281.3, epsilon = 1e-9);
    }

    #[test]
    fn test_rebase_keeps_heading() {
        let mut odom = Odometry::new(0.0).unwrap();
        odom.update(&samples(0.0, 0.0), 45.0).unwrap();

        // Sensor zeroed while the chassis is at 45 deg
        odom.rebase_heading(0.0).unwrap();
        let pose = odom.update(&samples(0.0, 0.0), 0.0).unwrap();
        assert_abs_diff_eq!(pose.heading_deg(), 45.0);
    }

    #[test]
    fn test_invalid_samples_leave_state() {
        let mut odom = Odometry::new(0.0).unwrap();
        odom.update(&samples(0.0, 2.0), 0.0).unwrap();
        let before = odom.pose();

        let mut s = samples(0.0, 10.0);
        s[2].travel_in = f64::NAN;
        assert!(matches!(
            odom.update(&s, 0.0),
            Err(OdomError::NonFiniteWheelSample(WheelPos::RearLeft, _, _))
        ));
        assert!(odom.update(&samples(0.0, 10.0), f64::INFINITY).is_err());
        assert!(odom.reset_position(
            Pose::new(PlanarVector::new(f64::NAN, 0.0), 0.0), 0.0
        ).is_err());
        assert_eq!(odom.pose(), before);

        // The baseline was not consumed by the rejected samples
        let pose = odom.update(&samples(0.0, 10.0), 0.0).unwrap();
        assert_abs_diff_eq!(pose.location().y(), 8.0, epsilon = 1e-9);
    }
}
