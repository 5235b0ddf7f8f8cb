//! # Simulated hardware
//!
//! A simple kinematic model of a swerve chassis, used to run the control
//! software without hardware attached. Steer axes turn towards their
//! targets at a limited rate, drive axes move their wheels at the demanded
//! fraction of full speed, and the heading sensor follows the rigid body
//! rotation best fitting the four wheel velocities.
//!
//! Wheels don't slip, so the only odometry error comes from the wheels not
//! agreeing with each other while they steer.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
pub use params::*;
use crate::{
    drive_ctrl::{WheelPos, NUM_WHEELS},
    wheel::{HeadingSensor, OdomWheelHw, SwerveWheel, WheelHw},
};
use util::vector::PlanarVector;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A simulated swerve wheel.
#[derive(Debug, Clone, Copy)]
pub struct SimWheel {
    max_drive_speed_ins: f64,
    max_steer_rate_revs: f64,

    steer_pos_revs: f64,
    steer_target_revs: f64,
    drive_speed: f64,
    travel_in: f64,
}

/// A simulated heading sensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimGyro {
    heading_deg: f64,
}

/// Rigid body model tying the simulated wheels and heading sensor together.
#[derive(Debug, Clone)]
pub struct SimChassis {
    params: SimParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SimError {
    #[error("Invalid simulation parameter {0}: {1}")]
    InvalidParam(&'static str, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimWheel {
    pub fn new(params: &SimParams) -> Self {
        Self {
            max_drive_speed_ins: params.max_drive_speed_ins,
            max_steer_rate_revs: params.max_steer_rate_revs,
            steer_pos_revs: 0.0,
            steer_target_revs: 0.0,
            drive_speed: 0.0,
            travel_in: 0.0,
        }
    }

    /// Advance the wheel by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        let max_step_revs = self.max_steer_rate_revs * dt_s;
        let error_revs = self.steer_target_revs - self.steer_pos_revs;
        self.steer_pos_revs += error_revs.max(-max_step_revs).min(max_step_revs);

        self.travel_in += self.drive_speed * self.max_drive_speed_ins * dt_s;
    }

    /// Current ground velocity relative to the chassis.
    ///
    /// Units: inches/second
    pub fn velocity_ins(&self) -> PlanarVector {
        PlanarVector::from_polar(
            self.steer_pos_revs * util::maths::DEGREES_PER_REV,
            self.drive_speed * self.max_drive_speed_ins
        )
    }

    pub fn drive_speed(&self) -> f64 {
        self.drive_speed
    }
}

impl WheelHw for SimWheel {
    fn set_steer_target(&mut self, target_revs: f64) {
        self.steer_target_revs = target_revs;
    }

    fn set_drive_speed(&mut self, speed: f64) {
        self.drive_speed = speed;
    }

    fn stop_steering(&mut self) {
        self.steer_target_revs = self.steer_pos_revs;
    }

    fn raw_steer_position(&self) -> f64 {
        self.steer_pos_revs
    }
}

impl OdomWheelHw for SimWheel {
    fn travel_distance(&self) -> f64 {
        self.travel_in
    }
}

impl SimGyro {
    pub fn new(heading_deg: f64) -> Self {
        Self { heading_deg }
    }

    pub fn rotate(&mut self, delta_deg: f64) {
        self.heading_deg += delta_deg;
    }
}

impl HeadingSensor for SimGyro {
    fn absolute_heading(&self) -> f64 {
        self.heading_deg
    }

    fn reset(&mut self) {
        self.heading_deg = 0.0;
    }
}

impl SimChassis {
    /// Build the model, rejecting parameters which would give a degenerate
    /// chassis.
    pub fn new(params: SimParams) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Simulated wheels in `WheelPos` order.
    pub fn wheels(&self) -> [SimWheel; NUM_WHEELS] {
        [SimWheel::new(&self.params); NUM_WHEELS]
    }

    /// Position of a wheel's contact point relative to the chassis centre.
    ///
    /// Units: inches
    pub fn wheel_position(&self, pos: WheelPos) -> PlanarVector {
        let x = self.params.track_width_in / 2.0;
        let y = self.params.wheelbase_in / 2.0;

        PlanarVector::new(
            if pos.is_right() { x } else { -x },
            if pos.is_front() { y } else { -y }
        )
    }

    /// Clockwise yaw rate best fitting the wheel velocities, in the least
    /// squares sense.
    ///
    /// Units: radians/second
    pub fn yaw_rate_rads(&self, velocities_ins: &[PlanarVector; NUM_WHEELS]) -> f64 {
        let mut num = 0.0;
        let mut den = 0.0;

        for (pos, v) in WheelPos::ALL.iter().zip(velocities_ins.iter()) {
            let r = self.wheel_position(*pos);
            num += v.x() * r.y() - v.y() * r.x();
            den += r.x() * r.x() + r.y() * r.y();
        }

        num / den
    }

    /// Advance the wheels and heading sensor by `dt_s` seconds.
    pub fn step(
        &self,
        wheels: &mut [SwerveWheel<SimWheel>; NUM_WHEELS],
        gyro: &mut SimGyro,
        dt_s: f64
    ) {
        let mut velocities = [PlanarVector::zero(); NUM_WHEELS];

        for (v, w) in velocities.iter_mut().zip(wheels.iter_mut()) {
            w.hw_mut().step(dt_s);
            *v = w.hw().velocity_ins();
        }

        let yaw_rate_rads = self.yaw_rate_rads(&velocities);
        gyro.rotate(yaw_rate_rads.to_degrees() * dt_s);

        trace!("Sim yaw rate {:.4} rad/s, heading {:.2} deg", yaw_rate_rads, gyro.absolute_heading());
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }
}
