//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{calc_drive_targets, DriveCtrlError, Params, WheelPos, NUM_WHEELS};
use crate::wheel::{OdomWheelHw, SwerveWheel, WheelError, WheelHw, WheelOutput};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state.
///
/// Owns the four wheels, indexed in `WheelPos` order.
pub struct DriveCtrl<H> {
    params: Params,
    wheels: [SwerveWheel<H>; NUM_WHEELS],
}

/// Report on one dispatch of the wheels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DriveReport {
    /// Demands issued to each wheel.
    pub outputs: [WheelOutput; NUM_WHEELS],

    /// Wheels which held their direction as they had no target vector.
    pub held: [bool; NUM_WHEELS],

    /// Set if the wheel speeds were scaled down to the maximum output.
    pub saturated: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<H: WheelHw> DriveCtrl<H> {
    /// Create the module from its parameters and the wheel hardware, given
    /// in `WheelPos` order.
    pub fn new(params: Params, hw: [H; NUM_WHEELS]) -> Result<Self, DriveCtrlError> {
        params.validate()?;

        let [fl, fr, rl, rr] = hw;

        Ok(Self {
            params,
            wheels: [
                SwerveWheel::new(fl),
                SwerveWheel::new(fr),
                SwerveWheel::new(rl),
                SwerveWheel::new(rr)
            ],
        })
    }

    /// Drive the chassis.
    ///
    /// All inputs are in [-1, 1], chassis relative with +Y forwards and +X to
    /// the right. Positive `rotation` turns clockwise seen from above.
    pub fn drive(
        &mut self,
        strafe_x: f64,
        strafe_y: f64,
        rotation: f64
    ) -> Result<DriveReport, DriveCtrlError> {
        let targets = calc_drive_targets(
            &self.params,
            strafe_x,
            strafe_y,
            rotation,
            &self.directions()
        )?;

        let mut report = DriveReport {
            held: targets.held,
            saturated: targets.saturated,
            ..Default::default()
        };

        for (i, wheel) in self.wheels.iter_mut().enumerate() {
            report.outputs[i] = wheel.steer_and_drive(targets.directions_deg[i], targets.speeds[i])?;

            if report.outputs[i].reversed {
                debug!("{} wheel reversed", WheelPos::ALL[i]);
            }
        }

        trace!(
            "Drive ({:.3}, {:.3}, {:.3}) -> dirs {:.1?}, speeds {:.3?}",
            strafe_x,
            strafe_y,
            rotation,
            targets.directions_deg,
            targets.speeds
        );

        Ok(report)
    }

    /// Steer every wheel to `direction_deg` and drive them all at `speed`.
    pub fn steer_all(
        &mut self,
        direction_deg: f64,
        speed: f64
    ) -> Result<[WheelOutput; NUM_WHEELS], DriveCtrlError> {
        check_uniform_demand(direction_deg, speed)?;

        let mut outputs = [WheelOutput::default(); NUM_WHEELS];
        for (o, wheel) in outputs.iter_mut().zip(self.wheels.iter_mut()) {
            *o = wheel.steer_and_drive(direction_deg, speed)?;
        }

        Ok(outputs)
    }

    /// True only if all wheels are within `margin_deg` of `direction_deg`,
    /// either way round.
    pub fn check_all_within_range(
        &self,
        direction_deg: f64,
        margin_deg: f64
    ) -> Result<bool, DriveCtrlError> {
        let mut all = true;
        for wheel in self.wheels.iter() {
            all &= wheel.check_within_180_range(direction_deg, margin_deg)?;
        }

        Ok(all)
    }

    /// Steer all wheels to `direction_deg` without driving and report
    /// whether they have all arrived.
    pub fn steer_all_within_range(
        &mut self,
        direction_deg: f64,
        margin_deg: f64
    ) -> Result<bool, DriveCtrlError> {
        // Check the margin before moving anything
        if !(margin_deg > 0.0 && margin_deg < 360.0) {
            return Err(WheelError::InvalidMargin(margin_deg).into());
        }

        self.steer_all(direction_deg, 0.0)?;
        self.check_all_within_range(direction_deg, margin_deg)
    }

    /// Stop all wheels.
    pub fn stop(&mut self) {
        for wheel in self.wheels.iter_mut() {
            wheel.stop();
        }
    }

    /// Measured direction of each wheel.
    ///
    /// Units: degrees [0, 360)
    pub fn directions(&self) -> [f64; NUM_WHEELS] {
        let mut dirs = [0.0; NUM_WHEELS];
        for (d, wheel) in dirs.iter_mut().zip(self.wheels.iter()) {
            *d = wheel.direction();
        }
        dirs
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn wheel(&self, pos: WheelPos) -> &SwerveWheel<H> {
        &self.wheels[pos.index()]
    }

    pub fn wheels(&self) -> &[SwerveWheel<H>; NUM_WHEELS] {
        &self.wheels
    }

    pub fn wheels_mut(&mut self) -> &mut [SwerveWheel<H>; NUM_WHEELS] {
        &mut self.wheels
    }
}

impl<H: OdomWheelHw> DriveCtrl<H> {
    /// Travel distance of each wheel.
    ///
    /// Units: inches
    pub fn travel_distances(&self) -> [f64; NUM_WHEELS] {
        let mut dists = [0.0; NUM_WHEELS];
        for (d, wheel) in dists.iter_mut().zip(self.wheels.iter()) {
            *d = wheel.travel_distance();
        }
        dists
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Validate a demand for all four wheels up front, so an invalid demand
/// never leaves the wheels partially commanded.
fn check_uniform_demand(direction_deg: f64, speed: f64) -> Result<(), WheelError> {
    if !(0.0..360.0).contains(&direction_deg) {
        return Err(WheelError::InvalidDirection(direction_deg));
    }
    if !(0.0..=1.0).contains(&speed) {
        return Err(WheelError::InvalidSpeed(speed));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Wheel which reaches its steer target instantly.
    #[derive(Default, Clone, Copy)]
    struct SnapHw {
        pos_revs: f64,
        drive: f64,
    }

    impl WheelHw for SnapHw {
        fn set_steer_target(&mut self, target_revs: f64) {
            self.pos_revs = target_revs;
        }
        fn set_drive_speed(&mut self, speed: f64) {
            self.drive = speed;
        }
        fn stop_steering(&mut self) {}
        fn raw_steer_position(&self) -> f64 {
            self.pos_revs
        }
    }

    fn drive_ctrl() -> DriveCtrl<SnapHw> {
        DriveCtrl::new(Params::default(), [SnapHw::default(); NUM_WHEELS]).unwrap()
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Params { max_output: 2.0, ..Default::default() };
        assert!(DriveCtrl::new(params, [SnapHw::default(); NUM_WHEELS]).is_err());
    }

    #[test]
    fn test_drive_dispatches_to_wheels() {
        let mut dc = drive_ctrl();

        // Strafe right
        let report = dc.drive(1.0, 0.0, 0.0).unwrap();
        for (i, w) in dc.wheels().iter().enumerate() {
            assert_abs_diff_eq!(w.direction(), 90.0, epsilon = 1e-9);
            assert_abs_diff_eq!(w.hw().drive, 0.5, epsilon = 1e-12);
            assert!(!report.outputs[i].reversed);
        }

        // Strafe left, reversing is shorter than a half turn
        let report = dc.drive(-1.0, 0.0, 0.0).unwrap();
        for (i, w) in dc.wheels().iter().enumerate() {
            assert_abs_diff_eq!(w.direction(), 90.0, epsilon = 1e-9);
            assert!(report.outputs[i].reversed);
            assert_abs_diff_eq!(w.hw().drive, -0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_drive_leaves_wheels_alone() {
        let mut dc = drive_ctrl();
        dc.drive(0.0, 1.0, 0.0).unwrap();

        assert!(dc.drive(0.0, 1.0, 1.01).is_err());
        assert!(dc.steer_all(400.0, 0.5).is_err());
        assert!(dc.steer_all(10.0, 1.5).is_err());

        for w in dc.wheels() {
            assert_abs_diff_eq!(w.direction(), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(w.hw().drive, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_demand_keeps_directions() {
        let mut dc = drive_ctrl();
        dc.steer_all(60.0, 0.3).unwrap();

        let report = dc.drive(0.0, 0.0, 0.0).unwrap();
        assert_eq!(report.held, [true; NUM_WHEELS]);
        for w in dc.wheels() {
            assert_abs_diff_eq!(w.direction(), 60.0, epsilon = 1e-9);
            assert_eq!(w.hw().drive, 0.0);
        }
    }

    #[test]
    fn test_steer_all_within_range() {
        let mut dc = drive_ctrl();

        assert!(!dc.check_all_within_range(45.0, 5.0).unwrap());
        assert!(dc.steer_all_within_range(45.0, 5.0).unwrap());
        assert!(dc.check_all_within_range(225.0, 5.0).unwrap());
        assert!(dc.steer_all_within_range(45.0, 0.0).is_err());

        dc.stop();
        for w in dc.wheels() {
            assert_eq!(w.hw().drive, 0.0);
        }
    }
}
