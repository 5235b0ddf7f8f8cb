//! Swerve drive kinematics calculations
//!
//! These are pure functions of the parameters and the demand, the wheel
//! dispatch lives in [`super::DriveCtrl`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::{DriveCtrlError, Params, NUM_WHEELS};
use util::vector::PlanarVector;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Direction and speed targets for each wheel, in `WheelPos` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DriveTargets {
    /// Compass directions relative to the chassis.
    ///
    /// Units: degrees [0, 360)
    pub directions_deg: [f64; NUM_WHEELS],

    /// Units: normalised [0, max_output]
    pub speeds: [f64; NUM_WHEELS],

    /// Set for wheels whose target vector was zero, which keep their
    /// current direction.
    pub held: [bool; NUM_WHEELS],

    /// Set if the speeds were scaled down to the maximum output.
    pub saturated: bool,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that a chassis demand is within [-1, 1] on every axis.
pub fn check_drive_inputs(
    strafe_x: f64,
    strafe_y: f64,
    rotation: f64
) -> Result<(), DriveCtrlError> {
    for &(name, value) in [("strafe_x", strafe_x), ("strafe_y", strafe_y), ("rotation", rotation)].iter() {
        if !(-1.0..=1.0).contains(&value) {
            return Err(DriveCtrlError::InvalidInput(name, value));
        }
    }

    Ok(())
}

/// Contribution of a clockwise `rotation` demand to each wheel's vector.
///
/// The front right vector is derived directly, the others follow from the
/// symmetric placement of the wheels about the chassis centre.
pub fn rotation_vectors(params: &Params, rotation: f64) -> [PlanarVector; NUM_WHEELS] {
    let fr = PlanarVector::new(rotation * params.wheelbase_to_track_ratio, -rotation)
        .scale(params.steer_rel_speed);

    [
        fr.reflect_across_x(),
        fr,
        -fr,
        fr.reflect_across_y()
    ]
}

/// Target vector of each wheel for the given chassis demand.
pub fn wheel_vectors(
    params: &Params,
    strafe_x: f64,
    strafe_y: f64,
    rotation: f64
) -> [PlanarVector; NUM_WHEELS] {
    let strafe = PlanarVector::new(strafe_x, strafe_y).scale(params.drive_rel_speed);
    let rot = rotation_vectors(params, rotation);

    let mut vectors = [PlanarVector::zero(); NUM_WHEELS];
    for (v, r) in vectors.iter_mut().zip(rot.iter()) {
        *v = strafe + *r;
    }

    vectors
}

/// Scale all speeds down so the fastest is `max_output`.
///
/// The ratio between any two speeds is unchanged. Returns true if scaling
/// was needed.
pub fn limit_speeds(speeds: &mut [f64; NUM_WHEELS], max_output: f64) -> bool {
    let max_speed = speeds.iter().cloned().fold(0.0, f64::max);

    if max_speed <= max_output {
        return false;
    }

    for s in speeds.iter_mut() {
        *s = *s / max_speed * max_output;
    }

    true
}

/// Calculate wheel targets for a chassis demand.
///
/// `current_dirs_deg` are the measured wheel directions, held by any wheel
/// with nothing to do.
pub fn calc_drive_targets(
    params: &Params,
    strafe_x: f64,
    strafe_y: f64,
    rotation: f64,
    current_dirs_deg: &[f64; NUM_WHEELS]
) -> Result<DriveTargets, DriveCtrlError> {
    check_drive_inputs(strafe_x, strafe_y, rotation)?;

    let vectors = wheel_vectors(params, strafe_x, strafe_y, rotation);
    let mut targets = DriveTargets::default();

    for i in 0..NUM_WHEELS {
        targets.speeds[i] = vectors[i].magnitude();

        if targets.speeds[i] > 0.0 {
            targets.directions_deg[i] = vectors[i].angle();
        }
        else {
            targets.directions_deg[i] = current_dirs_deg[i];
            targets.held[i] = true;
        }
    }

    targets.saturated = limit_speeds(&mut targets.speeds, params.max_output);
    if targets.saturated {
        debug!("Wheel speeds limited to {:.3}: {:.3?}", params.max_output, targets.speeds);
    }

    Ok(targets)
}
