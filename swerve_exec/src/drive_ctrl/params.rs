//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use super::DriveCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Wheelbase (front to rear wheel spacing) divided by track (left to
    /// right wheel spacing).
    ///
    /// Scales the sideways part of each wheel's rotation vector so that the
    /// vector is tangent to the circle the wheel traces when the chassis
    /// turns about its centre. 1 for a square chassis.
    pub wheelbase_to_track_ratio: f64,

    // ---- CAPABILITIES ----

    /// Largest speed commanded to any wheel. Faster demands are scaled down
    /// across all four wheels.
    ///
    /// Units: normalised (0, 1]
    pub max_output: f64,

    /// Scalar applied to the strafe demand.
    ///
    /// Units: normalised (0, 1]
    pub drive_rel_speed: f64,

    /// Scalar applied to the rotation demand.
    ///
    /// Units: normalised (0, 1]
    pub steer_rel_speed: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            wheelbase_to_track_ratio: 1.0,
            max_output: 1.0,
            drive_rel_speed: 0.5,
            steer_rel_speed: 0.3,
        }
    }
}

impl Params {
    /// Check the parameters are usable, returning the first bad one found.
    pub fn validate(&self) -> Result<(), DriveCtrlError> {
        if !(self.wheelbase_to_track_ratio.is_finite() && self.wheelbase_to_track_ratio > 0.0) {
            return Err(DriveCtrlError::InvalidParam(
                "wheelbase_to_track_ratio",
                self.wheelbase_to_track_ratio
            ));
        }

        let unit_scalars = [
            ("max_output", self.max_output),
            ("drive_rel_speed", self.drive_rel_speed),
            ("steer_rel_speed", self.steer_rel_speed),
        ];

        for &(name, value) in unit_scalars.iter() {
            if !(value > 0.0 && value <= 1.0) {
                return Err(DriveCtrlError::InvalidParam(name, value));
            }
        }

        Ok(())
    }
}
