//! Parameters for the simulated chassis

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::SimError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated chassis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Distance between the left and right wheel centres.
    ///
    /// Units: inches
    pub track_width_in: f64,

    /// Distance between the front and rear wheel centres.
    ///
    /// Units: inches
    pub wheelbase_in: f64,

    /// Ground speed of a wheel at full drive demand.
    ///
    /// Units: inches/second
    pub max_drive_speed_ins: f64,

    /// Fastest rate the steer axes can turn at.
    ///
    /// Units: revolutions/second
    pub max_steer_rate_revs: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            track_width_in: 22.0,
            wheelbase_in: 22.0,
            max_drive_speed_ins: 150.0,
            max_steer_rate_revs: 2.0,
        }
    }
}

impl SimParams {
    /// Check every dimension and rate is positive and finite.
    pub fn validate(&self) -> Result<(), SimError> {
        let values = [
            ("track_width_in", self.track_width_in),
            ("wheelbase_in", self.wheelbase_in),
            ("max_drive_speed_ins", self.max_drive_speed_ins),
            ("max_steer_rate_revs", self.max_steer_rate_revs),
        ];

        for &(name, value) in values.iter() {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidParam(name, value));
            }
        }

        Ok(())
    }

    /// Wheelbase over track, for `drive_ctrl::Params`.
    pub fn wheelbase_to_track_ratio(&self) -> f64 {
        self.wheelbase_in / self.track_width_in
    }
}
