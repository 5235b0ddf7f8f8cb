//! Drive control module
//!
//! Chassis inverse kinematics for a four wheel swerve drive. A chassis
//! demand made up of a strafe vector and a rotation rate is decomposed into
//! one target vector per wheel, the wheel speeds are limited to the maximum
//! output while keeping their proportions, and the resulting (direction,
//! speed) pairs are dispatched to the wheels.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_drive;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use calc_drive::*;
pub use params::*;
pub use state::*;
use crate::wheel::WheelError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of wheels on the chassis.
pub const NUM_WHEELS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Position of a wheel on the chassis.
///
/// Arrays of per-wheel data are always indexed in this order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelPos {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

/// Possible errors that can occur during DriveCtrl operation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DriveCtrlError {
    #[error("Drive input `{0}` must be within [-1, 1], found {1}")]
    InvalidInput(&'static str, f64),

    #[error("Invalid DriveCtrl parameter `{0}`: {1}")]
    InvalidParam(&'static str, f64),

    #[error("Wheel error: {0}")]
    WheelError(#[from] WheelError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WheelPos {
    pub const ALL: [WheelPos; NUM_WHEELS] = [
        WheelPos::FrontLeft,
        WheelPos::FrontRight,
        WheelPos::RearLeft,
        WheelPos::RearRight,
    ];

    /// Index of this wheel in per-wheel arrays.
    pub fn index(self) -> usize {
        match self {
            WheelPos::FrontLeft => 0,
            WheelPos::FrontRight => 1,
            WheelPos::RearLeft => 2,
            WheelPos::RearRight => 3,
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelPos::FrontLeft | WheelPos::FrontRight)
    }

    pub fn is_right(self) -> bool {
        matches!(self, WheelPos::FrontRight | WheelPos::RearRight)
    }
}

impl std::fmt::Display for WheelPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WheelPos::FrontLeft => "FL",
            WheelPos::FrontRight => "FR",
            WheelPos::RearLeft => "RL",
            WheelPos::RearRight => "RR",
        };
        write!(f, "{}", s)
    }
}
