//! Chassis module
//!
//! Ties drive control, input handling, the heading sensor and odometry
//! together into a single swerve chassis which can be driven by direct calls
//! or cyclically through `util::module::State` with [`DriveCmd`]s.
//!
//! Odometry is updated after every command that moves the wheels and on
//! every cycle, so no wheel travel goes unaccounted for.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use cmd::*;
pub use state::*;
use crate::{drive_ctrl::DriveCtrlError, input::InputError, odom::OdomError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during chassis operation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ChassisError {
    #[error("Drive control error: {0}")]
    DriveCtrlError(#[from] DriveCtrlError),

    #[error("Input error: {0}")]
    InputError(#[from] InputError),

    #[error("Odometry error: {0}")]
    OdomError(#[from] OdomError),
}
