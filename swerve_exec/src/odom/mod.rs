//! Odometry module
//!
//! Dead reckoning pose estimation from the wheels' travel and the chassis
//! heading sensor. Each update converts every wheel's travel since the last
//! update into a field frame displacement, averages the four displacements
//! and adds the result to the running pose.
//!
//! There is no correction source, so the estimate drifts with wheel slip and
//! with any disagreement between the wheel directions during a cycle. Reset
//! the pose from an external fix when one is available.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod pose;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use pose::*;
pub use state::*;
use crate::drive_ctrl::WheelPos;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OdomError {
    #[error("Heading sample is not finite: {0}")]
    NonFiniteHeading(f64),

    #[error("{0} wheel sample is not finite: direction {1}, travel {2}")]
    NonFiniteWheelSample(WheelPos, f64, f64),

    #[error("Cannot reset to a pose which is not finite: {0:?}")]
    NonFinitePose(Pose),
}
