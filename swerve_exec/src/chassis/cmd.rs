//! Commands passed into the chassis

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command to the chassis.
///
/// Scripts give these as JSON, e.g. `{"type": "steer_all", "direction_deg":
/// 90.0, "speed": 0.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriveCmd {
    /// No new command, continue with the current one.
    None,

    /// Stop all wheels where they are.
    Stop,

    /// Chassis relative drive, all values in [-1, 1].
    Drive {
        strafe_x: f64,
        strafe_y: f64,
        rotation: f64
    },

    /// Raw driver input, shaped by the input handler before driving.
    UserInput {
        strafe_x: f64,
        strafe_y: f64,
        rotation: f64,
        #[serde(default)]
        frame: FrameOfReference
    },

    /// Point all wheels the same way and drive them at the same speed.
    SteerAll {
        direction_deg: f64,
        speed: f64
    },

    /// Overwrite the pose estimate. Does not replace the current command.
    ResetPosition {
        x_in: f64,
        y_in: f64,
        heading_deg: f64
    },
}

/// Frame in which a strafe input is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOfReference {
    /// Relative to the chassis' forwards direction.
    Robot,

    /// Relative to the heading sensor's zero, so forwards on the stick is
    /// always the same way across the field.
    Field,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for FrameOfReference {
    fn default() -> Self {
        FrameOfReference::Robot
    }
}

impl DriveCmd {
    /// Commands which take effect once rather than becoming the current
    /// command.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, DriveCmd::ResetPosition { .. })
    }

    /// Short name, used in archives.
    pub fn name(&self) -> &'static str {
        match self {
            DriveCmd::None => "none",
            DriveCmd::Stop => "stop",
            DriveCmd::Drive { .. } => "drive",
            DriveCmd::UserInput { .. } => "user_input",
            DriveCmd::SteerAll { .. } => "steer_all",
            DriveCmd::ResetPosition { .. } => "reset_position",
        }
    }
}
