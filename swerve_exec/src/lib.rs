//! # Swerve library.
//!
//! This library allows other crates in the workspace, the benchmarks and the
//! integration tests to access items defined inside the swerve crate.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Chassis - drive control, input handling and odometry on one set of hardware
pub mod chassis;

/// Data store - shared data for the executable's main loop
pub mod data_store;

/// Drive control module - converts chassis demands into individual wheel commands
pub mod drive_ctrl;

/// Input handling - deadband and response curves for driver input
pub mod input;

/// Odometry - dead reckoning pose estimation
pub mod odom;

/// Simulated hardware
pub mod sim;

/// Swerve wheel actuation and the hardware capability traits
pub mod wheel;
