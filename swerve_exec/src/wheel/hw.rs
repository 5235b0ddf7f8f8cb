//! Hardware capabilities required by the wheels and the pose estimator

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A steerable, drivable wheel.
///
/// The steer position is an unbounded number of revolutions. It must not be
/// wrapped by the implementation so that the axis can be commanded through
/// more than one revolution without unwinding.
pub trait WheelHw {
    /// Command the steer axis to an absolute position.
    ///
    /// Units: revolutions (unbounded)
    fn set_steer_target(&mut self, target_revs: f64);

    /// Set the drive demand.
    ///
    /// Units: normalised [-1, 1]
    fn set_drive_speed(&mut self, speed: f64);

    /// Halt the steer axis where it is.
    fn stop_steering(&mut self);

    /// Measured steer position.
    ///
    /// Units: revolutions (unbounded)
    fn raw_steer_position(&self) -> f64;
}

/// A wheel which also measures the distance it has travelled.
pub trait OdomWheelHw: WheelHw {
    /// Distance travelled since the encoder's zero reference, negative when
    /// driven backwards.
    ///
    /// Units: inches
    fn travel_distance(&self) -> f64;
}

/// A chassis heading sensor, usually a gyroscope.
pub trait HeadingSensor {
    /// Heading since the last reset, clockwise positive and not wrapped.
    ///
    /// Units: degrees
    fn absolute_heading(&self) -> f64;

    /// Zero the sensor at the current orientation.
    fn reset(&mut self);
}
