//! Driver input handling
//!
//! Converts raw joystick style inputs into drive demands: small inputs inside
//! the deadband are ignored, inputs above it are stretched back over the full
//! range, and a response curve is then applied. Strafe vectors are shaped by
//! their magnitude only so their direction is never distorted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
use util::{
    maths::{clamp, poly_val},
    vector::PlanarVector,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Applies the deadband and response curve to inputs.
#[derive(Debug, Clone)]
pub struct InputHandler {
    params: InputParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("Deadband must be within [0, 1), found {0}")]
    InvalidDeadband(f64),

    #[error("Polynomial input curve has no coefficients")]
    EmptyPolyCurve,

    #[error("Input must be within [-1, 1], found {0}")]
    InvalidInput(f64),

    #[error("Input vector components must be finite, found ({0}, {1})")]
    NonFiniteVector(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputHandler {
    pub fn new(params: InputParams) -> Result<Self, InputError> {
        if !(params.deadband >= 0.0 && params.deadband < 1.0) {
            return Err(InputError::InvalidDeadband(params.deadband));
        }

        if let InputCurve::Poly { ref coeffs } = params.curve {
            if coeffs.is_empty() {
                return Err(InputError::EmptyPolyCurve);
            }
        }

        Ok(Self { params })
    }

    /// Shape a scalar input in [-1, 1], keeping its sign.
    pub fn apply(&self, value: f64) -> Result<f64, InputError> {
        if !(-1.0..=1.0).contains(&value) {
            return Err(InputError::InvalidInput(value));
        }

        Ok(self.shape(value.abs()).copysign(value))
    }

    /// Shape a vector input by its magnitude.
    ///
    /// The magnitude is limited to 1 first, since a stick pushed into a
    /// corner can exceed it.
    pub fn apply_vector(&self, input: PlanarVector) -> Result<PlanarVector, InputError> {
        if !(input.x().is_finite() && input.y().is_finite()) {
            return Err(InputError::NonFiniteVector(input.x(), input.y()));
        }

        let magnitude = input.magnitude().min(1.0);
        if magnitude == 0.0 {
            return Ok(PlanarVector::zero());
        }

        Ok(PlanarVector::from_polar(input.angle(), self.shape(magnitude)))
    }

    pub fn params(&self) -> &InputParams {
        &self.params
    }

    /// Deadband then curve, for a magnitude in [0, 1].
    fn shape(&self, magnitude: f64) -> f64 {
        let db = self.params.deadband;
        let stretched = ((magnitude - db) / (1.0 - db)).max(0.0);

        match self.params.curve {
            InputCurve::Linear => stretched,
            InputCurve::Square => stretched * stretched,
            InputCurve::ThreeHalvesPower => stretched.powf(1.5),
            InputCurve::Poly { ref coeffs } => {
                clamp(&poly_val(&stretched, coeffs), &0.0, &1.0)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn handler(deadband: f64, curve: InputCurve) -> InputHandler {
        InputHandler::new(InputParams { deadband, curve }).unwrap()
    }

    #[test]
    fn test_deadband() {
        let h = handler(0.1, InputCurve::Linear);

        assert_eq!(h.apply(0.05).unwrap(), 0.0);
        assert_eq!(h.apply(-0.1).unwrap(), 0.0);
        assert_abs_diff_eq!(h.apply(0.55).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(h.apply(-0.55).unwrap(), -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(h.apply(1.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curves() {
        assert_abs_diff_eq!(handler(0.0, InputCurve::Square).apply(-0.5).unwrap(), -0.25);
        assert_abs_diff_eq!(
            handler(0.0, InputCurve::ThreeHalvesPower).apply(0.25).unwrap(),
            0.125,
            epsilon = 1e-12
        );

        // 0.5x^2 + 0.5x
        let h = handler(0.0, InputCurve::Poly { coeffs: vec![0.5, 0.5, 0.0] });
        assert_abs_diff_eq!(h.apply(0.5).unwrap(), 0.375, epsilon = 1e-12);
        assert_abs_diff_eq!(h.apply(1.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vector_keeps_direction() {
        let h = handler(0.2, InputCurve::Square);
        let v = h.apply_vector(PlanarVector::from_polar(30.0, 0.6)).unwrap();

        assert_abs_diff_eq!(v.angle(), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v.magnitude(), 0.25, epsilon = 1e-12);

        // Corner of the stick
        let v = h.apply_vector(PlanarVector::new(1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(v.magnitude(), 1.0, epsilon = 1e-12);
        assert!(v.x() <= 1.0 && v.y() <= 1.0);

        assert_eq!(h.apply_vector(PlanarVector::zero()).unwrap(), PlanarVector::zero());
        assert_eq!(h.apply_vector(PlanarVector::new(0.1, 0.1)).unwrap().magnitude(), 0.0);
    }

    #[test]
    fn test_invalid() {
        assert!(InputHandler::new(InputParams { deadband: 1.0, ..Default::default() }).is_err());
        assert!(InputHandler::new(InputParams { deadband: -0.1, ..Default::default() }).is_err());
        assert_eq!(
            InputHandler::new(InputParams {
                deadband: 0.0,
                curve: InputCurve::Poly { coeffs: vec![] }
            }).unwrap_err(),
            InputError::EmptyPolyCurve
        );

        let h = handler(0.0, InputCurve::Linear);
        assert_eq!(h.apply(1.5), Err(InputError::InvalidInput(1.5)));
        assert!(h.apply(f64::NAN).is_err());
        assert!(h.apply_vector(PlanarVector::new(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_params_toml() {
        let p: InputParams = util::params::from_str(
            "deadband = 0.05\n[curve]\ntype = \"poly\"\ncoeffs = [1.0, 0.0]\n"
        ).unwrap();

        assert_eq!(p.deadband, 0.05);
        assert_eq!(p.curve, InputCurve::Poly { coeffs: vec![1.0, 0.0] });
    }
}
