//! Parameters for the input handler

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Input handling parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    /// Input magnitude at or below which the input is treated as zero.
    ///
    /// Units: normalised [0, 1)
    pub deadband: f64,

    /// Response curve applied after the deadband.
    pub curve: InputCurve,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Maps [0, 1] onto itself, with 0 to 0 and 1 to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputCurve {
    Linear,

    /// `x^2`, fine control at low inputs.
    Square,

    /// `x^1.5`
    ThreeHalvesPower,

    /// Polynomial with coefficients given highest power first. The output
    /// is clamped to [0, 1].
    Poly { coeffs: Vec<f64> },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for InputCurve {
    fn default() -> Self {
        InputCurve::Linear
    }
}
