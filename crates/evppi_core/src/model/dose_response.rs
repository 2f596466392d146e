//! Dose-response curves mapping a PM2.5 concentration to a relative-risk contribution

use serde::{Deserialize, Serialize};

use crate::error::ForwardModelError;

/// A concentration-response function `f` with `f(0) = 0`.
///
/// Implementations reject negative or non-finite concentrations. Any
/// `Fn(f64) -> f64` closure is a `DoseResponse`, which keeps the forward model
/// agnostic of where the curve comes from.
pub trait DoseResponse: Sync {
    fn evaluate(&self, concentration: f64) -> Result<f64, ForwardModelError>;
}

fn check_concentration(concentration: f64) -> Result<(), ForwardModelError> {
    if !concentration.is_finite() {
        return Err(ForwardModelError::NonFinite {
            quantity: "concentration",
            value: concentration,
        });
    }
    if concentration < 0.0 {
        return Err(ForwardModelError::NegativeConcentration(concentration));
    }
    Ok(())
}

fn check_response(response: f64) -> Result<f64, ForwardModelError> {
    if response.is_finite() {
        Ok(response)
    } else {
        Err(ForwardModelError::NonFinite {
            quantity: "dose-response",
            value: response,
        })
    }
}

impl<F> DoseResponse for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn evaluate(&self, concentration: f64) -> Result<f64, ForwardModelError> {
        check_concentration(concentration)?;
        check_response(self(concentration))
    }
}

/// Built-in curve shapes that can be named in a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DoseResponseCurve {
    /// `slope * c`
    Linear { slope: f64 },
    /// `exp(coefficient * c) - 1`
    LogLinear { coefficient: f64 },
    /// `coefficient * c^exponent`
    Power { coefficient: f64, exponent: f64 },
}

impl Default for DoseResponseCurve {
    fn default() -> Self {
        // 10% excess per 10 ug/m3
        DoseResponseCurve::Linear { slope: 0.01 }
    }
}

impl DoseResponseCurve {
    /// Setup-time check that the curve is monotone with `f(0) = 0`
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            DoseResponseCurve::Linear { slope } if !slope.is_finite() || slope < 0.0 => {
                Err(format!("linear slope must be non-negative and finite, got {slope}"))
            }
            DoseResponseCurve::LogLinear { coefficient }
                if !coefficient.is_finite() || coefficient < 0.0 =>
            {
                Err(format!(
                    "log-linear coefficient must be non-negative and finite, got {coefficient}"
                ))
            }
            DoseResponseCurve::Power {
                coefficient,
                exponent,
            } if !coefficient.is_finite()
                || coefficient < 0.0
                || !exponent.is_finite()
                || exponent <= 0.0 =>
            {
                Err(format!(
                    "power curve needs coefficient >= 0 and exponent > 0, got {coefficient} and {exponent}"
                ))
            }
            _ => Ok(()),
        }
    }
}

impl DoseResponse for DoseResponseCurve {
    fn evaluate(&self, concentration: f64) -> Result<f64, ForwardModelError> {
        check_concentration(concentration)?;
        let response = match *self {
            DoseResponseCurve::Linear { slope } => slope * concentration,
            DoseResponseCurve::LogLinear { coefficient } => (coefficient * concentration).exp_m1(),
            DoseResponseCurve::Power {
                coefficient,
                exponent,
            } => coefficient * concentration.powf(exponent),
        };
        check_response(response)
    }
}
