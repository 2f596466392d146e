//! Univariate nonparametric regression strategies
//!
//! The estimator only relies on the [`Smoother`] contract: given paired
//! samples `(x, y)`, return fitted values approximating `E[y | x]` at every
//! sample point, in input order.

mod binned;
mod pspline;

pub use binned::BinnedMeans;
pub use pspline::PenalizedSpline;

use serde::{Deserialize, Serialize};

use crate::error::SmootherError;

pub trait Smoother: Sync {
    fn fit(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, SmootherError>;
}

/// Serializable choice of smoother, as named in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SmootherConfig {
    PenalizedSpline(PenalizedSpline),
    BinnedMeans(BinnedMeans),
}

impl Default for SmootherConfig {
    fn default() -> Self {
        SmootherConfig::PenalizedSpline(PenalizedSpline::default())
    }
}

impl SmootherConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SmootherConfig::PenalizedSpline(_) => "penalized spline",
            SmootherConfig::BinnedMeans(_) => "binned means",
        }
    }

    /// Check settings that would make every fit fail or loop over nothing
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SmootherConfig::PenalizedSpline(s) => {
                if s.segments == 0 {
                    return Err("penalized spline needs at least one segment".to_string());
                }
                if s.lambda_steps == 0 {
                    return Err("penalized spline needs at least one lambda step".to_string());
                }
                if !s.log10_lambda_min.is_finite()
                    || !s.log10_lambda_max.is_finite()
                    || s.log10_lambda_min > s.log10_lambda_max
                {
                    return Err(format!(
                        "invalid lambda range [{}, {}]",
                        s.log10_lambda_min, s.log10_lambda_max
                    ));
                }
                Ok(())
            }
            SmootherConfig::BinnedMeans(b) if b.bins == 0 => {
                Err("binned means needs at least one bin".to_string())
            }
            SmootherConfig::BinnedMeans(_) => Ok(()),
        }
    }
}

impl Smoother for SmootherConfig {
    fn fit(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, SmootherError> {
        match self {
            SmootherConfig::PenalizedSpline(s) => s.fit(x, y),
            SmootherConfig::BinnedMeans(s) => s.fit(x, y),
        }
    }
}

/// Shared input checks for every smoother
fn check_inputs(x: &[f64], y: &[f64], required: usize) -> Result<(), SmootherError> {
    if x.len() != y.len() {
        return Err(SmootherError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < required {
        return Err(SmootherError::TooFewPoints {
            required,
            actual: x.len(),
        });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(SmootherError::NonFinite);
    }
    Ok(())
}
