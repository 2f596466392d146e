//! Univariate input distributions
//!
//! Sampling goes through `rand_distr`; densities come from `statrs` and are
//! only used for diagnostics, never by the estimator.

use rand::Rng;
use rand::distr::Distribution as _;
use serde::{Deserialize, Serialize};
use statrs::distribution::Continuous;

use crate::error::DistributionError;

/// A sampleable, density-evaluable univariate distribution.
///
/// `LogNormal` is parameterized on the natural scale: `mean` and `variance`
/// are the moments of the sampled values, not of their logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Distribution {
    LogNormal { mean: f64, variance: f64 },
    Beta { alpha: f64, beta: f64 },
    Normal { mean: f64, std_dev: f64 },
    Uniform { min: f64, max: f64 },
    /// Point mass, useful for pinning an input while keeping its column
    Fixed { value: f64 },
}

/// Convert natural-scale lognormal moments to the log-scale `(mu, sigma)` pair.
#[must_use]
pub fn lognormal_log_scale(mean: f64, variance: f64) -> (f64, f64) {
    let mean_sq = mean * mean;
    let mu = (mean_sq / (variance + mean_sq).sqrt()).ln();
    let sigma_sq = (1.0 + variance / mean_sq).ln();
    (mu, sigma_sq.sqrt())
}

fn invalid(
    family: &'static str,
    name: &'static str,
    value: f64,
    reason: &'static str,
) -> DistributionError {
    DistributionError::InvalidParameter {
        family,
        name,
        value,
        reason,
    }
}

impl Distribution {
    /// Short family name for labels and error messages
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Distribution::LogNormal { .. } => "LogNormal",
            Distribution::Beta { .. } => "Beta",
            Distribution::Normal { .. } => "Normal",
            Distribution::Uniform { .. } => "Uniform",
            Distribution::Fixed { .. } => "Fixed",
        }
    }

    /// Check the parameters without drawing anything.
    pub fn validate(&self) -> Result<(), DistributionError> {
        match *self {
            Distribution::LogNormal { mean, variance } => {
                if !mean.is_finite() || mean <= 0.0 {
                    return Err(invalid("LogNormal", "mean", mean, "must be positive and finite"));
                }
                if !variance.is_finite() || variance < 0.0 {
                    return Err(invalid(
                        "LogNormal",
                        "variance",
                        variance,
                        "must be non-negative and finite",
                    ));
                }
            }
            Distribution::Beta { alpha, beta } => {
                if !alpha.is_finite() || alpha <= 0.0 {
                    return Err(invalid("Beta", "alpha", alpha, "must be positive and finite"));
                }
                if !beta.is_finite() || beta <= 0.0 {
                    return Err(invalid("Beta", "beta", beta, "must be positive and finite"));
                }
            }
            Distribution::Normal { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(invalid("Normal", "mean", mean, "must be finite"));
                }
                if !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(invalid(
                        "Normal",
                        "std_dev",
                        std_dev,
                        "must be non-negative and finite",
                    ));
                }
            }
            Distribution::Uniform { min, max } => {
                if !min.is_finite() {
                    return Err(invalid("Uniform", "min", min, "must be finite"));
                }
                if !max.is_finite() || max <= min {
                    return Err(invalid("Uniform", "max", max, "must be finite and above min"));
                }
            }
            Distribution::Fixed { value } => {
                if !value.is_finite() {
                    return Err(invalid("Fixed", "value", value, "must be finite"));
                }
            }
        }
        Ok(())
    }

    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        self.validate()?;
        match *self {
            Distribution::LogNormal { mean, variance } => {
                let (mu, sigma) = lognormal_log_scale(mean, variance);
                rand_distr::LogNormal::new(mu, sigma)
                    .map(|d| d.sample(rng))
                    .map_err(|_| invalid("LogNormal", "variance", variance, "log-scale sigma is invalid"))
            }
            Distribution::Beta { alpha, beta } => rand_distr::Beta::new(alpha, beta)
                .map(|d| d.sample(rng))
                .map_err(|_| invalid("Beta", "alpha", alpha, "shape parameters rejected")),
            Distribution::Normal { mean, std_dev } => rand_distr::Normal::new(mean, std_dev)
                .map(|d| d.sample(rng))
                .map_err(|_| invalid("Normal", "std_dev", std_dev, "must be non-negative and finite")),
            Distribution::Uniform { min, max } => rand::distr::Uniform::new(min, max)
                .map(|d| d.sample(rng))
                .map_err(|_| invalid("Uniform", "max", max, "must be finite and above min")),
            Distribution::Fixed { value } => Ok(value),
        }
    }

    /// Probability density at `x`.
    ///
    /// Degenerate laws (zero spread, point mass) report 0 everywhere.
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        if self.validate().is_err() || !x.is_finite() {
            return 0.0;
        }
        let pdf = match *self {
            Distribution::LogNormal { mean, variance } => {
                let (mu, sigma) = lognormal_log_scale(mean, variance);
                statrs::distribution::LogNormal::new(mu, sigma)
                    .ok()
                    .map(|d| if x > 0.0 { d.pdf(x) } else { 0.0 })
            }
            Distribution::Beta { alpha, beta } => statrs::distribution::Beta::new(alpha, beta)
                .ok()
                .map(|d| if x > 0.0 && x < 1.0 { d.pdf(x) } else { 0.0 }),
            Distribution::Normal { mean, std_dev } => {
                statrs::distribution::Normal::new(mean, std_dev)
                    .ok()
                    .map(|d| d.pdf(x))
            }
            Distribution::Uniform { min, max } => statrs::distribution::Uniform::new(min, max)
                .ok()
                .map(|d| d.pdf(x)),
            Distribution::Fixed { .. } => None,
        };
        pdf.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    /// Analytic mean of the law
    #[must_use]
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::LogNormal { mean, .. } => mean,
            Distribution::Beta { alpha, beta } => alpha / (alpha + beta),
            Distribution::Normal { mean, .. } => mean,
            Distribution::Uniform { min, max } => 0.5 * (min + max),
            Distribution::Fixed { value } => value,
        }
    }
}
