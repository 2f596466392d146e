//! Model Builder
//!
//! Fluent construction of an [`EvppiConfig`]. Starts from an empty parameter
//! and scenario list; everything else falls back to the defaults.

use super::EvppiConfig;
use crate::error::SimulationError;
use crate::model::{Distribution, DoseResponseCurve, Parameter, Scenario};
use crate::smoothing::{BinnedMeans, PenalizedSpline, SmootherConfig};

/// Builder for run configurations, validated on `build`
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    config: EvppiConfig,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Create a builder with no parameters or scenarios
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EvppiConfig {
                parameters: Vec::new(),
                scenarios: Vec::new(),
                ..EvppiConfig::default()
            },
        }
    }

    // =========================================================================
    // Run settings
    // =========================================================================

    #[must_use]
    pub fn baseline_burden(mut self, burden: f64) -> Self {
        self.config.baseline_burden = burden;
        self
    }

    /// Set the number of Monte Carlo draws
    #[must_use]
    pub fn samples(mut self, n: usize) -> Self {
        self.config.n_samples = n;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Add an uncertain input; order must match the model's inputs
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, distribution: Distribution) -> Self {
        self.config.parameters.push(Parameter::new(name, distribution));
        self
    }

    /// Quick method for a lognormal input given its natural-scale moments
    #[must_use]
    pub fn lognormal(self, name: impl Into<String>, mean: f64, variance: f64) -> Self {
        self.parameter(name, Distribution::LogNormal { mean, variance })
    }

    #[must_use]
    pub fn beta(self, name: impl Into<String>, alpha: f64, beta: f64) -> Self {
        self.parameter(name, Distribution::Beta { alpha, beta })
    }

    /// Quick method for an input held constant
    #[must_use]
    pub fn fixed(self, name: impl Into<String>, value: f64) -> Self {
        self.parameter(name, Distribution::Fixed { value })
    }

    // =========================================================================
    // Scenarios and model shape
    // =========================================================================

    /// Add a scenario with travel-change multiplier `D`
    #[must_use]
    pub fn scenario(mut self, name: impl Into<String>, travel_multiplier: f64) -> Self {
        self.config
            .scenarios
            .push(Scenario::new(name, travel_multiplier));
        self
    }

    #[must_use]
    pub fn dose_response(mut self, curve: DoseResponseCurve) -> Self {
        self.config.dose_response = curve;
        self
    }

    #[must_use]
    pub fn linear_dose_response(self, slope: f64) -> Self {
        self.dose_response(DoseResponseCurve::Linear { slope })
    }

    #[must_use]
    pub fn smoother(mut self, smoother: SmootherConfig) -> Self {
        self.config.smoother = smoother;
        self
    }

    #[must_use]
    pub fn penalized_spline(self, spline: PenalizedSpline) -> Self {
        self.smoother(SmootherConfig::PenalizedSpline(spline))
    }

    #[must_use]
    pub fn binned_means(self, bins: usize) -> Self {
        self.smoother(SmootherConfig::BinnedMeans(BinnedMeans { bins }))
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Validate and return the configuration
    pub fn build(self) -> Result<EvppiConfig, SimulationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
