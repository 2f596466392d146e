//! Run configuration
//!
//! `EvppiConfig` holds everything needed for a run: the baseline burden, the
//! uncertain inputs, the scenarios, the dose-response curve and the smoother.
//! It is plain serde data so it can be loaded from a file; `validate` catches
//! every setup-time error before any sampling starts.
//!
//! # Builder DSL
//!
//! ```ignore
//! use evppi_core::config::ModelBuilder;
//!
//! let config = ModelBuilder::new()
//!     .baseline_burden(18_530.0)
//!     .lognormal("background_pm25", 10.0, 4.0)
//!     .beta("car_fraction", 3.0, 7.0)
//!     .lognormal("dose_response_scale", 1.2, 0.01)
//!     .scenario("decrease", 0.5)
//!     .scenario("increase", 1.5)
//!     .samples(5_000)
//!     .build()?;
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::forward::PollutionBurdenModel;
use crate::model::{
    Distribution, DoseResponseCurve, MonteCarloConfig, MonteCarloResult, Parameter, Scenario,
};
use crate::simulation::{RunProgress, monte_carlo_run_with_progress};
use crate::smoothing::SmootherConfig;

pub mod builder;

pub use builder::ModelBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvppiConfig {
    /// Attributable burden under current exposure (e.g. deaths per year)
    pub baseline_burden: f64,
    pub n_samples: usize,
    pub seed: u64,
    /// Positional inputs of the pollution model: background PM2.5, car
    /// fraction, dose-response scale
    pub parameters: Vec<Parameter>,
    pub scenarios: Vec<Scenario>,
    pub dose_response: DoseResponseCurve,
    pub smoother: SmootherConfig,
}

impl Default for EvppiConfig {
    fn default() -> Self {
        Self {
            baseline_burden: 18_530.0,
            n_samples: MonteCarloConfig::default().n_samples,
            seed: MonteCarloConfig::default().seed,
            parameters: vec![
                Parameter::new(
                    "background_pm25",
                    Distribution::LogNormal {
                        mean: 10.0,
                        variance: 4.0,
                    },
                ),
                Parameter::new(
                    "car_fraction",
                    Distribution::Beta {
                        alpha: 3.0,
                        beta: 7.0,
                    },
                ),
                Parameter::new(
                    "dose_response_scale",
                    Distribution::LogNormal {
                        mean: 1.2,
                        variance: 0.01,
                    },
                ),
            ],
            scenarios: vec![Scenario::new("decrease", 0.5), Scenario::new("increase", 1.5)],
            dose_response: DoseResponseCurve::default(),
            smoother: SmootherConfig::default(),
        }
    }
}

impl EvppiConfig {
    pub fn monte_carlo_config(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            n_samples: self.n_samples,
            seed: self.seed,
        }
    }

    /// Check every setup-time condition. Nothing is sampled if this fails.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.baseline_burden.is_finite() || self.baseline_burden <= 0.0 {
            return Err(SimulationError::Config(format!(
                "baseline_burden must be positive and finite, got {}",
                self.baseline_burden
            )));
        }
        if self.n_samples == 0 {
            return Err(SimulationError::Config(
                "n_samples must be at least 1".to_string(),
            ));
        }

        let expected = PollutionBurdenModel::<DoseResponseCurve>::INPUTS;
        if self.parameters.len() != expected.len() {
            return Err(SimulationError::Config(format!(
                "expected {} parameters ({}), got {}",
                expected.len(),
                expected.join(", "),
                self.parameters.len()
            )));
        }
        for parameter in &self.parameters {
            parameter.validate()?;
        }
        check_unique("parameter", self.parameters.iter().map(|p| p.name.as_str()))?;

        if self.scenarios.is_empty() {
            return Err(SimulationError::Config("no scenarios defined".to_string()));
        }
        if let Some(s) = self
            .scenarios
            .iter()
            .find(|s| !s.travel_multiplier.is_finite() || s.travel_multiplier < 0.0)
        {
            return Err(SimulationError::Config(format!(
                "scenario {} has invalid travel multiplier {}",
                s.name, s.travel_multiplier
            )));
        }
        check_unique("scenario", self.scenarios.iter().map(|s| s.name.as_str()))?;

        self.dose_response.validate().map_err(SimulationError::Config)?;
        self.smoother.validate().map_err(SimulationError::Config)?;
        Ok(())
    }

    pub fn build_model(&self) -> Result<PollutionBurdenModel<DoseResponseCurve>, SimulationError> {
        Ok(PollutionBurdenModel::new(
            self.baseline_burden,
            self.dose_response,
        )?)
    }

    /// Validate, then sample every parameter and evaluate every scenario
    pub fn run(&self) -> Result<MonteCarloResult, SimulationError> {
        self.run_with_progress(None)
    }

    pub fn run_with_progress(
        &self,
        progress: Option<&RunProgress>,
    ) -> Result<MonteCarloResult, SimulationError> {
        self.validate()?;
        let model = self.build_model()?;
        monte_carlo_run_with_progress(
            &self.parameters,
            &self.scenarios,
            &model,
            &self.monte_carlo_config(),
            progress,
        )
    }
}

fn check_unique<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), SimulationError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(SimulationError::Config(format!("{kind} with empty name")));
        }
        if !seen.insert(name) {
            return Err(SimulationError::Config(format!(
                "duplicate {kind} name {name}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DistributionError;
    use crate::smoothing::BinnedMeans;

    #[test]
    fn test_default_config_is_valid() {
        let config = EvppiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parameters.len(), 3);
        assert_eq!(config.scenarios.len(), 2);
    }

    #[test]
    fn test_invalid_distribution_is_setup_error() {
        let mut config = EvppiConfig::default();
        config.parameters[1].distribution = Distribution::Beta {
            alpha: 0.0,
            beta: 2.0,
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::Distribution(
                DistributionError::InvalidParameter { .. }
            ))
        ));
        // run() refuses before sampling
        assert!(config.run().is_err());
    }

    #[test]
    fn test_wrong_parameter_count() {
        let mut config = EvppiConfig::default();
        config.parameters.pop();
        assert!(matches!(config.validate(), Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut config = EvppiConfig::default();
        config.scenarios.push(Scenario::new("decrease", 0.8));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate scenario"));
    }

    #[test]
    fn test_bad_baseline_and_samples() {
        let config = EvppiConfig {
            baseline_burden: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvppiConfig {
            n_samples: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_smoother_rejected() {
        let config = EvppiConfig {
            smoother: SmootherConfig::BinnedMeans(BinnedMeans { bins: 0 }),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_run_shapes() {
        let config = EvppiConfig {
            n_samples: 250,
            ..Default::default()
        };
        let result = config.run().unwrap();
        assert_eq!(result.samples.shape(), (250, 3));
        assert_eq!(result.outcomes.shape(), (250, 2));
        assert_eq!(result.scenario_names, vec!["decrease", "increase"]);
    }
}
