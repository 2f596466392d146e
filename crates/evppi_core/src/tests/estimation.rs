//! EVPPI on synthetic models with known answers
//!
//! These tests verify:
//! - A parameter that fully determines the outcome scores ~100
//! - A parameter the outcome ignores scores ~0
//! - Additive contributions split the variance between parameters
//! - Zero-variance outcomes are reported, not turned into numbers

use crate::error::{EstimationError, ForwardModelError};
use crate::evppi::estimate_evppi;
use crate::forward::ForwardModel;
use crate::model::{Distribution, MonteCarloConfig, MonteCarloResult, Parameter, Scenario};
use crate::simulation::monte_carlo_run;
use crate::smoothing::{BinnedMeans, PenalizedSpline, SmootherConfig};

/// Outcome is `D * g(x0)`; every other input is ignored
struct OnlyFirst;

impl ForwardModel for OnlyFirst {
    fn input_count(&self) -> usize {
        2
    }

    fn evaluate(&self, draw: &[f64], scenario: &Scenario) -> Result<f64, ForwardModelError> {
        let x = draw[0];
        Ok(scenario.travel_multiplier * (x * x + (3.0 * x).sin()))
    }
}

/// Outcome is `x0 + x1`
struct Additive;

impl ForwardModel for Additive {
    fn input_count(&self) -> usize {
        2
    }

    fn evaluate(&self, draw: &[f64], _scenario: &Scenario) -> Result<f64, ForwardModelError> {
        Ok(draw[0] + draw[1])
    }
}

fn run<M: ForwardModel>(model: &M, parameters: &[Parameter], n_samples: usize) -> MonteCarloResult {
    let scenarios = [Scenario::new("base", 1.0), Scenario::new("scaled", 3.0)];
    let config = MonteCarloConfig {
        n_samples,
        seed: 2024,
    };
    monte_carlo_run(parameters, &scenarios, model, &config).unwrap()
}

fn two_inputs() -> Vec<Parameter> {
    vec![
        Parameter::new("driver", Distribution::Uniform { min: 0.0, max: 2.0 }),
        Parameter::new("noise", Distribution::Normal { mean: 0.0, std_dev: 1.0 }),
    ]
}

#[test]
fn test_deterministic_parameter_scores_one_hundred() {
    let result = run(&OnlyFirst, &two_inputs(), 2_000);
    let evppi = estimate_evppi(&result, &PenalizedSpline::default());

    for scenario in ["base", "scaled"] {
        let driver = evppi.value("driver", scenario).unwrap();
        assert!(driver > 99.0 && driver < 100.0 + 1e-9, "driver {driver}");
    }
}

#[test]
fn test_irrelevant_parameter_scores_near_zero() {
    let result = run(&OnlyFirst, &two_inputs(), 2_000);
    let evppi = estimate_evppi(&result, &PenalizedSpline::default());

    for scenario in ["base", "scaled"] {
        let noise = evppi.value("noise", scenario).unwrap();
        assert!(noise.abs() < 3.0, "noise {noise}");
    }
    assert_eq!(evppi.ranked("base")[0].0, "driver");
}

#[test]
fn test_more_samples_tighten_irrelevant_estimate() {
    let spline = PenalizedSpline::default();
    let small = estimate_evppi(&run(&OnlyFirst, &two_inputs(), 300), &spline);
    let large = estimate_evppi(&run(&OnlyFirst, &two_inputs(), 5_000), &spline);

    let large_noise = large.value("noise", "base").unwrap();
    assert!(large_noise.abs() < 1.0, "noise {large_noise}");
    assert!(small.value("driver", "base").unwrap() > 95.0);
    assert!(large.value("driver", "base").unwrap() > 99.0);
}

#[test]
fn test_additive_inputs_split_variance() {
    let parameters = vec![
        Parameter::new("a", Distribution::Normal { mean: 0.0, std_dev: 1.0 }),
        Parameter::new("b", Distribution::Normal { mean: 5.0, std_dev: 1.0 }),
    ];
    let result = run(&Additive, &parameters, 4_000);

    for smoother in [
        SmootherConfig::PenalizedSpline(PenalizedSpline::default()),
        SmootherConfig::BinnedMeans(BinnedMeans::default()),
    ] {
        let evppi = estimate_evppi(&result, &smoother);
        let a = evppi.value("a", "base").unwrap();
        let b = evppi.value("b", "base").unwrap();
        assert!((a - 50.0).abs() < 6.0, "{}: a = {a}", smoother.name());
        assert!((b - 50.0).abs() < 6.0, "{}: b = {b}", smoother.name());
    }
}

#[test]
fn test_single_draw_is_degenerate_for_every_scenario() {
    let result = run(&OnlyFirst, &two_inputs(), 1);
    let evppi = estimate_evppi(&result, &PenalizedSpline::default());

    assert_eq!(evppi.n_samples, 1);
    assert_eq!(evppi.errors().count(), 4);
    for scenario in ["base", "scaled"] {
        for parameter in ["driver", "noise"] {
            assert!(matches!(
                evppi.cell(parameter, scenario),
                Some(Err(EstimationError::DegenerateVariance { .. }))
            ));
        }
    }
}

#[test]
fn test_constant_outcome_is_degenerate() {
    let parameters = vec![
        Parameter::new("driver", Distribution::Fixed { value: 1.5 }),
        Parameter::new("noise", Distribution::Normal { mean: 0.0, std_dev: 1.0 }),
    ];
    let result = run(&OnlyFirst, &parameters, 500);
    let evppi = estimate_evppi(&result, &PenalizedSpline::default());

    assert!(
        evppi
            .errors()
            .all(|e| matches!(e, EstimationError::DegenerateVariance { .. }))
    );
    assert_eq!(evppi.errors().count(), 4);
}

#[test]
fn test_spline_failure_reported_per_cell() {
    // Three draws: enough variance to estimate, too few points for the spline
    let result = run(&OnlyFirst, &two_inputs(), 3);
    let evppi = estimate_evppi(&result, &PenalizedSpline::default());

    assert!(evppi.errors().all(|e| matches!(
        e,
        EstimationError::RegressionFailure {
            source: crate::error::SmootherError::TooFewPoints { .. },
            ..
        }
    )));
    assert!(evppi.value("driver", "base").is_none());
}
