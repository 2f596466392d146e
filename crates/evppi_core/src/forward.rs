//! Forward model: one draw of the uncertain inputs to one outcome per scenario

use crate::error::ForwardModelError;
use crate::model::{DoseResponse, Scenario};

/// Maps one draw of every uncertain input, plus a scenario, to a scalar outcome.
///
/// The draw is indexed in the same order as the run's parameter list.
pub trait ForwardModel: Sync {
    /// Number of values expected in each draw
    fn input_count(&self) -> usize;

    fn evaluate(&self, draw: &[f64], scenario: &Scenario) -> Result<f64, ForwardModelError>;
}

/// Health burden attributable to PM2.5 under a change in car travel.
///
/// Draws are `(background_pm25, car_fraction, dose_response_scale)`.
#[derive(Debug, Clone)]
pub struct PollutionBurdenModel<D> {
    pub baseline_burden: f64,
    pub dose_response: D,
}

impl<D: DoseResponse> PollutionBurdenModel<D> {
    pub const INPUTS: [&'static str; 3] =
        ["background_pm25", "car_fraction", "dose_response_scale"];

    pub fn new(baseline_burden: f64, dose_response: D) -> Result<Self, ForwardModelError> {
        if !baseline_burden.is_finite() || baseline_burden <= 0.0 {
            return Err(ForwardModelError::InvalidBaseline(baseline_burden));
        }
        Ok(Self {
            baseline_burden,
            dose_response,
        })
    }
}

impl<D: DoseResponse> ForwardModel for PollutionBurdenModel<D> {
    fn input_count(&self) -> usize {
        Self::INPUTS.len()
    }

    fn evaluate(&self, draw: &[f64], scenario: &Scenario) -> Result<f64, ForwardModelError> {
        let &[background_pm25, car_fraction, dose_response_scale] = draw else {
            return Err(ForwardModelError::InputCountMismatch {
                expected: Self::INPUTS.len(),
                actual: draw.len(),
            });
        };
        scenario_burden(
            self.baseline_burden,
            background_pm25,
            car_fraction,
            dose_response_scale,
            scenario.travel_multiplier,
            &self.dose_response,
        )
    }
}

/// Scenario burden for a single draw.
///
/// Baseline relative risk uses the unscaled background concentration while the
/// scenario relative risk uses the travel-adjusted one; the two arguments to
/// `f` differ on purpose.
pub fn scenario_burden<D: DoseResponse + ?Sized>(
    baseline_burden: f64,
    background_pm25: f64,
    car_fraction: f64,
    dose_response_scale: f64,
    travel_multiplier: f64,
    dose_response: &D,
) -> Result<f64, ForwardModelError> {
    // x2 * D + 1 - x2, arranged so that D = 1 gives exactly 1
    let pm25_scenario = background_pm25 * (1.0 + car_fraction * (travel_multiplier - 1.0));
    let rr_baseline = 1.0 + (dose_response_scale - 1.0) * dose_response.evaluate(background_pm25)?;
    let rr_scenario = 1.0 + (dose_response_scale - 1.0) * dose_response.evaluate(pm25_scenario)?;

    let burden = baseline_burden * (rr_scenario / rr_baseline);
    if burden.is_finite() {
        Ok(burden)
    } else {
        Err(ForwardModelError::NonFinite {
            quantity: "scenario burden",
            value: burden,
        })
    }
}
