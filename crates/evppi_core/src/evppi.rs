//! Single-parameter EVPPI by nonparametric regression
//!
//! For parameter `i` and scenario `j` the outcome column is regressed on the
//! parameter column alone. The mean squared residual estimates `E[Var(y | x)]`,
//! and the explained share of `Var(y)` is reported as a percentage.

use crate::error::{EstimationError, SmootherError};
use crate::model::{Grid, MonteCarloResult};
use crate::smoothing::Smoother;
use crate::stats::{mean, mean_squared_residual, sample_variance};

/// EVPPI percentages for every `(parameter, scenario)` pair.
///
/// Cells that could not be estimated keep their error; they are never
/// reported as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EvppiResult {
    pub parameter_names: Vec<String>,
    pub scenario_names: Vec<String>,
    /// `n_parameters x n_scenarios`
    pub cells: Grid<Result<f64, EstimationError>>,
    pub n_samples: usize,
}

impl EvppiResult {
    pub fn get(&self, parameter: usize, scenario: usize) -> Option<&Result<f64, EstimationError>> {
        self.cells.get(parameter, scenario)
    }

    /// Cell lookup by labels
    pub fn cell(&self, parameter: &str, scenario: &str) -> Option<&Result<f64, EstimationError>> {
        let i = self.parameter_names.iter().position(|n| n == parameter)?;
        let j = self.scenario_names.iter().position(|n| n == scenario)?;
        self.get(i, j)
    }

    /// The estimate for a cell, or `None` if the labels are unknown or the cell failed
    pub fn value(&self, parameter: &str, scenario: &str) -> Option<f64> {
        self.cell(parameter, scenario)?.as_ref().ok().copied()
    }

    /// Parameters of one scenario ordered by descending EVPPI; failed cells are left out.
    pub fn ranked(&self, scenario: &str) -> Vec<(&str, f64)> {
        let Some(j) = self.scenario_names.iter().position(|n| n == scenario) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&str, f64)> = self
            .parameter_names
            .iter()
            .zip(self.cells.column(j))
            .filter_map(|(name, cell)| cell.as_ref().ok().map(|v| (name.as_str(), *v)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn errors(&self) -> impl Iterator<Item = &EstimationError> + '_ {
        self.cells.data().iter().filter_map(|cell| cell.as_ref().err())
    }

    pub fn is_complete(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Estimate EVPPI for every parameter against every scenario column.
///
/// Cells are independent; a failure in one never affects another.
pub fn estimate_evppi<S: Smoother + ?Sized>(result: &MonteCarloResult, smoother: &S) -> EvppiResult {
    let n_params = result.parameter_names.len();
    let n_scenarios = result.scenario_names.len();

    let inputs: Vec<Vec<f64>> = (0..n_params)
        .map(|i| result.samples.column_vec(i))
        .collect();
    let outcomes: Vec<Vec<f64>> = (0..n_scenarios)
        .map(|j| result.outcomes.column_vec(j))
        .collect();
    let variances: Vec<Result<f64, EstimationError>> = outcomes
        .iter()
        .zip(&result.scenario_names)
        .map(|(y, name)| outcome_variance(y, name))
        .collect();

    let cell = |i: usize, j: usize| -> Result<f64, EstimationError> {
        let var_y = variances[j].clone()?;
        let y = &outcomes[j];
        let failure = |source| EstimationError::RegressionFailure {
            parameter: result.parameter_names[i].clone(),
            scenario: result.scenario_names[j].clone(),
            source,
        };
        let fitted = smoother.fit(&inputs[i], y).map_err(failure)?;
        let residual_var = mean_squared_residual(y, &fitted).ok_or_else(|| {
            failure(SmootherError::LengthMismatch {
                x: y.len(),
                y: fitted.len(),
            })
        })?;
        if !residual_var.is_finite() {
            return Err(failure(SmootherError::NonFinite));
        }
        Ok(100.0 * (var_y - residual_var) / var_y)
    };

    #[cfg(feature = "parallel")]
    let cells = Grid::par_from_fn(n_params, n_scenarios, cell);
    #[cfg(not(feature = "parallel"))]
    let cells = Grid::from_fn(n_params, n_scenarios, cell);

    for error in cells.data().iter().filter_map(|c| c.as_ref().err()) {
        tracing::warn!(%error, "EVPPI cell not estimated");
    }
    tracing::info!(
        n_parameters = n_params,
        n_scenarios = n_scenarios,
        n_samples = result.n_samples(),
        "EVPPI estimation complete"
    );

    EvppiResult {
        parameter_names: result.parameter_names.clone(),
        scenario_names: result.scenario_names.clone(),
        cells,
        n_samples: result.n_samples(),
    }
}

/// Sample variance of an outcome column, or `DegenerateVariance` when there is
/// nothing to explain.
///
/// Variance within rounding of zero relative to the column mean counts as zero.
fn outcome_variance(y: &[f64], scenario: &str) -> Result<f64, EstimationError> {
    let degenerate = || EstimationError::DegenerateVariance {
        scenario: scenario.to_string(),
    };
    let var_y = sample_variance(y).ok_or_else(degenerate)?;
    let m = mean(y).unwrap_or(0.0);
    if !var_y.is_finite() || var_y <= f64::EPSILON * m * m {
        return Err(degenerate());
    }
    Ok(var_y)
}
