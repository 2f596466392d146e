//! Monte Carlo run output
//!
//! Row `i` of `samples` and row `i` of `outcomes` always come from the same draw.

use serde::{Deserialize, Serialize};

use super::grid::{OutcomeMatrix, SampleMatrix};
use crate::stats::{mean, percentile_sorted, sample_variance};

/// Percentiles reported in outcome summaries
pub const STANDARD_PERCENTILES: [f64; 3] = [0.05, 0.50, 0.95];

/// Configuration for a Monte Carlo run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of i.i.d. draws (rows in both matrices)
    pub n_samples: usize,
    /// Base seed from which every batch seed is drawn
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_samples: 1_000,
            seed: 42,
        }
    }
}

/// Both matrices of a completed run, with the labels of their columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub parameter_names: Vec<String>,
    pub scenario_names: Vec<String>,
    pub samples: SampleMatrix,
    pub outcomes: OutcomeMatrix,
}

impl MonteCarloResult {
    pub fn n_samples(&self) -> usize {
        self.samples.rows()
    }

    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameter_names.iter().position(|n| n == name)
    }

    pub fn scenario_index(&self, name: &str) -> Option<usize> {
        self.scenario_names.iter().position(|n| n == name)
    }

    /// Summarize the outcome distribution of every scenario
    pub fn outcome_summaries(&self) -> Vec<OutcomeSummary> {
        self.scenario_names
            .iter()
            .enumerate()
            .map(|(j, name)| OutcomeSummary::from_values(name, &self.outcomes.column_vec(j)))
            .collect()
    }
}

/// Descriptive statistics of one scenario's outcome column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub scenario: String,
    pub mean: f64,
    /// Sample standard deviation; 0 when fewer than two draws
    pub std_dev: f64,
    /// (percentile as 0-1, value)
    pub percentiles: Vec<(f64, f64)>,
}

impl OutcomeSummary {
    pub fn from_values(scenario: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let percentiles = STANDARD_PERCENTILES
            .iter()
            .filter_map(|&p| percentile_sorted(&sorted, p).map(|v| (p, v)))
            .collect();

        Self {
            scenario: scenario.to_string(),
            mean: mean(values).unwrap_or(f64::NAN),
            std_dev: sample_variance(values).map_or(0.0, f64::sqrt),
            percentiles,
        }
    }

    /// Look up a stored percentile (tolerance 0.001)
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(q, _)| (q - p).abs() < 0.001)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grid;

    #[test]
    fn test_outcome_summary() {
        let values: Vec<f64> = (1..=101).map(f64::from).collect();
        let summary = OutcomeSummary::from_values("s", &values);

        assert_eq!(summary.mean, 51.0);
        assert_eq!(summary.percentile(0.5), Some(51.0));
        assert_eq!(summary.percentile(0.05), Some(6.0));
        assert_eq!(summary.percentile(0.95), Some(96.0));
        assert_eq!(summary.percentile(0.25), None);
    }

    #[test]
    fn test_result_lookup() {
        let result = MonteCarloResult {
            parameter_names: vec!["a".into(), "b".into()],
            scenario_names: vec!["s".into()],
            samples: Grid::from_data(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap(),
            outcomes: Grid::from_data(2, 1, vec![10.0, 20.0]).unwrap(),
        };

        assert_eq!(result.n_samples(), 2);
        assert_eq!(result.parameter_index("b"), Some(1));
        assert_eq!(result.scenario_index("missing"), None);

        let summaries = result.outcome_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].mean, 15.0);
    }
}
