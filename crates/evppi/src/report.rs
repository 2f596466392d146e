//! Plain-text tables and the YAML results document

use std::fmt::Write as _;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use evppi_core::config::EvppiConfig;
use evppi_core::evppi::EvppiResult;
use evppi_core::model::{MonteCarloResult, OutcomeSummary};
use serde::{Deserialize, Serialize};

use crate::util::format::{format_percent, format_thousands};
use crate::util::io::atomic_write;

const LABEL_WIDTH: usize = 22;
const CELL_WIDTH: usize = 12;

/// Outcome distribution per scenario: mean, sd and 5/50/95th percentiles
pub fn format_outcome_table(summaries: &[OutcomeSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}",
        "Scenario", "Mean", "Std dev", "P5", "P50", "P95"
    );
    for summary in summaries {
        let cell = |p: f64| {
            summary
                .percentile(p)
                .map_or_else(|| "-".to_string(), |v| format_thousands(v, 1))
        };
        let _ = writeln!(
            out,
            "{:<LABEL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}{:>CELL_WIDTH$}",
            summary.scenario,
            format_thousands(summary.mean, 1),
            format_thousands(summary.std_dev, 1),
            cell(0.05),
            cell(0.5),
            cell(0.95),
        );
    }
    out
}

/// EVPPI matrix with parameters as rows and scenarios as columns.
///
/// Failed cells print as `n/a` and are listed underneath with their reason.
pub fn format_evppi_table(evppi: &EvppiResult) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<LABEL_WIDTH$}", "EVPPI (%)");
    for scenario in &evppi.scenario_names {
        let _ = write!(out, "{scenario:>CELL_WIDTH$}");
    }
    out.push('\n');

    for (i, parameter) in evppi.parameter_names.iter().enumerate() {
        let _ = write!(out, "{parameter:<LABEL_WIDTH$}");
        for j in 0..evppi.scenario_names.len() {
            let cell = match evppi.get(i, j) {
                Some(Ok(value)) => format_percent(*value),
                _ => "n/a".to_string(),
            };
            let _ = write!(out, "{cell:>CELL_WIDTH$}");
        }
        out.push('\n');
    }

    for error in evppi.errors() {
        let _ = writeln!(out, "  n/a: {error}");
    }
    out
}

/// A cell the estimator could not fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellError {
    pub parameter: String,
    pub scenario: String,
    pub message: String,
}

/// Everything a downstream report needs from one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub n_samples: usize,
    pub seed: u64,
    pub smoother: String,
    pub parameters: Vec<String>,
    pub scenarios: Vec<String>,
    /// One row per parameter, one entry per scenario; failed cells are `null`
    pub evppi: Vec<Vec<Option<f64>>>,
    pub errors: Vec<CellError>,
    pub outcomes: Vec<OutcomeSummary>,
}

impl ResultsDocument {
    pub fn new(config: &EvppiConfig, result: &MonteCarloResult, evppi: &EvppiResult) -> Self {
        let n_scenarios = evppi.scenario_names.len();
        let rows: Vec<Vec<Option<f64>>> = (0..evppi.parameter_names.len())
            .map(|i| {
                (0..n_scenarios)
                    .map(|j| evppi.get(i, j).and_then(|c| c.as_ref().ok().copied()))
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut errors = Vec::new();
        for (i, parameter) in evppi.parameter_names.iter().enumerate() {
            for (j, scenario) in evppi.scenario_names.iter().enumerate() {
                if let Some(Err(e)) = evppi.get(i, j) {
                    errors.push(CellError {
                        parameter: parameter.clone(),
                        scenario: scenario.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Self {
            n_samples: result.n_samples(),
            seed: config.seed,
            smoother: config.smoother.name().to_string(),
            parameters: evppi.parameter_names.clone(),
            scenarios: evppi.scenario_names.clone(),
            evppi: rows,
            errors,
            outcomes: result.outcome_summaries(),
        }
    }

    pub fn to_yaml(&self) -> color_eyre::Result<String> {
        serde_saphyr::to_string(self).map_err(|e| eyre!("Failed to serialize results: {e}"))
    }

    pub fn from_yaml(yaml: &str) -> color_eyre::Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| eyre!("Failed to parse results: {e}"))
    }

    /// Serialize and write atomically to `path`
    pub fn write(&self, path: &Path) -> color_eyre::Result<()> {
        let yaml = self.to_yaml()?;
        atomic_write(path, &yaml)
            .wrap_err_with(|| format!("Failed to write results to {}", path.display()))
    }
}
