//! Monte Carlo driver
//!
//! Both output matrices are allocated up front and filled in fixed-size
//! batches of rows. Batch seeds are the leading `next_u64` draws of a
//! `SmallRng` seeded with the run seed, and batch `k` owns a `SmallRng`
//! seeded with the `k`-th of them. The result is the same whether batches
//! run sequentially or on the rayon pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand::rngs::SmallRng;
#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

use crate::error::SimulationError;
use crate::forward::ForwardModel;
use crate::model::{
    MonteCarloConfig, MonteCarloResult, OutcomeMatrix, Parameter, SampleMatrix, Scenario,
};

/// Rows drawn from one random stream
pub const BATCH_SIZE: usize = 100;

/// Progress tracking and cancellation for a running sample
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Completed draws
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl RunProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Fraction done in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.completed() as f64 / total as f64).min(1.0)
        }
    }

    fn add(&self, n: usize) {
        self.completed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Request that the run stop at the next batch boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Draw `config.n_samples` parameter vectors and evaluate every scenario on each.
pub fn monte_carlo_run<M: ForwardModel>(
    parameters: &[Parameter],
    scenarios: &[Scenario],
    model: &M,
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, SimulationError> {
    monte_carlo_run_with_progress(parameters, scenarios, model, config, None)
}

/// Same as [`monte_carlo_run`], reporting progress and honoring cancellation.
///
/// Any error, including cancellation, discards both matrices.
pub fn monte_carlo_run_with_progress<M: ForwardModel>(
    parameters: &[Parameter],
    scenarios: &[Scenario],
    model: &M,
    config: &MonteCarloConfig,
    progress: Option<&RunProgress>,
) -> Result<MonteCarloResult, SimulationError> {
    validate_run(parameters, scenarios, model, config)?;

    let n_params = parameters.len();
    let n_scenarios = scenarios.len();
    let start = Instant::now();

    tracing::debug!(
        n_samples = config.n_samples,
        n_parameters = n_params,
        n_scenarios = n_scenarios,
        seed = config.seed,
        "Starting Monte Carlo run"
    );

    let mut samples = SampleMatrix::new(config.n_samples, n_params, 0.0);
    let mut outcomes = OutcomeMatrix::new(config.n_samples, n_scenarios, 0.0);

    let batch_seeds = batch_seeds(config.seed, config.n_samples.div_ceil(BATCH_SIZE));

    let fill = |(batch, (sample_rows, outcome_rows)): (usize, (&mut [f64], &mut [f64]))| {
        fill_batch(
            sample_rows,
            outcome_rows,
            parameters,
            scenarios,
            model,
            batch_seeds[batch],
            progress,
        )
    };

    #[cfg(feature = "parallel")]
    samples
        .data_mut()
        .par_chunks_mut(BATCH_SIZE * n_params)
        .zip(outcomes.data_mut().par_chunks_mut(BATCH_SIZE * n_scenarios))
        .enumerate()
        .try_for_each(fill)?;

    #[cfg(not(feature = "parallel"))]
    samples
        .data_mut()
        .chunks_mut(BATCH_SIZE * n_params)
        .zip(outcomes.data_mut().chunks_mut(BATCH_SIZE * n_scenarios))
        .enumerate()
        .try_for_each(fill)?;

    tracing::info!(
        n_samples = config.n_samples,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Monte Carlo run complete"
    );

    Ok(MonteCarloResult {
        parameter_names: parameters.iter().map(|p| p.name.clone()).collect(),
        scenario_names: scenarios.iter().map(|s| s.name.clone()).collect(),
        samples,
        outcomes,
    })
}

/// Setup-time checks; nothing is sampled if any of these fail
fn validate_run<M: ForwardModel>(
    parameters: &[Parameter],
    scenarios: &[Scenario],
    model: &M,
    config: &MonteCarloConfig,
) -> Result<(), SimulationError> {
    if config.n_samples == 0 {
        return Err(SimulationError::Config(
            "n_samples must be at least 1".to_string(),
        ));
    }
    if parameters.len() != model.input_count() {
        return Err(SimulationError::Config(format!(
            "model takes {} inputs but {} parameters were given",
            model.input_count(),
            parameters.len()
        )));
    }
    if parameters.is_empty() {
        return Err(SimulationError::Config("no parameters to sample".to_string()));
    }
    if scenarios.is_empty() {
        return Err(SimulationError::Config("no scenarios to evaluate".to_string()));
    }
    if let Some(s) = scenarios.iter().find(|s| !s.travel_multiplier.is_finite()) {
        return Err(SimulationError::Config(format!(
            "scenario {} has a non-finite travel multiplier",
            s.name
        )));
    }
    for parameter in parameters {
        parameter.validate()?;
    }
    Ok(())
}

/// Per-batch seeds. The sequence for a given run seed is a prefix of the one
/// for any longer run.
fn batch_seeds(seed: u64, n_batches: usize) -> Vec<u64> {
    let mut master = SmallRng::seed_from_u64(seed);
    (0..n_batches).map(|_| master.next_u64()).collect()
}

fn fill_batch<M: ForwardModel>(
    sample_rows: &mut [f64],
    outcome_rows: &mut [f64],
    parameters: &[Parameter],
    scenarios: &[Scenario],
    model: &M,
    seed: u64,
    progress: Option<&RunProgress>,
) -> Result<(), SimulationError> {
    if progress.is_some_and(RunProgress::is_cancelled) {
        return Err(SimulationError::Cancelled);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut rows = 0;

    for (draw, outcome_row) in sample_rows
        .chunks_mut(parameters.len())
        .zip(outcome_rows.chunks_mut(scenarios.len()))
    {
        for (value, parameter) in draw.iter_mut().zip(parameters) {
            *value = parameter.distribution.sample(&mut rng)?;
        }
        // Every scenario shares this row's draw
        for (outcome, scenario) in outcome_row.iter_mut().zip(scenarios) {
            *outcome = model.evaluate(draw, scenario)?;
        }
        rows += 1;
    }

    if let Some(progress) = progress {
        progress.add(rows);
    }
    Ok(())
}
