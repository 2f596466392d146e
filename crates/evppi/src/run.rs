use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use evppi_core::config::EvppiConfig;
use evppi_core::error::SimulationError;
use evppi_core::model::MonteCarloResult;
use evppi_core::simulation::RunProgress;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Run the Monte Carlo stage, logging progress from a watcher thread
pub fn run_with_progress_log(config: &EvppiConfig) -> Result<MonteCarloResult, SimulationError> {
    let progress = RunProgress::new(config.n_samples);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let watcher = s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                thread::park_timeout(PROGRESS_INTERVAL);
                tracing::debug!(
                    completed = progress.completed(),
                    total = progress.total(),
                    "Sampling {:.0}%",
                    100.0 * progress.fraction()
                );
            }
        });

        let result = config.run_with_progress(Some(&progress));
        done.store(true, Ordering::Relaxed);
        watcher.thread().unpark();
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_plain_run() {
        let config = EvppiConfig {
            n_samples: 300,
            ..Default::default()
        };
        assert_eq!(run_with_progress_log(&config), config.run());
    }

    #[test]
    fn test_invalid_config_returns_error() {
        let config = EvppiConfig {
            n_samples: 0,
            ..Default::default()
        };
        assert!(matches!(
            run_with_progress_log(&config),
            Err(SimulationError::Config(_))
        ));
    }
}
