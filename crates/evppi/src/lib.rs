//! Command-line front end for `evppi_core`
//!
//! Loads a run configuration, samples the PM2.5 burden model, estimates EVPPI
//! per parameter and scenario, and prints or saves the results.

pub mod config;
pub mod logging;
pub mod report;
pub mod run;
pub mod util;

pub use config::load_config;
pub use logging::init_logging;
pub use report::{ResultsDocument, format_evppi_table, format_outcome_table};
pub use run::run_with_progress_log;
