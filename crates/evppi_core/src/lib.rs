//! Variance-based sensitivity analysis for an uncertain health-impact model
//!
//! This crate estimates the Expected Value of Perfect Partial Information
//! (EVPPI) of each uncertain input of a PM2.5 health-burden model, per travel
//! scenario. It supports:
//! - Tagged input distributions (lognormal, beta, normal, uniform, fixed)
//! - A forward model mapping one draw to a burden per scenario
//! - Seeded, batched Monte Carlo sampling (parallel with the `parallel` feature)
//! - Single-parameter EVPPI by nonparametric regression with pluggable smoothers
//!
//! # Example
//!
//! ```ignore
//! use evppi_core::{EvppiConfig, estimate_evppi};
//!
//! let config = EvppiConfig::default();
//! let result = config.run()?;
//! let evppi = estimate_evppi(&result, &config.smoother);
//! for (name, value) in evppi.ranked("decrease") {
//!     println!("{name}: {value:.1}%");
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod evppi;
pub mod forward;
pub mod simulation;
pub mod smoothing;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{EvppiConfig, ModelBuilder};
pub use error::{
    DistributionError, EstimationError, ForwardModelError, SimulationError, SmootherError,
};
pub use evppi::{EvppiResult, estimate_evppi};
pub use forward::{ForwardModel, PollutionBurdenModel};
pub use simulation::{RunProgress, monte_carlo_run, monte_carlo_run_with_progress};
pub use smoothing::{BinnedMeans, PenalizedSpline, Smoother, SmootherConfig};
