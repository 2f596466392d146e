mod distribution;
mod dose_response;
mod grid;
mod parameter;
mod results;

pub use distribution::{Distribution, lognormal_log_scale};
pub use dose_response::{DoseResponse, DoseResponseCurve};
pub use grid::{Grid, OutcomeMatrix, SampleMatrix};
pub use parameter::{Parameter, Scenario};
pub use results::{
    MonteCarloConfig, MonteCarloResult, OutcomeSummary, STANDARD_PERCENTILES,
};
