use std::fmt;

/// Errors raised while constructing or sampling a distribution
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    InvalidParameter {
        family: &'static str,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::InvalidParameter {
                family,
                name,
                value,
                reason,
            } => write!(f, "invalid {family} parameter {name}={value}: {reason}"),
        }
    }
}

impl std::error::Error for DistributionError {}

/// Domain errors raised by the forward model or its dose-response curve
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardModelError {
    /// The dose-response curve was asked for a negative concentration
    NegativeConcentration(f64),
    /// An input or intermediate value was NaN or infinite
    NonFinite { quantity: &'static str, value: f64 },
    /// The draw does not have one value per model input
    InputCountMismatch { expected: usize, actual: usize },
    /// Baseline burden must be strictly positive and finite
    InvalidBaseline(f64),
}

impl fmt::Display for ForwardModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardModelError::NegativeConcentration(c) => {
                write!(f, "dose-response evaluated at negative concentration {c}")
            }
            ForwardModelError::NonFinite { quantity, value } => {
                write!(f, "{quantity} is not finite ({value})")
            }
            ForwardModelError::InputCountMismatch { expected, actual } => {
                write!(f, "model expects {expected} inputs, draw has {actual}")
            }
            ForwardModelError::InvalidBaseline(b) => {
                write!(f, "baseline burden must be positive and finite, got {b}")
            }
        }
    }
}

impl std::error::Error for ForwardModelError {}

/// Errors raised by a smoother while fitting `E[y | x]`
#[derive(Debug, Clone, PartialEq)]
pub enum SmootherError {
    LengthMismatch { x: usize, y: usize },
    TooFewPoints { required: usize, actual: usize },
    /// No candidate smoothing parameter produced a solvable system
    SingularSystem,
    NonFinite,
}

impl fmt::Display for SmootherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmootherError::LengthMismatch { x, y } => {
                write!(f, "input has {x} values but response has {y}")
            }
            SmootherError::TooFewPoints { required, actual } => {
                write!(f, "smoother needs at least {required} points, got {actual}")
            }
            SmootherError::SingularSystem => write!(f, "penalized system is not positive definite"),
            SmootherError::NonFinite => write!(f, "non-finite value in smoother input or fit"),
        }
    }
}

impl std::error::Error for SmootherError {}

/// Per-cell errors of the EVPPI estimator
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// The scenario's outcome column has zero (or undefined) sample variance
    DegenerateVariance { scenario: String },
    RegressionFailure {
        parameter: String,
        scenario: String,
        source: SmootherError,
    },
}

impl fmt::Display for EstimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationError::DegenerateVariance { scenario } => {
                write!(f, "scenario {scenario} has no outcome variance to explain")
            }
            EstimationError::RegressionFailure {
                parameter,
                scenario,
                source,
            } => write!(
                f,
                "regression of {scenario} on {parameter} failed: {source}"
            ),
        }
    }
}

impl std::error::Error for EstimationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EstimationError::RegressionFailure { source, .. } => Some(source),
            EstimationError::DegenerateVariance { .. } => None,
        }
    }
}

/// Errors that abort a whole Monte Carlo run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Distribution(DistributionError),
    ForwardModel(ForwardModelError),
    /// Run was cancelled through its progress handle
    Cancelled,
    /// Configuration error
    Config(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Distribution(e) => write!(f, "{e}"),
            SimulationError::ForwardModel(e) => write!(f, "forward model error: {e}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
            SimulationError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Distribution(e) => Some(e),
            SimulationError::ForwardModel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DistributionError> for SimulationError {
    fn from(e: DistributionError) -> Self {
        SimulationError::Distribution(e)
    }
}

impl From<ForwardModelError> for SimulationError {
    fn from(e: ForwardModelError) -> Self {
        SimulationError::ForwardModel(e)
    }
}
