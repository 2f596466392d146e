use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use crate::error::DistributionError;

/// A named uncertain input with its own distribution.
///
/// Parameters are independent of each other; no correlation is modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub distribution: Distribution,
}

impl Parameter {
    pub fn new(name: impl Into<String>, distribution: Distribution) -> Self {
        Self {
            name: name.into(),
            distribution,
        }
    }

    pub fn validate(&self) -> Result<(), DistributionError> {
        self.distribution.validate()
    }
}

/// A hypothetical travel condition, scaling the car-attributable exposure by `D`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Travel-change multiplier `D` (1.0 means no change)
    pub travel_multiplier: f64,
}

impl Scenario {
    pub fn new(name: impl Into<String>, travel_multiplier: f64) -> Self {
        Self {
            name: name.into(),
            travel_multiplier,
        }
    }
}
