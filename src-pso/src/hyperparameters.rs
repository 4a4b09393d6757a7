use serde::{Deserialize, Serialize};

use crate::error::{PSOError, Result};

/// Hyperparameters as provided by the caller or a config file.
///
/// Every field is optional here so that a partially filled set can be
/// deserialized; [`HyperparameterSet::validate`] turns it into
/// [`Hyperparameters`] or reports the first missing field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSet {
    /// Cognitive weight (typically in [0, 4])
    pub c1: Option<f64>,
    /// Social weight (typically in [0, 4])
    pub c2: Option<f64>,
    /// Inertia / momentum weight (typically in [0, 1])
    pub m: Option<f64>,
}

impl HyperparameterSet {
    pub fn new(c1: f64, c2: f64, m: f64) -> Self {
        Self {
            c1: Some(c1),
            c2: Some(c2),
            m: Some(m),
        }
    }

    /// Check that `c1`, `c2` and `m` are all present, in that order.
    pub fn validate(&self) -> Result<Hyperparameters> {
        let c1 = self.c1.ok_or(PSOError::MissingHyperparameter { name: "c1" })?;
        let c2 = self.c2.ok_or(PSOError::MissingHyperparameter { name: "c2" })?;
        let m = self.m.ok_or(PSOError::MissingHyperparameter { name: "m" })?;
        Ok(Hyperparameters { c1, c2, m })
    }
}

/// Validated hyperparameters, immutable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub c1: f64,
    pub c2: f64,
    pub m: f64,
}

impl From<Hyperparameters> for HyperparameterSet {
    fn from(hp: Hyperparameters) -> Self {
        HyperparameterSet::new(hp.c1, hp.c2, hp.m)
    }
}
