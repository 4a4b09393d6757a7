use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{PSOError, Result};

/// Axis-aligned box `lower[j] <= x[j] <= upper[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl Bounds {
    /// Build a box for a `dims`-dimensional search space.
    ///
    /// Fails with `BoundsMismatch` if either vector does not have `dims`
    /// entries and with `InvalidBounds` if `lower[j] > upper[j]` (a NaN bound
    /// is rejected the same way).
    pub fn new(lower: Array1<f64>, upper: Array1<f64>, dims: usize) -> Result<Self> {
        if lower.len() != dims || upper.len() != dims {
            return Err(PSOError::BoundsMismatch {
                expected: dims,
                lower_len: lower.len(),
                upper_len: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !(lo <= hi) {
                return Err(PSOError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Build a box from `(lower, upper)` pairs, one per dimension.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        let lower = pairs.iter().map(|&(lo, _)| lo).collect::<Array1<f64>>();
        let upper = pairs.iter().map(|&(_, hi)| hi).collect::<Array1<f64>>();
        Self::new(lower, upper, pairs.len())
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    pub fn dims(&self) -> usize {
        self.lower.len()
    }

    /// `true` when every component of `x` lies inside the box, edges included.
    pub fn contains(&self, x: ArrayView1<f64>) -> bool {
        x.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&v, (&lo, &hi))| lo <= v && v <= hi)
    }
}

/// Serializable description of a box, as found in config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsSpec {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl BoundsSpec {
    pub fn to_bounds(&self, dims: usize) -> Result<Bounds> {
        Bounds::new(
            Array1::from(self.lower.clone()),
            Array1::from(self.upper.clone()),
            dims,
        )
    }
}
