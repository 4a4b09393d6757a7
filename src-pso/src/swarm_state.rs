//! Mutable numeric state of a swarm.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Init;
use crate::bounds::Bounds;
use crate::error::{PSOError, Result};
use crate::init_latin_hypercube::init_latin_hypercube;
use crate::init_random::init_random;

/// Positions, velocities and best-so-far bookkeeping of a swarm.
///
/// Rows index particles, columns index dimensions. The personal-best costs
/// are not stored: they are recomputed from `pbest_pos` every iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmState {
    /// Current positions (`n_particles x dims`)
    pub pos: Array2<f64>,
    /// Current velocities (`n_particles x dims`)
    pub velocity: Array2<f64>,
    /// Best position visited by each particle (`n_particles x dims`)
    pub pbest_pos: Array2<f64>,
    /// Best position found by the swarm, `None` before the first evaluation
    pub gbest_pos: Option<Array1<f64>>,
    /// Cost of `gbest_pos`, `+inf` before the first evaluation
    pub gbest_cost: f64,
    /// Optional search box, fixed for the run
    pub bounds: Option<Bounds>,
}

impl SwarmState {
    /// Seed a new swarm.
    ///
    /// Positions are drawn first (row-major), then velocities uniformly in
    /// `[0, 1)`. Without bounds, `Init::Random` and `Init::LatinHypercube`
    /// sample the unit hypercube.
    pub fn new<R: Rng + ?Sized>(
        n_particles: usize,
        dims: usize,
        bounds: Option<Bounds>,
        init: &Init,
        rng: &mut R,
    ) -> Result<Self> {
        if n_particles == 0 {
            return Err(PSOError::InvalidParticleCount { n_particles });
        }
        if dims == 0 {
            return Err(PSOError::InvalidDimensions { dims });
        }
        if let Some(b) = &bounds {
            if b.dims() != dims {
                return Err(PSOError::BoundsMismatch {
                    expected: dims,
                    lower_len: b.lower().len(),
                    upper_len: b.upper().len(),
                });
            }
        }

        let (lower, upper) = match &bounds {
            Some(b) => (b.lower().clone(), b.upper().clone()),
            None => (Array1::zeros(dims), Array1::ones(dims)),
        };

        let pos = match init {
            Init::Random => init_random(dims, n_particles, &lower, &upper, rng),
            Init::LatinHypercube => init_latin_hypercube(dims, n_particles, &lower, &upper, rng),
            Init::Positions(p) => {
                if p.dim() != (n_particles, dims) {
                    return Err(PSOError::InitialPositionsShape {
                        expected: (n_particles, dims),
                        got: p.dim(),
                    });
                }
                if let Some(b) = &bounds {
                    if let Some(particle) = p.rows().into_iter().position(|row| !b.contains(row)) {
                        return Err(PSOError::InitialPositionOutOfBounds { particle });
                    }
                }
                p.clone()
            }
        };

        let velocity = Array2::from_shape_fn((n_particles, dims), |_| rng.random::<f64>());

        Ok(Self {
            pbest_pos: pos.clone(),
            pos,
            velocity,
            gbest_pos: None,
            gbest_cost: f64::INFINITY,
            bounds,
        })
    }

    pub fn n_particles(&self) -> usize {
        self.pos.nrows()
    }

    pub fn dims(&self) -> usize {
        self.pos.ncols()
    }
}
