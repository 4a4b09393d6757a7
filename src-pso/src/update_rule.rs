//! Velocity and position update rules.
//!
//! The optimizer loop only needs one capability from a topology: advance a
//! swarm by one step. [`GlobalBest`] pulls every particle toward its own best
//! position and toward the best position of the whole swarm.

use ndarray::{Array2, Axis};
use rand::{Rng, RngCore};

use crate::hyperparameters::Hyperparameters;
use crate::swarm_state::SwarmState;

/// One synchronous step of a swarm topology.
pub trait UpdateRule {
    /// Update `state.velocity` and `state.pos` in place and return the number
    /// of particles whose position move was accepted.
    fn advance(
        &self,
        state: &mut SwarmState,
        hyperparameters: &Hyperparameters,
        rng: &mut dyn RngCore,
    ) -> usize;
}

/// Global-best topology.
///
/// ```text
/// v <- m * v + c1 * r1 * (pbest - x) + c2 * r2 * (gbest - x)
/// x <- x + v
/// ```
///
/// `r1` and `r2` are fresh `P x D` uniform matrices, `r1` drawn completely
/// (row-major) before `r2`. With bounds, a particle only moves if its whole
/// candidate row lies in the box; otherwise it stays where it was for this
/// step while keeping the new velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalBest;

impl UpdateRule for GlobalBest {
    fn advance(
        &self,
        state: &mut SwarmState,
        hyperparameters: &Hyperparameters,
        rng: &mut dyn RngCore,
    ) -> usize {
        let Hyperparameters { c1, c2, m } = *hyperparameters;
        let shape = state.pos.dim();

        let r1 = Array2::from_shape_fn(shape, |_| rng.random::<f64>());
        let r2 = Array2::from_shape_fn(shape, |_| rng.random::<f64>());

        let cognitive = (&r1 * c1) * &(&state.pbest_pos - &state.pos);
        // no pull toward the swarm until a global best exists
        let social = match &state.gbest_pos {
            Some(gbest) => (&r2 * c2) * &(&gbest.view().insert_axis(Axis(0)) - &state.pos),
            None => Array2::zeros(shape),
        };
        state.velocity = &state.velocity * m + &cognitive + &social;

        let candidate = &state.pos + &state.velocity;
        match &state.bounds {
            Some(bounds) => {
                let mut accepted = 0;
                for (i, row) in candidate.rows().into_iter().enumerate() {
                    if bounds.contains(row) {
                        state.pos.row_mut(i).assign(&row);
                        accepted += 1;
                    }
                }
                accepted
            }
            None => {
                state.pos = candidate;
                shape.0
            }
        }
    }
}
