use ndarray::Array1;

use crate::parallel_eval::rowwise;
use crate::{Optimizer, PSOConfig, PSOReport, Result};

/// Convenience function mirroring the shape of SciPy-style optimizers:
/// - `func`: point-wise objective mapping x -> f(x)
/// - `bounds`: vector of (lower, upper) pairs, one per dimension
/// - `config`: PSO configuration; its `dims` and `bounds` are overwritten
/// - `iters`: number of iterations
///
/// Points are evaluated through [`rowwise`], in parallel when
/// `config.parallel` allows it. Progress is reported ten times per run.
pub fn particle_swarm<F>(
    func: &F,
    bounds: &[(f64, f64)],
    mut config: PSOConfig,
    iters: usize,
) -> Result<PSOReport>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    config.set_bounds_from_pairs(bounds)?;
    let mut pso = Optimizer::new(&config)?;
    let objective = rowwise(func, config.parallel.clone());
    pso.optimize(objective, iters, (iters / 10).max(1))
}
