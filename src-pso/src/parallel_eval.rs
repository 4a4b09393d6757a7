use std::convert::Infallible;

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Parallel evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Enable parallel evaluation
    pub enabled: bool,
    /// Number of threads to use (None = use rayon default)
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None, // Use rayon's default (typically num_cpus)
        }
    }
}

impl ParallelConfig {
    /// Configure the global rayon pool once if a thread count was requested.
    pub fn install_global_pool(&self) {
        if let Some(n) = self.num_threads {
            // Ignore error if global pool already set
            let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
        }
    }
}

/// Evaluate every row of `positions`, in parallel when enabled.
///
/// The result is always in row order. Small batches (fewer than 4 rows) are
/// evaluated sequentially.
pub fn evaluate_rows<F>(positions: &Array2<f64>, func: &F, config: &ParallelConfig) -> Array1<f64>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    let npop = positions.nrows();

    if !config.enabled || npop < 4 {
        let mut costs = Array1::zeros(npop);
        for i in 0..npop {
            let x = positions.row(i).to_owned();
            costs[i] = func(&x);
        }
        return costs;
    }

    let results = (0..npop)
        .into_par_iter()
        .map(|i| {
            let x = positions.row(i).to_owned();
            func(&x)
        })
        .collect::<Vec<f64>>();

    Array1::from_vec(results)
}

/// Turn a point-wise objective into the batched form expected by
/// [`crate::Optimizer::optimize`].
///
/// ```rust
/// use ndarray::array;
/// use swarmopt_pso::{ParallelConfig, rowwise};
///
/// let mut f = rowwise(|x| x.iter().map(|v| v * v).sum(), ParallelConfig::default());
/// let costs = f(&array![[1.0, 2.0], [0.0, 3.0]]).unwrap();
/// assert_eq!(costs.to_vec(), vec![5.0, 9.0]);
/// ```
pub fn rowwise<F>(
    func: F,
    config: ParallelConfig,
) -> impl FnMut(&Array2<f64>) -> Result<Array1<f64>, Infallible>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    config.install_global_pool();
    move |positions: &Array2<f64>| Ok(evaluate_rows(positions, &func, &config))
}
