//! Global-best Particle Swarm Optimization (PSO) in pure Rust using ndarray
//!
//! A swarm of particles moves through a continuous search space. Each
//! particle is pulled toward the best point it has visited itself (cognitive
//! term) and toward the best point found by the whole swarm (social term),
//! while keeping part of its previous velocity (inertia).
//!
//! Supported features:
//! - Box constraints (lower/upper bounds) with all-or-nothing move acceptance
//! - Batched objectives (`P x D` positions to `P` costs), plus a row-wise
//!   adapter that can evaluate points in parallel with rayon
//! - Initialization: random uniform, Latin Hypercube Sampling or explicit positions
//! - Seeded or caller-supplied random source for reproducible runs
//! - Per-iteration history of the global best, progress reporting and CSV recording
//!
//! ```rust
//! use swarmopt_pso::{PSOConfigBuilder, particle_swarm};
//!
//! let config = PSOConfigBuilder::new()
//!     .n_particles(20)
//!     .c1(0.5)
//!     .c2(0.3)
//!     .m(0.9)
//!     .seed(42)
//!     .verbose(0)
//!     .build();
//! let report = particle_swarm(
//!     &|x| x[0].powi(2) + x[1].powi(2),
//!     &[(-5.0, 5.0), (-5.0, 5.0)],
//!     config,
//!     100,
//! )
//! .expect("optimization failed");
//! assert!(report.global_best_cost < 0.1);
//! ```

use std::fmt;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod config_file;
pub mod error;
pub mod function_registry;
pub mod hyperparameters;
pub mod init_latin_hypercube;
pub mod init_random;
pub mod optimizer;
pub mod parallel_eval;
pub mod particle_swarm;
pub mod recorder;
pub mod reporter;
pub mod run_recorded;
pub mod swarm_state;
pub mod update_rule;

pub use bounds::{Bounds, BoundsSpec};
pub use error::{PSOError, Result};
pub use hyperparameters::{HyperparameterSet, Hyperparameters};
pub use optimizer::Optimizer;
pub use parallel_eval::{ParallelConfig, evaluate_rows, rowwise};
pub use particle_swarm::particle_swarm;
pub use recorder::{OptimizationRecord, OptimizationRecorder};
pub use reporter::{LogReporter, NoopReporter, Reporter, VecReporter};
pub use run_recorded::run_recorded_pso;
pub use swarm_state::SwarmState;
pub use update_rule::{GlobalBest, UpdateRule};

/// Index and value of the first minimum (lowest index wins ties).
///
/// NaN entries never compare lower and are skipped; `None` if every entry
/// is NaN.
pub(crate) fn argmin(v: &Array1<f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &val) in v.iter().enumerate() {
        if val.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if !(val < b) => {}
            _ => best = Some((i, val)),
        }
    }
    best
}

/// Initialization scheme for the particle positions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Init {
    /// Uniform in the bounds (unit hypercube without bounds)
    #[default]
    Random,
    /// One sample per stratum and per dimension
    LatinHypercube,
    /// Explicit `n_particles x dims` starting positions
    Positions(Array2<f64>),
}

/// Configuration of a particle swarm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PSOConfig {
    /// Number of particles P
    pub n_particles: usize,
    /// Number of dimensions D
    pub dims: usize,
    /// Optional search box; `None` means unconstrained moves
    pub bounds: Option<BoundsSpec>,
    /// c1, c2 and m; all three are required
    pub hyperparameters: HyperparameterSet,
    pub init: Init,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// 0 = silent, 1 = progress lines, 2 = per-iteration details
    pub verbose: u8,
    /// Used by the row-wise objective adapter
    pub parallel: ParallelConfig,
}

impl Default for PSOConfig {
    fn default() -> Self {
        Self {
            n_particles: 30,
            dims: 2,
            bounds: None,
            hyperparameters: HyperparameterSet::default(),
            init: Init::default(),
            seed: None,
            verbose: 1,
            parallel: ParallelConfig::default(),
        }
    }
}

impl PSOConfig {
    /// Replace `dims` and `bounds` with the box given as `(lower, upper)`
    /// pairs, one per dimension. The config is left untouched on error.
    pub fn set_bounds_from_pairs(&mut self, pairs: &[(f64, f64)]) -> Result<()> {
        let checked = Bounds::from_pairs(pairs)?;
        self.dims = checked.dims();
        self.bounds = Some(BoundsSpec {
            lower: checked.lower().to_vec(),
            upper: checked.upper().to_vec(),
        });
        Ok(())
    }
}

/// Fluent builder for `PSOConfig` for ergonomic configuration.
pub struct PSOConfigBuilder {
    cfg: PSOConfig,
}

impl Default for PSOConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PSOConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PSOConfig::default(),
        }
    }
    pub fn n_particles(mut self, v: usize) -> Self {
        self.cfg.n_particles = v;
        self
    }
    pub fn dims(mut self, v: usize) -> Self {
        self.cfg.dims = v;
        self
    }
    /// Set the box; also sets `dims` to the number of bounds.
    pub fn bounds(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.cfg.dims = lower.len();
        self.cfg.bounds = Some(BoundsSpec { lower, upper });
        self
    }
    pub fn no_bounds(mut self) -> Self {
        self.cfg.bounds = None;
        self
    }
    pub fn hyperparameters(mut self, v: HyperparameterSet) -> Self {
        self.cfg.hyperparameters = v;
        self
    }
    pub fn c1(mut self, v: f64) -> Self {
        self.cfg.hyperparameters.c1 = Some(v);
        self
    }
    pub fn c2(mut self, v: f64) -> Self {
        self.cfg.hyperparameters.c2 = Some(v);
        self
    }
    pub fn m(mut self, v: f64) -> Self {
        self.cfg.hyperparameters.m = Some(v);
        self
    }
    pub fn init(mut self, v: Init) -> Self {
        self.cfg.init = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    pub fn verbose(mut self, v: u8) -> Self {
        self.cfg.verbose = v;
        self
    }
    pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.cfg.parallel = parallel;
        self
    }
    pub fn enable_parallel(mut self, enable: bool) -> Self {
        self.cfg.parallel.enabled = enable;
        self
    }
    pub fn build(self) -> PSOConfig {
        self.cfg
    }
}

/// Result of a PSO run
#[derive(Clone, Serialize)]
pub struct PSOReport {
    /// Best cost found over the run
    pub global_best_cost: f64,
    /// Position of `global_best_cost`
    pub global_best_position: Array1<f64>,
    /// Best cost so far, one entry per iteration
    pub global_best_cost_history: Vec<f64>,
    /// Best position so far, one entry per iteration
    pub global_best_position_history: Vec<Array1<f64>>,
    /// Number of iterations run
    pub nit: usize,
    /// Number of points evaluated by the objective
    pub nfev: usize,
    /// Swarm state after the last iteration
    pub swarm: SwarmState,
}

impl fmt::Debug for PSOReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PSOReport")
            .field("global_best_cost", &self.global_best_cost)
            .field("global_best_position", &format!("len={}", self.global_best_position.len()))
            .field("history", &format!("len={}", self.global_best_cost_history.len()))
            .field("nit", &self.nit)
            .field("nfev", &self.nfev)
            .field(
                "swarm",
                &format!("{}x{}", self.swarm.n_particles(), self.swarm.dims()),
            )
            .finish()
    }
}

/// Information passed to the callback after each iteration
#[derive(Debug, Clone)]
pub struct PSOIntermediate {
    /// Best position so far
    pub x: Array1<f64>,
    /// Best cost so far
    pub fun: f64,
    /// Number of personal bests improved during this iteration
    pub improved: usize,
    /// Iteration index, starting at 0
    pub iter: usize,
}
