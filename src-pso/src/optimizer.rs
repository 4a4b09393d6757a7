//! The PSO iteration loop.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::{PSOError, Result};
use crate::hyperparameters::Hyperparameters;
use crate::reporter::{LogReporter, Reporter};
use crate::swarm_state::SwarmState;
use crate::update_rule::{GlobalBest, UpdateRule};
use crate::{PSOConfig, PSOIntermediate, PSOReport, argmin};

/// Global-best particle swarm optimizer
///
/// Owns the swarm, the random source used for every draw after
/// construction, the update rule and the progress reporter.
pub struct Optimizer<R: RngCore = StdRng> {
    state: SwarmState,
    hyperparameters: Hyperparameters,
    rng: R,
    rule: Box<dyn UpdateRule>,
    reporter: Box<dyn Reporter>,
    callback: Option<Box<dyn FnMut(&PSOIntermediate)>>,
}

impl Optimizer<StdRng> {
    /// Create an optimizer seeded from `config.seed`, or from the thread
    /// RNG when no seed is given.
    pub fn new(config: &PSOConfig) -> Result<Self> {
        let rng: StdRng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };
        Self::with_rng(config, rng)
    }
}

impl<R: RngCore> Optimizer<R> {
    /// Create an optimizer drawing all its random numbers from `rng`.
    ///
    /// Hyperparameters are checked before anything is drawn, then bounds,
    /// then the swarm is seeded.
    pub fn with_rng(config: &PSOConfig, mut rng: R) -> Result<Self> {
        let hyperparameters = config.hyperparameters.validate()?;
        let bounds = config
            .bounds
            .as_ref()
            .map(|b| b.to_bounds(config.dims))
            .transpose()?;
        let state = SwarmState::new(config.n_particles, config.dims, bounds, &config.init, &mut rng)?;

        Ok(Self {
            state,
            hyperparameters,
            rng,
            rule: Box::new(GlobalBest),
            reporter: Box::new(LogReporter::new(config.verbose)),
            callback: None,
        })
    }

    /// Replace the update rule (defaults to [`GlobalBest`]).
    pub fn with_update_rule(mut self, rule: Box<dyn UpdateRule>) -> Self {
        self.rule = rule;
        self
    }

    /// Replace the progress reporter (defaults to [`LogReporter`]).
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Observe every iteration after the history has been recorded.
    pub fn with_callback(mut self, callback: Box<dyn FnMut(&PSOIntermediate)>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn state(&self) -> &SwarmState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SwarmState {
        &mut self.state
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn into_state(self) -> SwarmState {
        self.state
    }

    /// Run `iters` iterations and return the global-best trace.
    ///
    /// `objective` maps the `P x D` position matrix to `P` costs and must be
    /// a pure function: personal-best costs are recomputed from
    /// `pbest_pos` every iteration rather than cached. Any error it returns
    /// aborts the run; no partial report is produced.
    ///
    /// NaN costs never become a personal or global best. While every cost
    /// seen so far is NaN, the history records `+inf` at a NaN position.
    ///
    /// A progress line is sent to the reporter every `report_every`
    /// iterations, starting with the first.
    pub fn optimize<F, E>(
        &mut self,
        mut objective: F,
        iters: usize,
        report_every: usize,
    ) -> Result<PSOReport>
    where
        F: FnMut(&Array2<f64>) -> std::result::Result<Array1<f64>, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        if iters == 0 {
            return Err(PSOError::InvalidIterations { iters });
        }
        if report_every == 0 {
            return Err(PSOError::InvalidReportEvery { report_every });
        }

        let n = self.state.n_particles();
        self.reporter.report(
            &format!(
                "PSO: {} particles, {} dimensions, c1={}, c2={}, m={}, bounds={}",
                n,
                self.state.dims(),
                self.hyperparameters.c1,
                self.hyperparameters.c2,
                self.hyperparameters.m,
                if self.state.bounds.is_some() { "yes" } else { "no" },
            ),
            2,
        );

        let mut cost_hist: Vec<f64> = Vec::with_capacity(iters);
        let mut pos_hist: Vec<Array1<f64>> = Vec::with_capacity(iters);
        let mut nfev = 0usize;

        for iter in 0..iters {
            let current_cost = evaluate(&mut objective, &self.state.pos, iter)?;
            let mut pbest_cost = evaluate(&mut objective, &self.state.pbest_pos, iter)?;
            nfev += 2 * n;

            // strict comparison: ties keep the older personal best; a NaN
            // cost never wins but any comparable cost replaces a NaN one
            let mut improved = 0;
            for i in 0..n {
                let (cur, best) = (current_cost[i], pbest_cost[i]);
                if cur < best || (best.is_nan() && !cur.is_nan()) {
                    pbest_cost[i] = current_cost[i];
                    self.state.pbest_pos.row_mut(i).assign(&self.state.pos.row(i));
                    improved += 1;
                }
            }

            // NaN costs are never selected; the first comparable cost seeds
            // the global best, even when it is +inf
            if let Some((best_idx, best_cost)) = argmin(&pbest_cost) {
                if best_cost < self.state.gbest_cost || self.state.gbest_pos.is_none() {
                    self.state.gbest_cost = best_cost;
                    self.state.gbest_pos = Some(self.state.pbest_pos.row(best_idx).to_owned());
                }
            }
            // all-NaN so far: no global best, recorded as a NaN point at +inf
            let gbest_pos = match &self.state.gbest_pos {
                Some(g) => g.clone(),
                None => Array1::from_elem(self.state.dims(), f64::NAN),
            };

            cost_hist.push(self.state.gbest_cost);
            pos_hist.push(gbest_pos.clone());

            if let Some(ref mut cb) = self.callback {
                cb(&PSOIntermediate {
                    x: gbest_pos,
                    fun: self.state.gbest_cost,
                    improved,
                    iter,
                });
            }

            let accepted = self
                .rule
                .advance(&mut self.state, &self.hyperparameters, &mut self.rng);

            if iter % report_every == 0 {
                self.reporter.report(
                    &format!("Iteration {}/{}, cost: {}", iter + 1, iters, self.state.gbest_cost),
                    1,
                );
                self.reporter.report(
                    &format!(
                        "  improved={}/{} accepted={}/{} nfev={}",
                        improved, n, accepted, n, nfev
                    ),
                    2,
                );
            }
        }

        Ok(PSOReport {
            global_best_cost: self.state.gbest_cost,
            global_best_position: pos_hist[iters - 1].clone(),
            global_best_cost_history: cost_hist,
            global_best_position_history: pos_hist,
            nit: iters,
            nfev,
            swarm: self.state.clone(),
        })
    }
}

fn evaluate<F, E>(objective: &mut F, positions: &Array2<f64>, iteration: usize) -> Result<Array1<f64>>
where
    F: FnMut(&Array2<f64>) -> std::result::Result<Array1<f64>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let costs = objective(positions).map_err(|e| PSOError::ObjectiveEvaluation {
        iteration,
        source: Box::new(e),
    })?;
    if costs.len() != positions.nrows() {
        return Err(PSOError::ObjectiveOutputLength {
            expected: positions.nrows(),
            got: costs.len(),
        });
    }
    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::VecReporter;
    use crate::{Init, PSOConfigBuilder, rowwise, ParallelConfig};
    use ndarray::array;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    fn sphere_batch(p: &Array2<f64>) -> std::result::Result<Array1<f64>, Infallible> {
        Ok(p.rows().into_iter().map(|r| r.dot(&r)).collect())
    }

    fn quiet(builder: PSOConfigBuilder) -> PSOConfig {
        builder.verbose(0).build()
    }

    #[test]
    fn test_missing_hyperparameter_fails_construction() {
        let cfg = quiet(PSOConfigBuilder::new().c1(0.5).m(0.9).seed(1));
        match Optimizer::new(&cfg) {
            Err(PSOError::MissingHyperparameter { name }) => assert_eq!(name, "c2"),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("construction should fail"),
        }
    }

    #[test]
    fn test_bad_bounds_fail_construction() {
        let cfg = quiet(
            PSOConfigBuilder::new()
                .bounds(vec![0.0, 1.0], vec![1.0, 0.5])
                .c1(0.5)
                .c2(0.5)
                .m(0.5),
        );
        let err = Optimizer::new(&cfg).err().unwrap();
        assert!(matches!(err, PSOError::InvalidBounds { index: 1, .. }));

        let mut cfg = cfg;
        cfg.dims = 3;
        let err = Optimizer::new(&cfg).err().unwrap();
        assert!(matches!(err, PSOError::BoundsMismatch { expected: 3, .. }));
    }

    #[test]
    fn test_invalid_loop_arguments() {
        let cfg = quiet(PSOConfigBuilder::new().c1(0.5).c2(0.5).m(0.5).seed(1));
        let mut opt = Optimizer::new(&cfg).unwrap();
        assert!(matches!(
            opt.optimize(sphere_batch, 0, 1),
            Err(PSOError::InvalidIterations { iters: 0 })
        ));
        assert!(matches!(
            opt.optimize(sphere_batch, 3, 0),
            Err(PSOError::InvalidReportEvery { report_every: 0 })
        ));
    }

    #[test]
    fn test_history_and_counters() {
        let cfg = quiet(
            PSOConfigBuilder::new()
                .n_particles(7)
                .bounds(vec![-3.0; 4], vec![3.0; 4])
                .c1(0.5)
                .c2(0.3)
                .m(0.9)
                .seed(42),
        );
        let mut opt = Optimizer::new(&cfg).unwrap();
        let report = opt.optimize(sphere_batch, 25, 5).unwrap();
        assert_eq!(report.global_best_cost_history.len(), 25);
        assert_eq!(report.global_best_position_history.len(), 25);
        assert_eq!(report.nit, 25);
        assert_eq!(report.nfev, 2 * 7 * 25);
        assert_eq!(report.global_best_cost, report.global_best_cost_history[24]);
        assert_eq!(report.global_best_position, report.global_best_position_history[24]);
        for w in report.global_best_cost_history.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn test_objective_error_aborts() {
        #[derive(Debug)]
        struct Boom;
        impl std::fmt::Display for Boom {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "boom")
            }
        }
        impl std::error::Error for Boom {}

        let cfg = quiet(PSOConfigBuilder::new().c1(0.5).c2(0.5).m(0.5).seed(3));
        let mut opt = Optimizer::new(&cfg).unwrap();
        let mut calls = 0;
        let result = opt.optimize(
            |p: &Array2<f64>| {
                calls += 1;
                if calls > 4 {
                    Err(Boom)
                } else {
                    Ok(Array1::zeros(p.nrows()))
                }
            },
            10,
            1,
        );
        match result {
            Err(PSOError::ObjectiveEvaluation { iteration, source }) => {
                assert_eq!(iteration, 2);
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.nit)),
        }
    }

    #[test]
    fn test_wrong_cost_length() {
        let cfg = quiet(PSOConfigBuilder::new().n_particles(5).c1(0.5).c2(0.5).m(0.5).seed(3));
        let mut opt = Optimizer::new(&cfg).unwrap();
        let err = opt
            .optimize(|_: &Array2<f64>| Ok::<_, Infallible>(Array1::zeros(4)), 2, 1)
            .err()
            .unwrap();
        assert!(matches!(err, PSOError::ObjectiveOutputLength { expected: 5, got: 4 }));
    }

    #[test]
    fn test_personal_best_ties_do_not_update() {
        // constant objective: every comparison is a tie
        let start = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];
        let cfg = quiet(
            PSOConfigBuilder::new()
                .n_particles(3)
                .dims(2)
                .init(Init::Positions(start.clone()))
                .c1(1.0)
                .c2(1.0)
                .m(0.7)
                .seed(5),
        );
        let mut opt = Optimizer::new(&cfg).unwrap();
        let report = opt
            .optimize(|p: &Array2<f64>| Ok::<_, Infallible>(Array1::ones(p.nrows())), 6, 1)
            .unwrap();
        assert_eq!(report.swarm.pbest_pos, start);
        // global best: first particle, never replaced by an equal cost
        for pos in &report.global_best_position_history {
            assert_eq!(pos, &array![0.1, 0.2]);
        }
    }

    #[test]
    fn test_nan_at_first_particle_does_not_stick() {
        let start = array![[0.5], [0.1], [0.2]];
        let cfg = quiet(
            PSOConfigBuilder::new()
                .n_particles(3)
                .dims(1)
                .init(Init::Positions(start))
                .c1(0.0)
                .c2(0.0)
                .m(0.0)
                .seed(2),
        );
        let nan_at_half = |p: &Array2<f64>| -> std::result::Result<Array1<f64>, Infallible> {
            Ok(p.column(0).mapv(|x| if x == 0.5 { f64::NAN } else { x * x }))
        };
        let mut opt = Optimizer::new(&cfg).unwrap();
        let report = opt.optimize(nan_at_half, 20, 5).unwrap();

        assert!((report.global_best_cost - 0.01).abs() < 1e-15);
        assert_eq!(report.global_best_position, array![0.1]);
        for c in &report.global_best_cost_history {
            assert!((c - 0.01).abs() < 1e-15);
        }
    }

    #[test]
    fn test_nan_personal_best_is_replaced_by_comparable_cost() {
        let start = array![[0.5], [0.3]];
        let cfg = quiet(
            PSOConfigBuilder::new()
                .n_particles(2)
                .dims(1)
                .init(Init::Positions(start))
                .c1(0.0)
                .c2(0.0)
                .m(0.0)
                .seed(2),
        );
        let mut opt = Optimizer::new(&cfg).unwrap();
        // the starting point is NaN, then the particle is moved somewhere finite
        let nan_at_half = |p: &Array2<f64>| -> std::result::Result<Array1<f64>, Infallible> {
            Ok(p.column(0).mapv(|x| if x == 0.5 { f64::NAN } else { x * x }))
        };
        opt.optimize(nan_at_half, 1, 1).unwrap();
        opt.state_mut().pos[(0, 0)] = 0.2;
        let report = opt.optimize(nan_at_half, 1, 1).unwrap();

        assert_eq!(opt.state().pbest_pos, array![[0.2], [0.3]]);
        assert!((report.global_best_cost - 0.04).abs() < 1e-15);
        assert_eq!(report.global_best_position, array![0.2]);
    }

    #[test]
    fn test_all_nan_leaves_global_best_unset() {
        let cfg = quiet(PSOConfigBuilder::new().n_particles(4).c1(0.5).c2(0.5).m(0.5).seed(8));
        let mut opt = Optimizer::new(&cfg).unwrap();
        let report = opt
            .optimize(|p: &Array2<f64>| Ok::<_, Infallible>(Array1::from_elem(p.nrows(), f64::NAN)), 3, 1)
            .unwrap();
        assert!(opt.state().gbest_pos.is_none());
        assert_eq!(report.global_best_cost_history, vec![f64::INFINITY; 3]);
        assert!(report.global_best_position.iter().all(|x| x.is_nan()));

        // the first comparable cost takes over
        let report = opt.optimize(sphere_batch, 1, 1).unwrap();
        assert!(report.global_best_cost.is_finite());
        assert!(opt.state().gbest_pos.is_some());
    }

    #[test]
    fn test_reporting_cadence() {
        let cfg = quiet(PSOConfigBuilder::new().c1(0.5).c2(0.5).m(0.5).seed(3));
        let messages = Rc::new(RefCell::new(Vec::new()));

        struct Shared(Rc<RefCell<Vec<String>>>);
        impl Reporter for Shared {
            fn report(&mut self, message: &str, level: u8) {
                if level == 1 {
                    self.0.borrow_mut().push(message.to_string());
                }
            }
        }

        let mut opt = Optimizer::new(&cfg)
            .unwrap()
            .with_reporter(Box::new(Shared(messages.clone())));
        opt.optimize(sphere_batch, 10, 4).unwrap();
        let messages = messages.borrow();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].starts_with("Iteration 1/10, cost: "));
        assert!(messages[1].starts_with("Iteration 5/10"));
        assert!(messages[2].starts_with("Iteration 9/10"));

        // VecReporter keeps everything, including detail lines
        let mut opt = Optimizer::new(&cfg)
            .unwrap()
            .with_reporter(Box::new(VecReporter::default()));
        assert!(opt.optimize(sphere_batch, 2, 1).is_ok());
    }

    #[test]
    fn test_callback_sees_every_iteration() {
        let cfg = quiet(PSOConfigBuilder::new().c1(0.5).c2(0.5).m(0.5).seed(11));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut opt = Optimizer::new(&cfg)
            .unwrap()
            .with_callback(Box::new(move |it: &PSOIntermediate| sink.borrow_mut().push((it.iter, it.fun))));
        let report = opt
            .optimize(rowwise(|x: &Array1<f64>| x.sum(), ParallelConfig::default()), 5, 1)
            .unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        for (k, (iter, fun)) in seen.iter().enumerate() {
            assert_eq!(*iter, k);
            assert_eq!(*fun, report.global_best_cost_history[k]);
        }
    }

    #[test]
    fn test_same_seed_same_trace() {
        let cfg = quiet(
            PSOConfigBuilder::new()
                .n_particles(10)
                .bounds(vec![-2.0; 3], vec![2.0; 3])
                .c1(1.2)
                .c2(0.8)
                .m(0.6)
                .seed(99),
        );
        let a = Optimizer::new(&cfg).unwrap().optimize(sphere_batch, 15, 1).unwrap();
        let b = Optimizer::new(&cfg).unwrap().optimize(sphere_batch, 15, 1).unwrap();
        assert_eq!(a.global_best_cost_history, b.global_best_cost_history);
        assert_eq!(a.swarm.pos, b.swarm.pos);
    }
}
