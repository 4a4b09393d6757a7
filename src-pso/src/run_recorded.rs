//! Recording wrapper around [`particle_swarm`](crate::particle_swarm), mostly
//! used by the benchmark binary and tests.

use std::path::Path;

use ndarray::Array1;

use crate::error::Result;
use crate::parallel_eval::rowwise;
use crate::recorder::OptimizationRecorder;
use crate::{Optimizer, PSOConfig, PSOReport};

/// Run PSO and write the global best of every iteration to
/// `<output_dir>/<function_name>.csv`.
///
/// Progress is reported every `report_every` iterations, or ten times per
/// run when `None`. Returns the report and the CSV path.
pub fn run_recorded_pso<F, P>(
    function_name: &str,
    func: F,
    bounds: &[(f64, f64)],
    mut config: PSOConfig,
    iters: usize,
    report_every: Option<usize>,
    output_dir: P,
) -> Result<(PSOReport, String)>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
    P: AsRef<Path>,
{
    config.set_bounds_from_pairs(bounds)?;

    let recorder = OptimizationRecorder::new(function_name.to_string());
    let mut pso = Optimizer::new(&config)?.with_callback(recorder.create_callback());
    let report_every = report_every.unwrap_or((iters / 10).max(1));
    let report = pso.optimize(rowwise(func, config.parallel.clone()), iters, report_every)?;

    let csv_path = recorder.save_to_csv(output_dir)?;
    log::info!(
        "{}: best cost {:.6e} after {} iterations, trace in {}",
        function_name,
        report.global_best_cost,
        report.nit,
        csv_path
    );
    Ok((report, csv_path))
}
