use std::fs::create_dir_all;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::PSOIntermediate;
use crate::error::Result;

/// Records optimization progress via PSO callbacks
#[derive(Debug)]
pub struct OptimizationRecorder {
    /// Function name (used for CSV filename)
    function_name: String,
    /// Shared records storage
    records: Arc<Mutex<Vec<OptimizationRecord>>>,
    /// Best cost seen so far
    best_value: Arc<Mutex<Option<f64>>>,
}

/// A single optimization iteration record
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRecord {
    /// Iteration number
    pub iteration: usize,
    /// Global best position after this iteration
    pub x: Vec<f64>,
    /// Global best cost after this iteration
    pub best_result: f64,
    /// Whether this iteration improved the best known result
    pub is_improvement: bool,
}

impl OptimizationRecorder {
    /// Create a new optimization recorder for the given function
    pub fn new(function_name: String) -> Self {
        Self {
            function_name,
            records: Arc::new(Mutex::new(Vec::new())),
            best_value: Arc::new(Mutex::new(None)),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Create a callback function that records optimization progress
    pub fn create_callback(&self) -> Box<dyn FnMut(&PSOIntermediate)> {
        let records = Arc::clone(&self.records);
        let best_value = Arc::clone(&self.best_value);

        Box::new(move |intermediate: &PSOIntermediate| {
            let is_improvement = {
                let mut best = best_value.lock().unwrap_or_else(PoisonError::into_inner);
                let improved = match *best {
                    Some(b) => intermediate.fun < b,
                    None => true,
                };
                if improved {
                    *best = Some(intermediate.fun);
                }
                improved
            };

            records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(OptimizationRecord {
                    iteration: intermediate.iter,
                    x: intermediate.x.to_vec(),
                    best_result: intermediate.fun,
                    is_improvement,
                });
        })
    }

    /// Save all recorded iterations to `<output_dir>/<function_name>.csv`
    ///
    /// Columns are `iteration,x0,..,x{D-1},best_result,is_improvement`; an
    /// empty recorder produces an empty file. Returns the file path.
    pub fn save_to_csv<P: AsRef<Path>>(&self, output_dir: P) -> Result<String> {
        let output_dir = output_dir.as_ref();
        create_dir_all(output_dir)?;

        let path = output_dir.join(format!("{}.csv", self.function_name));
        let mut writer = csv::Writer::from_path(&path)?;

        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(first) = records.first() {
            let mut header = vec!["iteration".to_string()];
            header.extend((0..first.x.len()).map(|i| format!("x{}", i)));
            header.push("best_result".to_string());
            header.push("is_improvement".to_string());
            writer.write_record(&header)?;

            for record in records.iter() {
                let mut row = vec![record.iteration.to_string()];
                row.extend(record.x.iter().map(|xi| format!("{:.16}", xi)));
                row.push(format!("{:.16}", record.best_result));
                row.push(record.is_improvement.to_string());
                writer.write_record(&row)?;
            }
        }
        writer.flush()?;

        Ok(path.to_string_lossy().into_owned())
    }

    /// Get a copy of all recorded iterations
    pub fn get_records(&self) -> Vec<OptimizationRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of iterations recorded
    pub fn num_iterations(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Clear all recorded iterations
    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clear();
        *self.best_value.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Get the final best solution if any iterations were recorded
    pub fn get_best_solution(&self) -> Option<(Vec<f64>, f64)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|r| (r.x.clone(), r.best_result))
    }
}
