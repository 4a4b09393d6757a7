//! Environment utilities for swarmopt
//!
//! Optimization traces and reports are written below a project root given by
//! the `SWARMOPT_DIR` environment variable.

pub mod constants {
    /// Environment variable naming the project root
    pub const PROJECT_DIR_VAR: &str = "SWARMOPT_DIR";
    /// Directory (relative to the project root) for generated artefacts
    pub const DATA_GENERATED: &str = "data_generated";
    /// Directory (relative to `DATA_GENERATED`) for optimization records
    pub const RECORDS: &str = "records";
}

pub mod env_utils;

pub use env_utils::{EnvError, check_env, get_data_generated_dir, get_project_dir, get_records_dir};
