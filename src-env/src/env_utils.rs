//! Environment variable utilities
//!
//! The `SWARMOPT_DIR` variable points to the project root; generated files
//! go to `$SWARMOPT_DIR/data_generated` and optimization records to
//! `$SWARMOPT_DIR/data_generated/records`.

use crate::constants::{DATA_GENERATED, PROJECT_DIR_VAR, RECORDS};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "SWARMOPT_DIR environment variable is not set. Please set it to the project root directory (e.g., export SWARMOPT_DIR=/path/to/swarmopt)"
    )]
    ProjectDirNotSet,

    #[error("SWARMOPT_DIR points to a non-existent directory: {0}")]
    ProjectDirNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirCreationFailed(std::io::Error),
}

/// Validate a candidate project root.
fn resolve_project_dir(value: Option<String>) -> Result<PathBuf, EnvError> {
    let path = PathBuf::from(value.ok_or(EnvError::ProjectDirNotSet)?);
    if !path.exists() {
        return Err(EnvError::ProjectDirNotFound(path));
    }
    Ok(path)
}

/// `root/sub`, created if missing.
fn ensure_subdir(root: &Path, sub: &str) -> Result<PathBuf, EnvError> {
    let dir = root.join(sub);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(EnvError::DirCreationFailed)?;
    }
    Ok(dir)
}

/// Get the SWARMOPT_DIR environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if SWARMOPT_DIR is not set or points to a
/// non-existent directory.
///
/// # Example
///
/// ```no_run
/// use swarmopt_env::get_project_dir;
///
/// let root = get_project_dir()?;
/// println!("Project directory: {}", root.display());
/// # Ok::<(), swarmopt_env::EnvError>(())
/// ```
pub fn get_project_dir() -> Result<PathBuf, EnvError> {
    resolve_project_dir(env::var(PROJECT_DIR_VAR).ok())
}

/// Get the path to the data_generated directory, creating it if necessary
pub fn get_data_generated_dir() -> Result<PathBuf, EnvError> {
    ensure_subdir(&get_project_dir()?, DATA_GENERATED)
}

/// Get the path to data_generated/records, creating it if necessary
///
/// ```no_run
/// use swarmopt_env::get_records_dir;
///
/// let records_dir = get_records_dir()?;
/// println!("Records directory: {}", records_dir.display());
/// # Ok::<(), swarmopt_env::EnvError>(())
/// ```
pub fn get_records_dir() -> Result<PathBuf, EnvError> {
    ensure_subdir(&get_data_generated_dir()?, RECORDS)
}

/// Check that SWARMOPT_DIR is usable and print where output will go
pub fn check_env() -> Result<(), EnvError> {
    let root = get_project_dir()?;
    let data_generated = get_data_generated_dir()?;

    println!("✓ SWARMOPT_DIR: {}", root.display());
    println!("✓ Data directory: {}", data_generated.display());

    Ok(())
}
