//! Error types for the particle swarm optimizer.
//!
//! Errors fall into three families: configuration errors (missing or
//! out-of-range settings), shape errors (bounds or initial positions that do
//! not match the swarm dimensions) and objective errors (anything raised by,
//! or wrong with the output of, the caller-supplied objective). The remaining
//! variants wrap I/O failures from config loading and CSV recording.

use thiserror::Error;

/// Errors that can occur while building or running a swarm.
#[derive(Debug, Error)]
pub enum PSOError {
    /// A mandatory hyperparameter was not provided.
    #[error("missing hyperparameter: {name}")]
    MissingHyperparameter {
        /// Name of the missing field (`c1`, `c2` or `m`)
        name: &'static str,
    },

    /// The swarm must contain at least one particle.
    #[error("number of particles ({n_particles}) must be >= 1")]
    InvalidParticleCount {
        /// The invalid particle count
        n_particles: usize,
    },

    /// The search space must have at least one dimension.
    #[error("number of dimensions ({dims}) must be >= 1")]
    InvalidDimensions {
        /// The invalid dimension count
        dims: usize,
    },

    /// The optimizer must run at least one iteration.
    #[error("number of iterations ({iters}) must be >= 1")]
    InvalidIterations {
        /// The invalid iteration count
        iters: usize,
    },

    /// The reporting cadence must be at least one.
    #[error("report_every ({report_every}) must be >= 1")]
    InvalidReportEvery {
        /// The invalid cadence
        report_every: usize,
    },

    /// Lower or upper bounds do not have one entry per dimension.
    #[error("bounds mismatch: expected {expected} elements, lower has {lower_len}, upper has {upper_len}")]
    BoundsMismatch {
        /// Number of dimensions of the swarm
        expected: usize,
        /// Length of the lower bounds array
        lower_len: usize,
        /// Length of the upper bounds array
        upper_len: usize,
    },

    /// A lower bound exceeds its corresponding upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// Explicit starting positions do not form a `n_particles x dims` matrix.
    #[error("initial positions shape mismatch: expected {expected:?}, got {got:?}")]
    InitialPositionsShape {
        /// Expected (rows, cols)
        expected: (usize, usize),
        /// Actual (rows, cols)
        got: (usize, usize),
    },

    /// An explicit starting position lies outside the box.
    #[error("initial position of particle {particle} lies outside the bounds")]
    InitialPositionOutOfBounds {
        /// Index of the offending particle
        particle: usize,
    },

    /// The objective function failed.
    #[error("objective evaluation failed at iteration {iteration}: {source}")]
    ObjectiveEvaluation {
        /// Iteration (0-based) during which the failure happened
        iteration: usize,
        /// Error raised by the objective
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The objective returned a cost vector of the wrong length.
    #[error("objective returned {got} costs for {expected} particles")]
    ObjectiveOutputLength {
        /// Number of particles evaluated
        expected: usize,
        /// Number of costs returned
        got: usize,
    },

    /// I/O failure while reading a config file or writing a record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML configuration.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failure while writing a CSV record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized `Result` type for PSO operations.
pub type Result<T> = std::result::Result<T, PSOError>;

impl PSOError {
    /// Returns `true` if this is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PSOError::MissingHyperparameter { .. }
                | PSOError::InvalidParticleCount { .. }
                | PSOError::InvalidDimensions { .. }
                | PSOError::InvalidIterations { .. }
                | PSOError::InvalidReportEvery { .. }
        )
    }

    /// Returns `true` if this is a shape error (bounds or starting positions).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            PSOError::BoundsMismatch { .. }
                | PSOError::InvalidBounds { .. }
                | PSOError::InitialPositionsShape { .. }
                | PSOError::InitialPositionOutOfBounds { .. }
        )
    }

    /// Returns `true` if the failure comes from the objective function.
    pub fn is_objective_error(&self) -> bool {
        matches!(
            self,
            PSOError::ObjectiveEvaluation { .. } | PSOError::ObjectiveOutputLength { .. }
        )
    }
}
