//! Error types for piecewise_trajectory

use thiserror::Error;

/// Main error type for decoding, evaluating and sampling trajectories
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// Break sequence or shape cannot describe a piecewise polynomial
    #[error("Malformed trajectory: {0}")]
    MalformedTrajectory(String),
    /// Flattened coefficient count does not match (T-1)*R*C
    #[error("Size mismatch: expected {expected} coefficient cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// A coefficient cell is not a cubic (4 entries)
    #[error("Degree mismatch at cell {index}: expected {expected} coefficients, got {actual}")]
    DegreeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    /// Query time outside [start, end]
    #[error("Polynomial is undefined for t={t} outside [{start}, {end}]")]
    OutOfDomain { t: f64, start: f64, end: f64 },
    /// Sampling frequency is not a finite positive number
    #[error("Invalid sampling frequency: {0} Hz")]
    InvalidSamplingFrequency(f64),
    /// Sampling would emit more waypoints than the configured limit
    #[error("Sampling requires {required} samples, limit is {limit}")]
    SampleLimitExceeded { required: usize, limit: usize },
    /// No trajectory is registered under this entity name
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Wire message could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for trajectory operations
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;
