//! piecewise_trajectory - decoding and evaluation of planned trajectories
//!
//! A motion planner returns, per robot, a piecewise cubic polynomial
//! flattened into a wire message. This crate decodes those messages,
//! evaluates the polynomials at arbitrary times and resamples them into
//! fixed-rate waypoints.

// Core modules
pub mod common;
pub mod utils;

// Trajectory engine
pub mod trajectory;

// Re-export common types for convenience
pub use common::{JointVector, SampledTrajectory, SystemTrajectory, POLYNOMIAL_DEGREE};
pub use common::Trajectory;
pub use common::{TrajectoryError, TrajectoryResult};
pub use trajectory::{PiecewisePolynomial, SamplerConfig, SystemPolynomial};
