//! Common types used throughout piecewise_trajectory

use nalgebra::{DVector, Vector4};
use std::collections::BTreeMap;

/// Number of monomial coefficients per cell: cubic in the basis [1, t, t^2, t^3]
pub const POLYNOMIAL_DEGREE: usize = 4;

/// Coefficients of one cubic cell, lowest order first
pub type CubicCoefficients = Vector4<f64>;

/// Value of a trajectory at one instant, one entry per output row (joint)
pub type JointVector = DVector<f64>;

/// Trajectory resampled at discrete times
#[derive(Debug, Clone, PartialEq)]
pub struct SampledTrajectory {
    pub times: Vec<f64>,
    pub positions: Vec<JointVector>,
}

impl SampledTrajectory {
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, t: f64, position: JointVector) {
        self.times.push(t);
        self.positions.push(position);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of rows in each waypoint, 0 when empty
    pub fn dimension(&self) -> usize {
        self.positions.first().map_or(0, |p| p.len())
    }

    /// Values of a single row (joint) over time
    pub fn row_series(&self, row: usize) -> Vec<f64> {
        self.positions.iter().map(|p| p[row]).collect()
    }

    /// Waypoints as plain nested vectors, the shape sent downstream
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.positions
            .iter()
            .map(|p| p.iter().copied().collect())
            .collect()
    }
}

impl Default for SampledTrajectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Sampled trajectories keyed by entity name
pub type SystemTrajectory = BTreeMap<String, SampledTrajectory>;
