//! Piecewise cubic polynomial trajectories
//!
//! Each segment holds an R x C grid of cubic cells. The value of row j is the
//! sum over its C cells of the cell evaluated in the monomial basis
//! [1, t, t^2, t^3]. Coefficients are fit against absolute time, so the basis
//! is built from t itself and never from the offset into the segment.

use nalgebra::{DMatrix, DVector, Vector4};
use std::collections::BTreeMap;

use crate::common::{
    CubicCoefficients, JointVector, Trajectory, TrajectoryError, TrajectoryResult,
    POLYNOMIAL_DEGREE,
};

/// Monomial basis [1, t, t^2, t^3] at absolute time t
pub fn monomial_basis(t: f64) -> Vector4<f64> {
    let t2 = t * t;
    Vector4::new(1.0, t, t2, t2 * t)
}

/// Index of the segment governing time t.
///
/// `segment_starts` is the break sequence without its final element, i.e.
/// the start time of every segment. A left-biased search finds the first
/// start that is not below t; the segment before it wins. A time lying
/// exactly on an interior break therefore resolves to the segment ending
/// there. t equal to the first break maps to segment 0, and any t at or past
/// the final start maps to the last segment.
pub fn select_segment(segment_starts: &[f64], t: f64) -> usize {
    match segment_starts.partition_point(|&b| b < t) {
        0 => 0,
        idx => idx - 1,
    }
}

/// Immutable piecewise cubic polynomial over [breaks[0], breaks[T-1]]
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial {
    breaks: Vec<f64>,
    rows: usize,
    cols: usize,
    /// One R x (C*K) matrix per segment, cell (j, k) in columns k*K..(k+1)*K
    segments: Vec<DMatrix<f64>>,
}

impl PiecewisePolynomial {
    /// Build from break times and one R x (C*4) coefficient matrix per segment.
    pub fn new(breaks: Vec<f64>, segments: Vec<DMatrix<f64>>) -> TrajectoryResult<Self> {
        validate_breaks(&breaks)?;

        let expected = breaks.len() - 1;
        if segments.len() != expected {
            return Err(TrajectoryError::SizeMismatch {
                expected,
                actual: segments.len(),
            });
        }

        let (rows, width) = segments[0].shape();
        if width % POLYNOMIAL_DEGREE != 0 {
            return Err(TrajectoryError::MalformedTrajectory(format!(
                "coefficient matrix width {} is not a multiple of {}",
                width, POLYNOMIAL_DEGREE
            )));
        }
        let cols = width / POLYNOMIAL_DEGREE;
        if rows == 0 || cols == 0 {
            return Err(TrajectoryError::MalformedTrajectory(format!(
                "coefficient grid of {} rows x {} cols is empty",
                rows, cols
            )));
        }
        if let Some(i) = segments.iter().position(|m| m.shape() != (rows, width)) {
            return Err(TrajectoryError::MalformedTrajectory(format!(
                "segment {} has shape {:?}, expected {:?}",
                i,
                segments[i].shape(),
                (rows, width)
            )));
        }

        Ok(Self {
            breaks,
            rows,
            cols,
            segments,
        })
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn start(&self) -> f64 {
        self.breaks[0]
    }

    pub fn end(&self) -> f64 {
        self.breaks[self.breaks.len() - 1]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Coefficient count per cell (always 4, cubic)
    pub fn degree(&self) -> usize {
        POLYNOMIAL_DEGREE
    }

    /// Coefficients of the cell at tensor index (segment, row, col)
    pub fn cell(&self, segment: usize, row: usize, col: usize) -> Option<CubicCoefficients> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let m = self.segments.get(segment)?;
        let offset = col * POLYNOMIAL_DEGREE;
        Some(Vector4::from_fn(|d, _| m[(row, offset + d)]))
    }

    /// Segment governing time t, None outside the domain
    pub fn segment_index(&self, t: f64) -> Option<usize> {
        if !self.contains(t) {
            return None;
        }
        Some(select_segment(&self.breaks[..self.breaks.len() - 1], t))
    }

    /// Whether t lies in the closed domain; NaN never does
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start() && t <= self.end()
    }

    /// Value of every row at time t.
    pub fn value(&self, t: f64) -> TrajectoryResult<JointVector> {
        let segment = self
            .segment_index(t)
            .ok_or_else(|| TrajectoryError::OutOfDomain {
                t,
                start: self.start(),
                end: self.end(),
            })?;
        Ok(self.evaluate_segment(segment, t))
    }

    /// Evaluate one segment's cells at t, regardless of the segment's span
    fn evaluate_segment(&self, segment: usize, t: f64) -> JointVector {
        let basis = monomial_basis(t);
        // one copy of the basis per cell so a single product sums the columns
        let tiled = DVector::from_fn(self.cols * POLYNOMIAL_DEGREE, |i, _| {
            basis[i % POLYNOMIAL_DEGREE]
        });
        &self.segments[segment] * tiled
    }
}

impl Trajectory for PiecewisePolynomial {
    fn domain(&self) -> (f64, f64) {
        (self.start(), self.end())
    }

    fn dimension(&self) -> usize {
        self.rows
    }

    fn value(&self, t: f64) -> TrajectoryResult<JointVector> {
        PiecewisePolynomial::value(self, t)
    }
}

fn validate_breaks(breaks: &[f64]) -> TrajectoryResult<()> {
    if breaks.len() < 2 {
        return Err(TrajectoryError::MalformedTrajectory(format!(
            "need at least 2 breaks, got {}",
            breaks.len()
        )));
    }
    if let Some(b) = breaks.iter().find(|b| !b.is_finite()) {
        return Err(TrajectoryError::MalformedTrajectory(format!(
            "break {} is not finite",
            b
        )));
    }
    if let Some(i) = breaks.windows(2).position(|w| w[0] >= w[1]) {
        return Err(TrajectoryError::MalformedTrajectory(format!(
            "breaks must be strictly increasing: breaks[{}]={} >= breaks[{}]={}",
            i,
            breaks[i],
            i + 1,
            breaks[i + 1]
        )));
    }
    Ok(())
}

/// Piecewise polynomials keyed by entity name
pub type SystemPolynomial = BTreeMap<String, PiecewisePolynomial>;

/// Evaluate every entity of a system at the same time t
pub fn evaluate_system(
    system: &SystemPolynomial,
    t: f64,
) -> TrajectoryResult<BTreeMap<String, JointVector>> {
    system
        .iter()
        .map(|(name, poly)| Ok((name.clone(), poly.value(t)?)))
        .collect()
}

/// Evaluate a single named entity of a system at time t
pub fn evaluate_entity(system: &SystemPolynomial, entity: &str, t: f64) -> TrajectoryResult<JointVector> {
    system
        .get(entity)
        .ok_or_else(|| TrajectoryError::UnknownEntity(entity.to_string()))?
        .value(t)
}
