//! Trajectory decoder
//!
//! Rebuilds the (T-1, R, C, K) coefficient tensor of each entity from the
//! flat cell list of a `PolynomialMsg`. The encoder lays cells out
//! segment-major, then row, then column; `flat_index` is the one place that
//! knows this.

use itertools::iproduct;
use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::common::{TrajectoryError, TrajectoryResult, POLYNOMIAL_DEGREE};
use crate::trajectory::piecewise::{PiecewisePolynomial, SystemPolynomial};
use crate::trajectory::wire::{PolynomialMsg, SystemPolynomialMsg};

/// Position of tensor cell (segment, row, col) in the flat wire list
pub fn flat_index(segment: usize, row: usize, col: usize, rows: usize, cols: usize) -> usize {
    segment * rows * cols + row * cols + col
}

/// Decode one entity's polynomial.
///
/// Nothing is built unless the whole message is consistent.
pub fn decode_polynomial(msg: &PolynomialMsg) -> TrajectoryResult<PiecewisePolynomial> {
    let (rows, cols) = (msg.rows, msg.cols);
    if msg.breaks.len() < 2 {
        return Err(TrajectoryError::MalformedTrajectory(format!(
            "need at least 2 breaks, got {}",
            msg.breaks.len()
        )));
    }
    if rows == 0 || cols == 0 {
        return Err(TrajectoryError::MalformedTrajectory(format!(
            "rows and cols must be positive, got {} x {}",
            rows, cols
        )));
    }

    let n_segments = msg.breaks.len() - 1;
    let expected = n_segments
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .ok_or_else(|| {
            TrajectoryError::MalformedTrajectory(format!(
                "{} segments x {} rows x {} cols overflows",
                n_segments, rows, cols
            ))
        })?;
    if msg.coefficients.len() != expected {
        return Err(TrajectoryError::SizeMismatch {
            expected,
            actual: msg.coefficients.len(),
        });
    }
    if let Some(index) = msg
        .coefficients
        .iter()
        .position(|c| c.len() != POLYNOMIAL_DEGREE)
    {
        return Err(TrajectoryError::DegreeMismatch {
            index,
            expected: POLYNOMIAL_DEGREE,
            actual: msg.coefficients[index].len(),
        });
    }

    let mut segments = vec![DMatrix::zeros(rows, cols * POLYNOMIAL_DEGREE); n_segments];
    for (i, j, k) in iproduct!(0..n_segments, 0..rows, 0..cols) {
        let cell = &msg.coefficients[flat_index(i, j, k, rows, cols)];
        for (d, &c) in cell.iter().enumerate() {
            segments[i][(j, k * POLYNOMIAL_DEGREE + d)] = c;
        }
    }

    PiecewisePolynomial::new(msg.breaks.clone(), segments)
}

/// Decode every entity of a system, failing on the first bad one.
pub fn decode_system(msg: &SystemPolynomialMsg) -> TrajectoryResult<SystemPolynomial> {
    let mut system = SystemPolynomial::new();
    for (name, poly_msg) in &msg.data {
        let poly = decode_polynomial(poly_msg).map_err(|e| {
            warn!(entity = %name, error = %e, "failed to decode trajectory");
            e
        })?;
        debug!(
            entity = %name,
            segments = poly.segment_count(),
            rows = poly.rows(),
            cols = poly.cols(),
            "decoded trajectory"
        );
        system.insert(name.clone(), poly);
    }
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};

    fn scenario_msg() -> PolynomialMsg {
        PolynomialMsg {
            breaks: vec![0.0, 1.0, 2.0],
            rows: 1,
            cols: 1,
            coefficients: vec![vec![0.0, 1.0, 0.0, 0.0], vec![10.0, 0.0, 0.0, 0.0]],
        }
    }

    #[test]
    fn test_flat_index() {
        // R=3, C=2
        assert_eq!(flat_index(0, 0, 0, 3, 2), 0);
        assert_eq!(flat_index(0, 0, 1, 3, 2), 1);
        assert_eq!(flat_index(0, 1, 0, 3, 2), 2);
        assert_eq!(flat_index(0, 2, 1, 3, 2), 5);
        assert_eq!(flat_index(1, 0, 0, 3, 2), 6);
        assert_eq!(flat_index(2, 1, 1, 3, 2), 15);
    }

    #[test]
    fn test_decode_recovers_tensor() {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Normal::new(0.0, 5.0).unwrap();

        for _ in 0..20 {
            let n_breaks = rng.gen_range(2..6);
            let rows = rng.gen_range(1..7);
            let cols = rng.gen_range(1..4);
            let breaks: Vec<f64> = (0..n_breaks).map(|i| i as f64 * 0.5).collect();
            let coefficients: Vec<Vec<f64>> = (0..(n_breaks - 1) * rows * cols)
                .map(|_| (0..POLYNOMIAL_DEGREE).map(|_| normal.sample(&mut rng)).collect())
                .collect();
            let msg = PolynomialMsg {
                breaks,
                rows,
                cols,
                coefficients,
            };

            let poly = decode_polynomial(&msg).unwrap();
            assert_eq!(poly.segment_count(), n_breaks - 1);
            assert_eq!(poly.rows(), rows);
            assert_eq!(poly.cols(), cols);
            assert_eq!(poly.degree(), POLYNOMIAL_DEGREE);
            for (i, j, k) in iproduct!(0..n_breaks - 1, 0..rows, 0..cols) {
                let cell = poly.cell(i, j, k).unwrap();
                let flat = &msg.coefficients[flat_index(i, j, k, rows, cols)];
                assert_eq!(cell.as_slice(), flat.as_slice());
            }
        }
    }

    #[test]
    fn test_decode_scenario_values() {
        let poly = decode_polynomial(&scenario_msg()).unwrap();
        assert!((poly.value(0.5).unwrap()[0] - 0.5).abs() < 1e-12);
        assert!((poly.value(1.0).unwrap()[0] - 1.0).abs() < 1e-12);
        assert!((poly.value(1.5).unwrap()[0] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_decode_rejects_too_few_breaks() {
        let mut msg = scenario_msg();
        msg.breaks = vec![0.0];
        msg.coefficients.clear();
        assert!(matches!(
            decode_polynomial(&msg),
            Err(TrajectoryError::MalformedTrajectory(_))
        ));
    }

    #[test]
    fn test_decode_rejects_size_mismatch() {
        let mut msg = scenario_msg();
        msg.coefficients.pop();
        assert!(matches!(
            decode_polynomial(&msg),
            Err(TrajectoryError::SizeMismatch {
                expected: 2,
                actual: 1
            })
        ));

        let mut msg = scenario_msg();
        msg.rows = 2;
        assert!(matches!(
            decode_polynomial(&msg),
            Err(TrajectoryError::SizeMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_decode_rejects_degree_mismatch() {
        let mut msg = scenario_msg();
        msg.coefficients[1] = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(matches!(
            decode_polynomial(&msg),
            Err(TrajectoryError::DegreeMismatch {
                index: 1,
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_decode_rejects_unordered_breaks() {
        let mut msg = scenario_msg();
        msg.breaks = vec![0.0, 2.0, 1.0];
        assert!(matches!(
            decode_polynomial(&msg),
            Err(TrajectoryError::MalformedTrajectory(_))
        ));
    }

    #[test]
    fn test_decode_system() {
        let mut msg = SystemPolynomialMsg::default();
        msg.data.insert("left".to_string(), scenario_msg());
        msg.data.insert("right".to_string(), scenario_msg());
        let system = decode_system(&msg).unwrap();
        assert_eq!(system.len(), 2);
        assert!(system.contains_key("left"));

        let mut bad = scenario_msg();
        bad.cols = 0;
        msg.data.insert("broken".to_string(), bad);
        assert!(decode_system(&msg).is_err());
    }
}
