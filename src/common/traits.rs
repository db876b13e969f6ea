//! Common traits defining interfaces for time-parameterized trajectories

use crate::common::error::TrajectoryResult;
use crate::common::types::JointVector;

/// A vector-valued function of time over a closed domain
pub trait Trajectory {
    /// Closed time interval [start, end] on which the trajectory is defined
    fn domain(&self) -> (f64, f64);

    /// Length of every vector returned by `value`
    fn dimension(&self) -> usize;

    /// Evaluate at time t, failing outside the domain
    fn value(&self, t: f64) -> TrajectoryResult<JointVector>;

    /// Duration of the domain
    fn duration(&self) -> f64 {
        let (start, end) = self.domain();
        end - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::TrajectoryError;

    // Constant trajectory used to check the default methods
    struct Hold {
        level: f64,
    }

    impl Trajectory for Hold {
        fn domain(&self) -> (f64, f64) {
            (1.0, 3.5)
        }

        fn dimension(&self) -> usize {
            1
        }

        fn value(&self, t: f64) -> TrajectoryResult<JointVector> {
            let (start, end) = self.domain();
            if !(t >= start && t <= end) {
                return Err(TrajectoryError::OutOfDomain { t, start, end });
            }
            Ok(JointVector::from_element(1, self.level))
        }
    }

    #[test]
    fn test_trajectory_trait() {
        let hold = Hold { level: 2.0 };
        assert!((hold.duration() - 2.5).abs() < 1e-12);
        assert_eq!(hold.value(2.0).unwrap()[0], 2.0);
        assert!(hold.value(0.0).is_err());
    }
}
