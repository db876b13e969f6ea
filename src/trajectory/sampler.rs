//! Trajectory sampler
//!
//! Resamples a continuous trajectory into waypoints at a fixed rate,
//! starting at the first break. The final break is excluded unless
//! `inclusive_end` is set.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::{SampledTrajectory, SystemTrajectory, Trajectory, TrajectoryError, TrajectoryResult};
use crate::trajectory::piecewise::SystemPolynomial;

/// Configuration for the trajectory sampler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Sampling rate [Hz]
    pub frequency_hz: f64,
    /// Append the value at the final break after the fixed-rate samples
    pub inclusive_end: bool,
    /// Upper bound on waypoints per entity, None for unbounded
    pub max_samples: Option<usize>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 20.0,
            inclusive_end: false,
            max_samples: Some(1_000_000),
        }
    }
}

impl SamplerConfig {
    pub fn new(frequency_hz: f64) -> Self {
        Self {
            frequency_hz,
            ..Self::default()
        }
    }

    /// Rate from a sampling interval in milliseconds
    pub fn from_interval_ms(interval_ms: f64) -> Self {
        Self::new(1000.0 / interval_ms)
    }

    pub fn with_inclusive_end(mut self, inclusive_end: bool) -> Self {
        self.inclusive_end = inclusive_end;
        self
    }

    pub fn with_max_samples(mut self, max_samples: Option<usize>) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Time between consecutive samples [s]
    pub fn step(&self) -> TrajectoryResult<f64> {
        let f = self.frequency_hz;
        if !(f.is_finite() && f > 0.0) {
            return Err(TrajectoryError::InvalidSamplingFrequency(f));
        }
        let dt = 1.0 / f;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TrajectoryError::InvalidSamplingFrequency(f));
        }
        Ok(dt)
    }
}

/// Time stamps at which `sample_with` evaluates the trajectory.
///
/// The n-th stamp is start + n*dt, computed directly so rounding does not
/// accumulate across steps.
pub fn sample_times<T: Trajectory + ?Sized>(
    traj: &T,
    config: &SamplerConfig,
) -> TrajectoryResult<Vec<f64>> {
    let dt = config.step()?;
    let (start, end) = traj.domain();
    let limit = config.max_samples.unwrap_or(usize::MAX);
    let exceeded = |required: usize| TrajectoryError::SampleLimitExceeded { required, limit };

    let mut times = Vec::new();
    let mut n: usize = 0;
    loop {
        let t = start + n as f64 * dt;
        if n > 0 && !(t < end) {
            break;
        }
        if times.len() >= limit {
            return Err(exceeded(estimated_count(start, end, config)));
        }
        times.push(t);
        n += 1;
    }

    if config.inclusive_end && times.last().map_or(true, |&last| last < end) {
        if times.len() >= limit {
            return Err(exceeded(times.len() + 1));
        }
        times.push(end);
    }
    Ok(times)
}

fn estimated_count(start: f64, end: f64, config: &SamplerConfig) -> usize {
    let n = ((end - start) * config.frequency_hz).ceil() as usize;
    n.max(1) + config.inclusive_end as usize
}

/// Sample a trajectory at a fixed frequency with the reference semantics:
/// no sample limit, final break excluded.
pub fn sample<T: Trajectory + ?Sized>(traj: &T, frequency_hz: f64) -> TrajectoryResult<SampledTrajectory> {
    let config = SamplerConfig::new(frequency_hz).with_max_samples(None);
    sample_with(traj, &config)
}

/// Sample a trajectory according to `config`.
pub fn sample_with<T: Trajectory + ?Sized>(
    traj: &T,
    config: &SamplerConfig,
) -> TrajectoryResult<SampledTrajectory> {
    let times = sample_times(traj, config)?;
    let mut out = SampledTrajectory::with_capacity(times.len());
    for t in times {
        out.push(t, traj.value(t)?);
    }
    Ok(out)
}

/// Sample every entity of a system with the same configuration.
pub fn sample_system(
    system: &SystemPolynomial,
    config: &SamplerConfig,
) -> TrajectoryResult<SystemTrajectory> {
    let mut trajectories = SystemTrajectory::new();
    for (name, poly) in system {
        let traj = sample_with(poly, config).map_err(|e| {
            warn!(entity = %name, error = %e, "failed to sample trajectory");
            e
        })?;
        debug!(
            entity = %name,
            samples = traj.len(),
            frequency_hz = config.frequency_hz,
            "sampled trajectory"
        );
        trajectories.insert(name.clone(), traj);
    }
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::piecewise::PiecewisePolynomial;
    use nalgebra::DMatrix;

    /// f0(t) = t on [0, 1], f1(t) = 10 on [1, 2]
    fn ramp_then_hold() -> PiecewisePolynomial {
        let segments = vec![
            DMatrix::from_row_slice(1, 4, &[0.0, 1.0, 0.0, 0.0]),
            DMatrix::from_row_slice(1, 4, &[10.0, 0.0, 0.0, 0.0]),
        ];
        PiecewisePolynomial::new(vec![0.0, 1.0, 2.0], segments).unwrap()
    }

    #[test]
    fn test_sample_excludes_final_break() {
        let traj = sample(&ramp_then_hold(), 1.0).unwrap();
        assert_eq!(traj.to_rows(), vec![vec![0.0], vec![1.0]]);
        assert_eq!(traj.times, vec![0.0, 1.0]);
    }

    #[test]
    fn test_sample_inclusive_end() {
        let config = SamplerConfig::new(1.0).with_inclusive_end(true);
        let traj = sample_with(&ramp_then_hold(), &config).unwrap();
        assert_eq!(traj.to_rows(), vec![vec![0.0], vec![1.0], vec![10.0]]);
        assert_eq!(traj.times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_sample_count_at_ten_hz() {
        // 0.0, 0.1, ..., 1.9: 20 samples, no drift onto t=2
        let traj = sample(&ramp_then_hold(), 10.0).unwrap();
        assert_eq!(traj.len(), 20);
        assert!((traj.times[19] - 1.9).abs() < 1e-12);
        assert!((traj.positions[5][0] - 0.5).abs() < 1e-12);
        assert!((traj.positions[15][0] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_coarse_rate_keeps_start() {
        // step longer than the whole domain
        let traj = sample(&ramp_then_hold(), 0.1).unwrap();
        assert_eq!(traj.times, vec![0.0]);
    }

    #[test]
    fn test_invalid_frequency() {
        let p = ramp_then_hold();
        for &f in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY].iter() {
            assert!(matches!(
                sample(&p, f),
                Err(TrajectoryError::InvalidSamplingFrequency(_))
            ));
        }
    }

    #[test]
    fn test_sample_limit() {
        let p = ramp_then_hold();
        let config = SamplerConfig::new(1000.0).with_max_samples(Some(100));
        assert!(matches!(
            sample_with(&p, &config),
            Err(TrajectoryError::SampleLimitExceeded { limit: 100, .. })
        ));

        let config = SamplerConfig::new(1.0).with_max_samples(Some(2));
        assert_eq!(sample_with(&p, &config).unwrap().len(), 2);
        assert!(sample_with(&p, &config.with_inclusive_end(true)).is_err());
    }

    #[test]
    fn test_from_interval_ms() {
        let config = SamplerConfig::from_interval_ms(50.0);
        assert!((config.frequency_hz - 20.0).abs() < 1e-12);
        assert!((config.step().unwrap() - 0.05).abs() < 1e-12);
        assert!(SamplerConfig::from_interval_ms(0.0).step().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: SamplerConfig =
            serde_json::from_str(r#"{ "frequency_hz": 50.0, "inclusive_end": true }"#).unwrap();
        assert_eq!(config.frequency_hz, 50.0);
        assert!(config.inclusive_end);
        assert_eq!(config.max_samples, SamplerConfig::default().max_samples);
    }

    #[test]
    fn test_sample_system() {
        let mut system = SystemPolynomial::new();
        system.insert("ur5e".to_string(), ramp_then_hold());
        system.insert("iiwa".to_string(), ramp_then_hold());
        let trajectories = sample_system(&system, &SamplerConfig::new(2.0)).unwrap();
        assert_eq!(trajectories.len(), 2);
        assert_eq!(trajectories["iiwa"].len(), 4);
        assert_eq!(trajectories["ur5e"].dimension(), 1);
    }
}
