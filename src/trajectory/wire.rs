//! Wire messages exchanged with the motion planning service
//!
//! A planner returns one `PolynomialMsg` per entity with the coefficient
//! tensor flattened segment-major, then row, then column. Sampled output
//! goes back out as plain nested vectors keyed by the same entity names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::{SystemTrajectory, TrajectoryResult};

/// Serialized piecewise polynomial of a single entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialMsg {
    /// T strictly increasing break times
    pub breaks: Vec<f64>,
    /// R, the number of output rows (joints)
    pub rows: usize,
    /// C, the number of cells summed per row
    pub cols: usize,
    /// (T-1)*R*C cells of 4 coefficients each
    #[serde(alias = "coeffs")]
    pub coefficients: Vec<Vec<f64>>,
}

/// Polynomials for every entity of a system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemPolynomialMsg {
    pub data: BTreeMap<String, PolynomialMsg>,
}

impl SystemPolynomialMsg {
    pub fn from_json_str(json: &str) -> TrajectoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string_pretty(&self) -> TrajectoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sampled waypoints for every entity of a system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemTrajectoryMsg {
    pub data: BTreeMap<String, Vec<Vec<f64>>>,
}

impl SystemTrajectoryMsg {
    pub fn to_json_string_pretty(&self) -> TrajectoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&SystemTrajectory> for SystemTrajectoryMsg {
    fn from(system: &SystemTrajectory) -> Self {
        let data = system
            .iter()
            .map(|(name, traj)| (name.clone(), traj.to_rows()))
            .collect();
        Self { data }
    }
}
