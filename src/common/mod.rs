//! Common types, traits, and error definitions for piecewise_trajectory
//!
//! This module provides the building blocks shared by the decoder,
//! the evaluator and the sampler.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
