// Trajectory decoding, evaluation and sampling

pub mod wire;
pub mod decoder;
pub mod piecewise;
pub mod sampler;

pub use wire::*;
pub use decoder::*;
pub use piecewise::*;
pub use sampler::*;
