//! Utility modules for piecewise_trajectory

pub mod visualization;

pub use visualization::{Visualizer, SeriesStyle, colors};
