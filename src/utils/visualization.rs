//! Visualization utilities for piecewise_trajectory
//!
//! Plots sampled joint positions against time using gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth};

use crate::common::{SampledTrajectory, SystemTrajectory, TrajectoryError, TrajectoryResult};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00AA00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const PURPLE: &str = "#800080";
    pub const CYAN: &str = "#00CCCC";
    pub const GRAY: &str = "#808080";

    /// Cycled across joints of a trajectory
    pub const JOINTS: [&str; 7] = [RED, BLUE, GREEN, ORANGE, PURPLE, CYAN, BLACK];
}

/// Style for one plotted series
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl SeriesStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    /// Default style for row `row` of entity `entity`
    pub fn for_joint(entity: &str, row: usize) -> Self {
        Self::new(
            colors::JOINTS[row % colors::JOINTS.len()],
            &format!("{} q{}", entity, row),
        )
    }
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self::new(colors::GRAY, "Series")
    }
}

/// One line queued for drawing
#[derive(Debug, Clone)]
struct Series {
    times: Vec<f64>,
    values: Vec<f64>,
    style: SeriesStyle,
}

/// Main visualizer struct
///
/// Series are queued and drawn onto a single shared axes when the figure is
/// rendered, so every line shares the same time and value scales.
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    series: Vec<Series>,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_label: "t [s]".to_string(),
            y_label: "q [rad]".to_string(),
            x_range: None,
            y_range: None,
            series: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_label(&mut self, label: &str) -> &mut Self {
        self.x_label = label.to_string();
        self
    }

    pub fn set_y_label(&mut self, label: &str) -> &mut Self {
        self.y_label = label.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Number of series queued so far
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Plot one series of values against time
    pub fn plot_series(&mut self, times: &[f64], values: &[f64], style: &SeriesStyle) -> &mut Self {
        self.series.push(Series {
            times: times.to_vec(),
            values: values.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot every row of a sampled trajectory, one line per joint
    pub fn plot_trajectory(&mut self, entity: &str, traj: &SampledTrajectory) -> &mut Self {
        for row in 0..traj.dimension() {
            let values = traj.row_series(row);
            self.plot_series(&traj.times, &values, &SeriesStyle::for_joint(entity, row));
        }
        self
    }

    /// Plot all entities of a system
    pub fn plot_system(&mut self, system: &SystemTrajectory) -> &mut Self {
        for (entity, traj) in system {
            self.plot_trajectory(entity, traj);
        }
        self
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> TrajectoryResult<()> {
        self.apply_settings();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| TrajectoryError::Visualization(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> TrajectoryResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| TrajectoryError::Visualization(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg(&mut self, path: &str) -> TrajectoryResult<()> {
        self.apply_settings();
        self.figure
            .save_to_svg(path, 800, 600)
            .map_err(|e| TrajectoryError::Visualization(e.to_string()))
    }

    fn apply_settings(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes2d();

        for series in &self.series {
            axes.lines(
                &series.times,
                &series.values,
                &[
                    Caption(&series.style.caption),
                    Color(&series.style.color),
                    LineWidth(series.style.line_width),
                ],
            );
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
