//! Decode a planner's system polynomial and evaluate or resample it.
//!
//! ```bash
//! sample_trajectory sample --input plan.json --interval-ms 50 --output traj.json
//! sample_trajectory eval --input plan.json --time 1.25 --entity ur5e
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use piecewise_trajectory::trajectory::{
    decode_system, evaluate_entity, evaluate_system, sample_system, SamplerConfig,
    SystemPolynomialMsg, SystemTrajectoryMsg,
};
use piecewise_trajectory::utils::Visualizer;
use piecewise_trajectory::{SystemPolynomial, TrajectoryResult};

#[derive(Parser, Debug)]
#[command(name = "sample_trajectory")]
#[command(about = "Evaluate and resample piecewise cubic trajectories returned by a motion planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resample every entity at a fixed rate and write the waypoints as JSON
    Sample(SampleArgs),
    /// Evaluate the trajectories at a single time
    Eval(EvalArgs),
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// System polynomial message (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Sampler configuration file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling frequency in Hz
    #[arg(long, conflicts_with = "interval_ms")]
    frequency: Option<f64>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    interval_ms: Option<f64>,

    /// Append the waypoint at the final break
    #[arg(long)]
    inclusive_end: bool,

    /// Maximum number of waypoints per entity
    #[arg(long)]
    max_samples: Option<usize>,

    /// Write waypoints here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Save a PNG plot of joint positions over time
    #[arg(long)]
    plot: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// System polynomial message (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Query time [s]
    #[arg(long, allow_hyphen_values = true)]
    time: f64,

    /// Only evaluate this entity
    #[arg(long)]
    entity: Option<String>,
}

fn load_system(path: &Path) -> TrajectoryResult<SystemPolynomial> {
    let json = fs::read_to_string(path)?;
    let msg = SystemPolynomialMsg::from_json_str(&json)?;
    let system = decode_system(&msg)?;
    info!("Decoded {} trajectories from {}", system.len(), path.display());
    Ok(system)
}

fn sampler_config(args: &SampleArgs) -> TrajectoryResult<SamplerConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SamplerConfig::default(),
    };
    if let Some(hz) = args.frequency {
        config.frequency_hz = hz;
    }
    if let Some(ms) = args.interval_ms {
        config.frequency_hz = SamplerConfig::from_interval_ms(ms).frequency_hz;
    }
    if args.inclusive_end {
        config.inclusive_end = true;
    }
    if args.max_samples.is_some() {
        config.max_samples = args.max_samples;
    }
    config.step()?;
    Ok(config)
}

fn run_sample(args: &SampleArgs) -> TrajectoryResult<()> {
    let config = sampler_config(args)?;
    let system = load_system(&args.input)?;
    let trajectories = sample_system(&system, &config)?;
    for (name, traj) in &trajectories {
        info!("{}: {} waypoints at {} Hz", name, traj.len(), config.frequency_hz);
    }

    let json = SystemTrajectoryMsg::from(&trajectories).to_json_string_pretty()?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("Wrote waypoints to {}", path.display());
        }
        None => println!("{}", json),
    }

    if let Some(path) = &args.plot {
        let mut vis = Visualizer::new();
        vis.set_title("Sampled joint trajectories");
        vis.plot_system(&trajectories);
        vis.save_png(&path.to_string_lossy(), 1024, 640)?;
        info!("Saved plot to {}", path.display());
    }
    Ok(())
}

fn run_eval(args: &EvalArgs) -> TrajectoryResult<()> {
    let system = load_system(&args.input)?;
    match &args.entity {
        Some(name) => {
            let q = evaluate_entity(&system, name, args.time)?;
            println!("{}: {:?}", name, q.as_slice());
        }
        None => {
            for (name, q) in evaluate_system(&system, args.time)? {
                println!("{}: {:?}", name, q.as_slice());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Sample(args) => run_sample(args),
        Command::Eval(args) => run_eval(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
