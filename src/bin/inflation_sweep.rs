//! Sweep the inflation rate for one profile
//!
//! Re-estimates the retirement age over a grid of annual inflation rates and
//! writes `rate,retirement_age` rows for charting sensitivity.

use anyhow::{bail, Context};
use clap::Parser;
use retirement_planner::profile::{JsonFileStore, ProfileStore};
use retirement_planner::{ProjectionAssumptions, ScenarioRunner};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(about = "Retirement age as a function of the inflation rate")]
struct Args {
    profile: PathBuf,

    /// Lowest rate in percent
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Highest rate in percent
    #[arg(long, default_value_t = 6.0)]
    to: f64,

    /// Step in percent
    #[arg(long, default_value_t = 0.25)]
    step: f64,

    #[arg(long, default_value = "inflation_sweep.csv")]
    output: PathBuf,

    /// JSON file with projection assumptions
    #[arg(long)]
    assumptions: Option<PathBuf>,
}

fn rate_grid(from: f64, to: f64, step: f64) -> anyhow::Result<Vec<f64>> {
    if !step.is_finite() || step <= 0.0 || !from.is_finite() || !to.is_finite() || to < from {
        bail!("invalid rate grid {}..{} step {}", from, to, step);
    }
    let count = ((to - from) / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| (from + step * i as f64) / 100.0).collect())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let profile = match JsonFileStore::new(&args.profile).load()? {
        Some(profile) => profile,
        None => bail!("profile file {} not found", args.profile.display()),
    };
    let assumptions = match &args.assumptions {
        Some(path) => ProjectionAssumptions::from_json_path(path)?,
        None => ProjectionAssumptions::default(),
    };
    let rates = rate_grid(args.from, args.to, args.step)?;

    let start = Instant::now();
    let runner = ScenarioRunner::with_assumptions(assumptions);
    let points = runner
        .run_inflation_sweep(&profile, &rates)
        .context("running inflation sweep")?;
    println!("Swept {} rates in {:?}", points.len(), start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(["InflationPct", "RetirementAge"])?;
    for point in &points {
        let age = point.retirement_age.map(|a| a.to_string()).unwrap_or_default();
        writer.write_record([format!("{:.4}", point.inflation_rate_annual * 100.0), age])?;
        println!(
            "  {:>6.2}% -> {}",
            point.inflation_rate_annual * 100.0,
            point.retirement_age.map(|a| a.to_string()).unwrap_or_else(|| "never".to_string())
        );
    }
    writer.flush()?;

    println!("\nResults written to: {}", args.output.display());
    Ok(())
}
