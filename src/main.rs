//! Retirement Planner CLI
//!
//! Command-line interface for running retirement projections

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use retirement_planner::profile::{JsonFileStore, LegacySavedState, ProfileStore};
use retirement_planner::{
    analyze_transactions, ColumnRole, ColumnSelection, FinancialProfile, ProjectionAssumptions,
    ProjectionEngine, RetirementProjection,
};

#[derive(Parser)]
#[command(name = "retirement-planner", version, about = "Estimate when you can retire")]
struct Cli {
    /// JSON file with projection assumptions
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the retirement age and simulate the comparison scenarios
    Project {
        profile: PathBuf,

        /// Override the profile's max age
        #[arg(long)]
        max_age: Option<u32>,

        /// Print the projection as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Write the chart series to a CSV file, one column per scenario
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print totals derived from a profile
    Summary { profile: PathBuf },
    /// Average monthly income and expenses from a transactions CSV
    Budget {
        transactions: PathBuf,

        #[arg(long)]
        date: String,

        #[arg(long)]
        income: String,

        #[arg(long)]
        expense: String,
    },
    /// Convert the browser app's saved state into a profile file
    ImportLegacy { saved: PathBuf, profile: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let assumptions = match &cli.assumptions {
        Some(path) => ProjectionAssumptions::from_json_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => ProjectionAssumptions::default(),
    };

    match cli.command {
        Command::Project { profile, max_age, json, csv } => {
            let mut profile = load_profile(&profile)?;
            if let Some(max_age) = max_age {
                profile.max_age = max_age;
            }
            let engine = ProjectionEngine::new(assumptions);
            let projection = engine.build_projection(&profile).context("running projection")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                print_projection(&profile, &projection);
            }
            if let Some(path) = csv {
                write_series_csv(&path, &projection)?;
                println!("\nChart series written to: {}", path.display());
            }
        }
        Command::Summary { profile } => {
            let profile = load_profile(&profile)?;
            profile.validate().context("invalid profile")?;
            let s = profile.summary(&assumptions);
            println!("Profile Summary (age {}, inflation {:.2}%):", profile.current_age, profile.inflation_rate_annual * 100.0);
            println!("  Total Assets:             ${:>14.2}", s.total_assets);
            println!("  Total Debts:              ${:>14.2}", s.total_debts);
            println!("  Net Worth:                ${:>14.2}", s.net_worth);
            println!("  Monthly Income:           ${:>14.2}", s.total_monthly_income);
            println!("  Monthly Expenses:         ${:>14.2}", s.total_monthly_expenses);
            println!("  Monthly Savings:          ${:>14.2}", s.monthly_savings);
            println!("  Retirement Expenses (mo): ${:>14.2}", s.monthly_retirement_expenses);
            println!("  Required Net Worth:       ${:>14.2}", s.required_net_worth);
        }
        Command::Budget { transactions, date, income, expense } => {
            let file = File::open(&transactions)
                .with_context(|| format!("opening {}", transactions.display()))?;
            let selection = ColumnSelection::new()
                .with(date, ColumnRole::Date)
                .with(income, ColumnRole::Income)
                .with(expense, ColumnRole::Expense);
            let budget = analyze_transactions(BufReader::new(file), &selection)?;
            println!("Budget Analysis ({} to {}, {:.1} months):", budget.earliest, budget.latest, budget.months);
            println!("  Total Income:       ${:>12.2}", budget.total_income);
            println!("  Total Expenses:     ${:>12.2}", budget.total_expenses);
            println!("  Avg Monthly Income: ${:>12.2}", budget.average_monthly_income);
            println!("  Avg Monthly Spend:  ${:>12.2}", budget.average_monthly_expenses);
        }
        Command::ImportLegacy { saved, profile } => {
            let file = File::open(&saved).with_context(|| format!("opening {}", saved.display()))?;
            let legacy: LegacySavedState = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing saved state {}", saved.display()))?;
            let converted = legacy.into_profile();
            converted.validate().context("imported profile is invalid")?;
            JsonFileStore::new(&profile).save(&converted)?;
            println!("Imported profile written to: {}", profile.display());
        }
    }

    Ok(())
}

fn load_profile(path: &Path) -> anyhow::Result<FinancialProfile> {
    match JsonFileStore::new(path).load()? {
        Some(profile) => Ok(profile),
        None => bail!("profile file {} not found", path.display()),
    }
}

fn print_projection(profile: &FinancialProfile, projection: &RetirementProjection) {
    match projection.retirement_age {
        Some(age) => println!("Estimated retirement age: {} (in {} years)", age, age.saturating_sub(profile.current_age)),
        None => println!("Cannot retire before age {} with the current plan", profile.max_age),
    }

    if !projection.scenarios.is_empty() {
        println!("\nScenarios:");
        for s in &projection.scenarios {
            let depleted = s.depleted_at_age.map(|a| format!("depleted at {}", a)).unwrap_or_default();
            let final_nw = s.final_net_worth.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());
            println!("  {:<16} {:<16} final ${:>16} {}", s.label, format!("{:?}", s.status), final_nw, depleted);
        }
    }

    let labels = projection.series_labels();
    if labels.is_empty() {
        return;
    }
    println!();
    print!("{:>5}", "Age");
    for label in &labels {
        print!(" {:>16}", label);
    }
    println!();
    println!("{}", "-".repeat(5 + 17 * labels.len()));
    for point in &projection.trajectories {
        print!("{:>5}", point.age);
        for label in &labels {
            match point.net_worth_by_scenario.get(*label) {
                Some(v) => print!(" {:>16.2}", v),
                None => print!(" {:>16}", ""),
            }
        }
        println!();
    }
}

fn write_series_csv(path: &Path, projection: &RetirementProjection) -> anyhow::Result<()> {
    let labels = projection.series_labels();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Age".to_string()];
    header.extend(labels.iter().map(|l| l.to_string()));
    writer.write_record(&header)?;

    for point in &projection.trajectories {
        let mut row = vec![point.age.to_string()];
        for label in &labels {
            row.push(
                point
                    .net_worth_by_scenario
                    .get(*label)
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
