//! Scenario runner for batch projections
//!
//! Holds one set of assumptions and runs many profiles, or many variants of
//! one profile, through the engine in parallel.

use rayon::prelude::*;

use crate::assumptions::ProjectionAssumptions;
use crate::error::Result;
use crate::profile::FinancialProfile;
use crate::projection::{ProjectionEngine, RetirementProjection};

/// Retirement verdict for one point of an inflation sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub inflation_rate_annual: f64,
    pub retirement_age: Option<u32>,
}

/// Pre-configured scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for point in runner.run_inflation_sweep(&profile, &[0.0, 0.02, 0.04])? {
///     println!("{:.1}% -> {:?}", point.inflation_rate_annual * 100.0, point.retirement_age);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the reference assumptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with custom assumptions
    pub fn with_assumptions(assumptions: ProjectionAssumptions) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions),
        }
    }

    pub fn assumptions(&self) -> &ProjectionAssumptions {
        self.engine.assumptions()
    }

    /// Run a single projection
    pub fn run(&self, profile: &FinancialProfile) -> Result<RetirementProjection> {
        self.engine.build_projection(profile)
    }

    /// Run projections for many profiles; results keep the input order
    pub fn run_batch(&self, profiles: &[FinancialProfile]) -> Vec<Result<RetirementProjection>> {
        profiles
            .par_iter()
            .map(|profile| self.engine.build_projection(profile))
            .collect()
    }

    /// Re-estimate the retirement age of one profile under several inflation rates
    pub fn run_inflation_sweep(&self, profile: &FinancialProfile, rates: &[f64]) -> Result<Vec<SweepPoint>> {
        rates
            .par_iter()
            .map(|&rate| {
                let variant = FinancialProfile {
                    inflation_rate_annual: rate,
                    ..profile.clone()
                };
                let retirement_age = self.engine.estimate_retirement_age(&variant)?;
                Ok(SweepPoint {
                    inflation_rate_annual: rate,
                    retirement_age,
                })
            })
            .collect()
    }
}
