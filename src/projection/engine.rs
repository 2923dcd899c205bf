//! Retirement age estimate and net-worth scenario simulation

use crate::assumptions::ProjectionAssumptions;
use crate::error::Result;
use crate::profile::FinancialProfile;
use super::cashflows::{active_expenses_at_age, active_income_at_age};
use super::state::ScenarioState;
use super::trajectory::{merge_series, RetirementProjection, ScenarioOutcome, ScenarioStatus};

/// Label of the single scenario simulated for profiles that cannot retire
pub const KEEP_WORKING_LABEL: &str = "Keep working";

/// Series label for a scenario retiring at `age`
pub fn scenario_label(age: u32) -> String {
    format!("Retire at {}", age)
}

/// Main projection engine. Stateless apart from its assumptions; every call
/// works on a read-only profile snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    assumptions: ProjectionAssumptions,
}

impl ProjectionEngine {
    pub fn new(assumptions: ProjectionAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &ProjectionAssumptions {
        &self.assumptions
    }

    /// Estimate the age at which income until retirement plus starting capital
    /// covers every inflated expense up to the max age.
    ///
    /// Closed form, no search: the inflated cost over `N` years is
    /// `12 * monthly_expenses * ((1+r)^N - 1) / r * (1+r)` (or `12 * monthly_expenses * N`
    /// when `r == 0`), and the years of income needed to close the gap are
    /// rounded up. Returns `None` when there is no income, when the result lies
    /// past the max age, or when the numbers overflow.
    pub fn estimate_retirement_age(&self, profile: &FinancialProfile) -> Result<Option<u32>> {
        profile.validate()?;
        Ok(self.estimate_validated(profile))
    }

    fn estimate_validated(&self, profile: &FinancialProfile) -> Option<u32> {
        let rate = profile.inflation_rate_annual;
        let horizon = profile.horizon_years();
        let base_annual_expense = profile.total_monthly_expenses() * 12.0;

        let flat_cost = base_annual_expense * horizon as f64;
        // 0 * inf from an overflowing growth factor would read as NaN
        let total_inflated_cost = if base_annual_expense == 0.0 {
            0.0
        } else if rate == 0.0 {
            flat_cost
        } else {
            // ln_1p/exp_m1 keep sub-epsilon rates from collapsing 1 + r to 1
            let growth_minus_one = (horizon as f64 * rate.ln_1p()).exp_m1();
            let inflated = base_annual_expense * (growth_minus_one / rate) * (1.0 + rate);
            // Every inflated year costs at least today's price when r > 0, at most when r < 0
            if rate > 0.0 {
                inflated.max(flat_cost)
            } else {
                inflated.min(flat_cost)
            }
        };

        let annual_income = profile.total_monthly_income() * 12.0;
        if annual_income <= 0.0 {
            log::debug!("No income: cannot retire");
            return None;
        }

        let gap = total_inflated_cost - profile.starting_capital();
        let years = (gap / annual_income).ceil();
        if !years.is_finite() {
            log::warn!(
                "Retirement estimate overflowed (inflation {} over {} years)",
                rate,
                horizon
            );
            return None;
        }

        let years = years.max(0.0);
        if years > horizon as f64 {
            log::debug!(
                "Estimated {} working years exceed the {} year horizon",
                years,
                horizon
            );
            return None;
        }

        let age = profile.current_age + years as u32;
        log::debug!(
            "Inflated cost {:.2}, capital {:.2}, estimated retirement age {}",
            total_inflated_cost,
            profile.starting_capital(),
            age
        );
        Some(age)
    }

    /// Simulate one scenario per configured offset from the estimated
    /// retirement age and merge their series by age.
    ///
    /// Candidates past the max age produce no data.
    pub fn simulate_trajectories(
        &self,
        profile: &FinancialProfile,
        estimated_retirement_age: u32,
    ) -> Result<Vec<ScenarioOutcome>> {
        self.assumptions.validate()?;
        profile.validate()?;
        Ok(self.simulate_validated(profile, estimated_retirement_age))
    }

    fn simulate_validated(&self, profile: &FinancialProfile, estimated_retirement_age: u32) -> Vec<ScenarioOutcome> {
        self.assumptions
            .scenario_offsets
            .iter()
            .map(|&offset| {
                let candidate = estimated_retirement_age.saturating_add(offset);
                let label = scenario_label(candidate);
                if candidate > profile.max_age {
                    log::debug!("{}: beyond max age {}", label, profile.max_age);
                    ScenarioOutcome::without_data(label, Some(candidate), ScenarioStatus::BeyondHorizon)
                } else {
                    self.run_scenario(profile, label, Some(candidate))
                }
            })
            .collect()
    }

    /// Run a single scenario from the current age to the max age
    /// (`None` = keeps working throughout)
    pub fn simulate_scenario(
        &self,
        profile: &FinancialProfile,
        label: String,
        retirement_age: Option<u32>,
    ) -> Result<ScenarioOutcome> {
        profile.validate()?;
        Ok(self.run_scenario(profile, label, retirement_age))
    }

    fn run_scenario(&self, profile: &FinancialProfile, label: String, retirement_age: Option<u32>) -> ScenarioOutcome {
        let precedence = self.assumptions.end_precedence;
        let yearly_contributions = if self.assumptions.include_asset_contributions {
            profile.total_yearly_contributions()
        } else {
            0.0
        };

        let mut state = ScenarioState::new(label, retirement_age, profile.current_age, profile.starting_capital());

        for year in 1..=profile.horizon_years() {
            if state.terminated {
                break;
            }
            let age = profile.current_age + year;
            let income = active_income_at_age(age, retirement_age, &profile.incomes, precedence);
            let expenses = active_expenses_at_age(
                age,
                year,
                retirement_age,
                profile.inflation_rate_annual,
                &profile.expenses,
                precedence,
            );
            let contributions = match retirement_age {
                Some(retire) if age > retire => 0.0,
                _ => yearly_contributions,
            };
            state.advance_year(income, expenses, contributions);
        }

        let outcome = state.into_outcome();
        log::debug!(
            "{}: {:?}, final net worth {:?}",
            outcome.label,
            outcome.status,
            outcome.final_net_worth
        );
        outcome
    }

    /// Estimate the retirement age and, when retirable, simulate the comparison scenarios
    pub fn build_projection(&self, profile: &FinancialProfile) -> Result<RetirementProjection> {
        self.assumptions.validate()?;
        profile.validate()?;

        match self.estimate_validated(profile) {
            Some(age) => {
                let scenarios = self.simulate_validated(profile, age);
                Ok(RetirementProjection {
                    can_retire: true,
                    retirement_age: Some(age),
                    trajectories: merge_series(&scenarios),
                    scenarios,
                })
            }
            None if self.assumptions.baseline_when_unretirable => {
                let baseline = self.run_scenario(profile, KEEP_WORKING_LABEL.to_string(), None);
                let scenarios = vec![baseline];
                Ok(RetirementProjection {
                    can_retire: false,
                    retirement_age: None,
                    trajectories: merge_series(&scenarios),
                    scenarios,
                })
            }
            None => Ok(RetirementProjection::cannot_retire()),
        }
    }
}
