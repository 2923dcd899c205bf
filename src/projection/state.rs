//! Year-by-year state of one retirement scenario

use super::trajectory::{ScenarioOutcome, ScenarioStatus};

/// State of a scenario at a point in time during simulation
#[derive(Debug, Clone)]
pub struct ScenarioState {
    /// Series key
    pub label: String,

    /// Assumed retirement age (`None` = never retires)
    pub retirement_age: Option<u32>,

    /// Simulated years elapsed (0 = today)
    pub year: u32,

    /// Attained age
    pub age: u32,

    /// Net worth at the end of the current year
    pub net_worth: f64,

    /// Net worth has been positive at least once
    pub started: bool,

    /// Stopped emitting points
    pub terminated: bool,

    /// Age of the first non-positive value after starting
    pub depleted_at_age: Option<u32>,

    /// A non-finite value was produced
    pub overflowed: bool,

    /// Emitted points, all strictly positive
    pub series: Vec<(u32, f64)>,
}

impl ScenarioState {
    /// Initialize state at the current age and record the opening point
    pub fn new(label: String, retirement_age: Option<u32>, current_age: u32, starting_capital: f64) -> Self {
        let mut state = Self {
            label,
            retirement_age,
            year: 0,
            age: current_age,
            net_worth: starting_capital,
            started: false,
            terminated: false,
            depleted_at_age: None,
            overflowed: false,
            series: Vec::new(),
        };
        state.record();
        state
    }

    /// Advance one year, applying the year's net monthly cashflow
    pub fn advance_year(&mut self, monthly_income: f64, monthly_expenses: f64, lump_sum: f64) {
        if self.terminated {
            return;
        }
        self.year += 1;
        self.age += 1;
        self.net_worth += (monthly_income - monthly_expenses) * 12.0 + lump_sum;
        self.record();
    }

    /// Emit the current value or terminate the series
    fn record(&mut self) {
        if !self.net_worth.is_finite() {
            self.overflowed = true;
            self.terminated = true;
            return;
        }
        if self.net_worth > 0.0 {
            self.started = true;
            self.series.push((self.age, self.net_worth));
        } else if self.started {
            self.depleted_at_age = Some(self.age);
            self.terminated = true;
        }
    }

    /// Final outcome; an overflowed scenario drops its whole series
    pub fn into_outcome(self) -> ScenarioOutcome {
        if self.overflowed {
            return ScenarioOutcome::without_data(self.label, self.retirement_age, ScenarioStatus::NumericOverflow);
        }
        let status = if self.depleted_at_age.is_some() || !self.started {
            ScenarioStatus::Depleted
        } else {
            ScenarioStatus::Completed
        };
        ScenarioOutcome {
            label: self.label,
            retirement_age: self.retirement_age,
            status,
            depleted_at_age: self.depleted_at_age,
            final_net_worth: self.series.last().map(|&(_, v)| v),
            series: self.series,
        }
    }
}
