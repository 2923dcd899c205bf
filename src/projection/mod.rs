//! Projection engine: retirement age estimate and net-worth scenarios

mod cashflows;
mod engine;
mod state;
mod trajectory;

pub use cashflows::{active_expenses_at_age, active_income_at_age, inflation_multiplier};
pub use engine::{scenario_label, ProjectionEngine, KEEP_WORKING_LABEL};
pub use state::ScenarioState;
pub use trajectory::{
    merge_series, RetirementProjection, ScenarioOutcome, ScenarioStatus, TrajectoryPoint,
};
