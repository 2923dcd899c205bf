//! Retirement Planner - Net-worth projection engine for personal retirement planning
//!
//! This library provides:
//! - Financial profiles (assets, debts, incomes, expenses) with validation
//! - Closed-form retirement age estimate with inflated expenses
//! - Year-by-year net-worth scenarios around the estimated retirement age
//! - Budget analysis of transaction CSVs
//! - Profile persistence and import of the browser app's saved state

pub mod assumptions;
pub mod budget;
pub mod error;
pub mod profile;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{EndPrecedence, ProjectionAssumptions};
pub use budget::{analyze_transactions, BudgetSummary, ColumnRole, ColumnSelection};
pub use error::{ProjectionError, Result};
pub use profile::{AssetOrDebt, FinancialProfile, IncomeOrExpense, ProfileSummary};
pub use projection::{ProjectionEngine, RetirementProjection, ScenarioStatus, TrajectoryPoint};
pub use scenario::ScenarioRunner;
