//! Financial profile data structures, persistence and legacy import

mod data;
pub mod legacy;
mod store;

pub use data::{AssetOrDebt, FinancialProfile, IncomeOrExpense, ProfileSummary, MAX_HORIZON_YEARS};
pub use legacy::LegacySavedState;
pub use store::{JsonFileStore, MemoryStore, ProfileStore};
