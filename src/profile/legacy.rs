//! Import/export of the browser application's saved state
//!
//! The web app stored `currentAge` and `inflationRate` as the raw text of its
//! input fields (inflation in percent) and had a fixed horizon of age 100.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AssetOrDebt, FinancialProfile, IncomeOrExpense};

pub const LEGACY_DEFAULT_AGE: u32 = 30;
pub const LEGACY_DEFAULT_INFLATION_PCT: f64 = 3.0;
pub const LEGACY_MAX_AGE: u32 = 100;

/// Saved blob as written by the browser application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacySavedState {
    pub current_age: Option<Value>,
    pub inflation_rate: Option<Value>,
    pub assets: Vec<AssetOrDebt>,
    pub debts: Vec<AssetOrDebt>,
    pub incomes: Vec<IncomeOrExpense>,
    pub expenses: Vec<IncomeOrExpense>,
}

/// Read a form field that may have been saved as text or as a number
fn numeric_field(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

impl LegacySavedState {
    /// Convert to a profile, falling back to the app's defaults for
    /// unreadable age or inflation fields
    pub fn into_profile(self) -> FinancialProfile {
        let current_age = match numeric_field(self.current_age.as_ref()) {
            Some(age) if age >= 0.0 => age.trunc() as u32,
            _ => {
                log::warn!("Unreadable saved age, using {}", LEGACY_DEFAULT_AGE);
                LEGACY_DEFAULT_AGE
            }
        };
        let inflation_pct = numeric_field(self.inflation_rate.as_ref()).unwrap_or_else(|| {
            log::warn!("Unreadable saved inflation rate, using {}%", LEGACY_DEFAULT_INFLATION_PCT);
            LEGACY_DEFAULT_INFLATION_PCT
        });

        FinancialProfile {
            current_age,
            inflation_rate_annual: inflation_pct / 100.0,
            max_age: LEGACY_MAX_AGE.max(current_age.saturating_add(1)),
            assets: self.assets,
            debts: self.debts,
            incomes: self.incomes,
            expenses: self.expenses,
        }
    }
}

impl FinancialProfile {
    /// Export in the browser application's saved shape (max age is not carried)
    pub fn to_legacy(&self) -> LegacySavedState {
        LegacySavedState {
            current_age: Some(Value::String(self.current_age.to_string())),
            inflation_rate: Some(Value::String((self.inflation_rate_annual * 100.0).to_string())),
            assets: self.assets.clone(),
            debts: self.debts.clone(),
            incomes: self.incomes.clone(),
            expenses: self.expenses.clone(),
        }
    }
}
