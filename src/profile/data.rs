//! Financial profile data structures matching the application's saved JSON

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::assumptions::{EndPrecedence, ProjectionAssumptions};
use crate::error::{ProjectionError, Result};

/// Longest horizon (max age minus current age) the engine will simulate
pub const MAX_HORIZON_YEARS: u32 = 200;

/// An asset or a debt. The value is a magnitude; whether it adds to or
/// subtracts from net worth depends on which list of the profile holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOrDebt {
    pub id: String,
    pub name: String,
    pub value: f64,

    /// Money added to the asset every year until retirement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_contribution: Option<f64>,
}

impl AssetOrDebt {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            yearly_contribution: None,
        }
    }

    pub fn with_yearly_contribution(mut self, amount: f64) -> Self {
        self.yearly_contribution = Some(amount);
        self
    }
}

/// A recurring monthly income or expense, optionally ending at an age or at retirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeOrExpense {
    pub id: String,
    pub name: String,

    /// Monthly amount
    pub value: f64,

    #[serde(default)]
    pub ends_at_retirement: bool,

    /// Last age at which the item is still paid
    #[serde(default)]
    pub end_age: Option<u32>,
}

impl IncomeOrExpense {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            ends_at_retirement: false,
            end_age: None,
        }
    }

    pub fn ending_at_retirement(mut self) -> Self {
        self.ends_at_retirement = true;
        self
    }

    pub fn ending_at_age(mut self, age: u32) -> Self {
        self.end_age = Some(age);
        self
    }

    /// Whether the item is still paid at `age`.
    ///
    /// Items count through their cutoff year inclusive: an item ending at
    /// retirement is still paid in the retirement year itself.
    pub fn is_active_at(&self, age: u32, retirement_age: Option<u32>, precedence: EndPrecedence) -> bool {
        let retirement_cutoff = if self.ends_at_retirement { retirement_age } else { None };
        match precedence.effective_cutoff(self.end_age, retirement_cutoff) {
            Some(cutoff) => age <= cutoff,
            None => true,
        }
    }
}

/// Immutable snapshot of everything the engine needs about the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub current_age: u32,

    /// Annual inflation as a decimal (0.03 = 3%)
    pub inflation_rate_annual: f64,

    /// Age at which the simulation stops
    pub max_age: u32,

    #[serde(default)]
    pub assets: Vec<AssetOrDebt>,

    #[serde(default)]
    pub debts: Vec<AssetOrDebt>,

    #[serde(default)]
    pub incomes: Vec<IncomeOrExpense>,

    #[serde(default)]
    pub expenses: Vec<IncomeOrExpense>,
}

impl FinancialProfile {
    /// Empty profile with no items
    pub fn new(current_age: u32, inflation_rate_annual: f64, max_age: u32) -> Self {
        Self {
            current_age,
            inflation_rate_annual,
            max_age,
            assets: Vec::new(),
            debts: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
        }
    }

    pub fn total_assets(&self) -> f64 {
        self.assets.iter().map(|a| a.value).sum()
    }

    pub fn total_debts(&self) -> f64 {
        self.debts.iter().map(|d| d.value).sum()
    }

    pub fn net_worth(&self) -> f64 {
        self.total_assets() - self.total_debts()
    }

    /// Capital the simulation starts from: assets with debts netted out once
    pub fn starting_capital(&self) -> f64 {
        self.net_worth()
    }

    pub fn total_monthly_income(&self) -> f64 {
        self.incomes.iter().map(|i| i.value).sum()
    }

    pub fn total_monthly_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.value).sum()
    }

    /// Sum of yearly contributions across all assets
    pub fn total_yearly_contributions(&self) -> f64 {
        self.assets.iter().filter_map(|a| a.yearly_contribution).sum()
    }

    /// Number of simulated years between the current age and the max age
    pub fn horizon_years(&self) -> u32 {
        self.max_age.saturating_sub(self.current_age)
    }

    /// Check ages, rates and amounts before any computation
    pub fn validate(&self) -> Result<()> {
        if self.max_age <= self.current_age {
            return Err(ProjectionError::invalid(
                "maxAge",
                format!(
                    "max age {} must be greater than current age {}",
                    self.max_age, self.current_age
                ),
            ));
        }
        if self.horizon_years() > MAX_HORIZON_YEARS {
            return Err(ProjectionError::invalid(
                "maxAge",
                format!("horizon of {} years exceeds {}", self.horizon_years(), MAX_HORIZON_YEARS),
            ));
        }
        if !self.inflation_rate_annual.is_finite() || self.inflation_rate_annual <= -1.0 {
            return Err(ProjectionError::invalid(
                "inflationRateAnnual",
                format!("{} is not a usable annual rate", self.inflation_rate_annual),
            ));
        }

        validate_balances("assets", &self.assets)?;
        validate_balances("debts", &self.debts)?;
        validate_flows("incomes", &self.incomes)?;
        validate_flows("expenses", &self.expenses)?;
        Ok(())
    }

    /// Headline figures for the overview panel
    pub fn summary(&self, assumptions: &ProjectionAssumptions) -> ProfileSummary {
        let total_monthly_income = self.total_monthly_income();
        let total_monthly_expenses = self.total_monthly_expenses();

        // Spending that carries on after retirement, at today's prices
        let monthly_retirement_expenses: f64 = self
            .expenses
            .iter()
            .filter(|e| !e.ends_at_retirement)
            .filter(|e| e.is_active_at(self.current_age, None, assumptions.end_precedence))
            .map(|e| e.value)
            .sum();

        ProfileSummary {
            total_assets: self.total_assets(),
            total_debts: self.total_debts(),
            net_worth: self.net_worth(),
            total_monthly_income,
            total_monthly_expenses,
            monthly_savings: total_monthly_income - total_monthly_expenses,
            monthly_retirement_expenses,
            required_net_worth: monthly_retirement_expenses * 12.0 / assumptions.safe_withdrawal_rate,
        }
    }
}

fn validate_amount(field: String, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ProjectionError::invalid(
            field,
            format!("{} must be a non-negative finite amount", amount),
        ));
    }
    Ok(())
}

fn check_unique_id<'a>(seen: &mut HashSet<&'a str>, list: &str, id: &'a str) -> Result<()> {
    if !seen.insert(id) {
        return Err(ProjectionError::invalid(
            format!("{}[{}]", list, id),
            "duplicate id",
        ));
    }
    Ok(())
}

fn validate_balances(list: &str, items: &[AssetOrDebt]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        check_unique_id(&mut seen, list, &item.id)?;
        validate_amount(format!("{}[{}].value", list, item.id), item.value)?;
        if let Some(contribution) = item.yearly_contribution {
            validate_amount(format!("{}[{}].yearlyContribution", list, item.id), contribution)?;
        }
    }
    Ok(())
}

fn validate_flows(list: &str, items: &[IncomeOrExpense]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        check_unique_id(&mut seen, list, &item.id)?;
        validate_amount(format!("{}[{}].value", list, item.id), item.value)?;
    }
    Ok(())
}

/// Totals derived from a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub total_assets: f64,
    pub total_debts: f64,
    pub net_worth: f64,
    pub total_monthly_income: f64,
    pub total_monthly_expenses: f64,
    pub monthly_savings: f64,
    pub monthly_retirement_expenses: f64,
    pub required_net_worth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_profile() -> FinancialProfile {
        let mut profile = FinancialProfile::new(30, 0.03, 100);
        profile.assets.push(AssetOrDebt::new("a1", "Savings", 40_000.0));
        profile.assets.push(AssetOrDebt::new("a2", "Brokerage", 70_000.0).with_yearly_contribution(6_000.0));
        profile.debts.push(AssetOrDebt::new("d1", "Car loan", 10_000.0));
        profile.incomes.push(IncomeOrExpense::new("i1", "Salary", 5_000.0).ending_at_retirement());
        profile.expenses.push(IncomeOrExpense::new("e1", "Rent", 2_000.0));
        profile.expenses.push(IncomeOrExpense::new("e2", "Commute", 200.0).ending_at_retirement());
        profile.expenses.push(IncomeOrExpense::new("e3", "Childcare", 800.0).ending_at_age(45));
        profile
    }

    #[test]
    fn test_totals() {
        let profile = test_profile();
        assert_relative_eq!(profile.total_assets(), 110_000.0);
        assert_relative_eq!(profile.total_debts(), 10_000.0);
        assert_relative_eq!(profile.net_worth(), 100_000.0);
        assert_relative_eq!(profile.starting_capital(), 100_000.0);
        assert_relative_eq!(profile.total_monthly_income(), 5_000.0);
        assert_relative_eq!(profile.total_monthly_expenses(), 3_000.0);
        assert_relative_eq!(profile.total_yearly_contributions(), 6_000.0);
        assert_eq!(profile.horizon_years(), 70);
    }

    #[test]
    fn test_item_counts_through_cutoff_year() {
        let salary = IncomeOrExpense::new("i1", "Salary", 1.0).ending_at_retirement();
        assert!(salary.is_active_at(60, Some(60), EndPrecedence::Earliest));
        assert!(!salary.is_active_at(61, Some(60), EndPrecedence::Earliest));
        // No retirement age known: the flag alone never ends the item
        assert!(salary.is_active_at(99, None, EndPrecedence::Earliest));

        let loan = IncomeOrExpense::new("e1", "Loan", 1.0).ending_at_age(40);
        assert!(loan.is_active_at(40, None, EndPrecedence::Earliest));
        assert!(!loan.is_active_at(41, None, EndPrecedence::Earliest));
    }

    #[test]
    fn test_precedence_when_both_cutoffs_set() {
        let item = IncomeOrExpense::new("i1", "Contract", 1.0)
            .ending_at_retirement()
            .ending_at_age(50);

        // Retiring at 55: end age 50 comes first
        assert!(!item.is_active_at(52, Some(55), EndPrecedence::Earliest));
        assert!(!item.is_active_at(52, Some(55), EndPrecedence::EndAge));
        assert!(item.is_active_at(52, Some(55), EndPrecedence::Retirement));

        // Retiring at 45: retirement comes first
        assert!(!item.is_active_at(47, Some(45), EndPrecedence::Earliest));
        assert!(item.is_active_at(47, Some(45), EndPrecedence::EndAge));
        assert!(!item.is_active_at(47, Some(45), EndPrecedence::Retirement));
    }

    #[test]
    fn test_validate_accepts_test_profile() {
        assert!(test_profile().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_horizon() {
        let profile = FinancialProfile::new(70, 0.03, 70);
        assert!(matches!(
            profile.validate(),
            Err(ProjectionError::InvalidProfile { ref field, .. }) if field == "maxAge"
        ));

        let profile = FinancialProfile::new(20, 0.03, 20 + MAX_HORIZON_YEARS + 1);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_amounts_and_rates() {
        let mut profile = test_profile();
        profile.expenses[0].value = -1.0;
        assert!(profile.validate().is_err());

        let mut profile = test_profile();
        profile.assets[0].value = f64::NAN;
        assert!(profile.validate().is_err());

        let mut profile = test_profile();
        profile.assets[1].yearly_contribution = Some(-5.0);
        assert!(profile.validate().is_err());

        let mut profile = test_profile();
        profile.inflation_rate_annual = -1.0;
        assert!(profile.validate().is_err());

        let mut profile = test_profile();
        profile.inflation_rate_annual = f64::INFINITY;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut profile = test_profile();
        profile.incomes.push(IncomeOrExpense::new("i1", "Side job", 300.0));
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn test_summary_uses_safe_withdrawal_rate() {
        let profile = test_profile();
        let summary = profile.summary(&ProjectionAssumptions::default());

        assert_relative_eq!(summary.monthly_savings, 2_000.0);
        // Rent and childcare continue past retirement; commute does not
        assert_relative_eq!(summary.monthly_retirement_expenses, 2_800.0);
        assert_relative_eq!(summary.required_net_worth, 2_800.0 * 12.0 * 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_json_field_names() {
        let item = IncomeOrExpense::new("e1", "Mortgage", 1_500.0).ending_at_age(55);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["endAge"], 55);
        assert_eq!(json["endsAtRetirement"], false);

        let profile: FinancialProfile = serde_json::from_str(
            r#"{"currentAge": 40, "inflationRateAnnual": 0.02, "maxAge": 95,
                "assets": [{"id": "1", "name": "Cash", "value": 5000}]}"#,
        )
        .unwrap();
        assert_eq!(profile.current_age, 40);
        assert!(profile.debts.is_empty());
        assert_eq!(profile.assets[0].yearly_contribution, None);
    }
}
