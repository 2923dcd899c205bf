//! Budget analysis: average monthly income and spending from a transactions CSV
//!
//! The caller tags each CSV header as a date, income or expense column; the
//! analysis totals the amounts and spreads them over the covered date range.

use chrono::{DateTime, NaiveDate};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use crate::error::{ProjectionError, Result};
use crate::profile::IncomeOrExpense;

/// Average days per month used to convert the date range to months
pub const DAYS_PER_MONTH: f64 = 30.44;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Meaning of a CSV column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    #[default]
    Ignore,
    Date,
    Income,
    Expense,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Ignore => "ignore",
            ColumnRole::Date => "date",
            ColumnRole::Income => "income",
            ColumnRole::Expense => "expense",
        };
        f.write_str(name)
    }
}

/// Header name to role; headers not present are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSelection {
    roles: HashMap<String, ColumnRole>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, header: impl Into<String>, role: ColumnRole) -> Self {
        self.set(header, role);
        self
    }

    pub fn set(&mut self, header: impl Into<String>, role: ColumnRole) {
        self.roles.insert(header.into(), role);
    }

    pub fn role(&self, header: &str) -> ColumnRole {
        self.roles.get(header).copied().unwrap_or_default()
    }

    fn require(&self, role: ColumnRole) -> Result<()> {
        if self.roles.values().any(|r| *r == role) {
            Ok(())
        } else {
            Err(ProjectionError::MissingColumn {
                role: role.to_string(),
            })
        }
    }
}

/// Totals and monthly averages over the transactions' date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub months: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
}

impl BudgetSummary {
    /// Averages as profile items, ready to add to the income and expense lists
    pub fn to_items(&self) -> (IncomeOrExpense, IncomeOrExpense) {
        let range = format!("{} to {}", self.earliest, self.latest);
        (
            IncomeOrExpense::new(
                format!("budget-income-{}", self.latest),
                format!("Average income ({})", range),
                self.average_monthly_income,
            ),
            IncomeOrExpense::new(
                format!("budget-expense-{}", self.latest),
                format!("Average expenses ({})", range),
                self.average_monthly_expenses,
            ),
        )
    }
}

/// Parse an amount such as `1,234.50` or `$99`; `None` for anything else
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a transaction date in one of the accepted formats
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Total the tagged columns of a transactions CSV and average them per month
pub fn analyze_transactions<R: Read>(reader: R, selection: &ColumnSelection) -> Result<BudgetSummary> {
    selection.require(ColumnRole::Date)?;
    selection.require(ColumnRole::Income)?;
    selection.require(ColumnRole::Expense)?;

    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let roles: Vec<ColumnRole> = csv_reader
        .headers()?
        .iter()
        .map(|h| selection.role(h))
        .collect();

    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;
    let mut skipped = 0usize;

    for result in csv_reader.records() {
        let record = result?;
        for (field, role) in record.iter().zip(&roles) {
            match role {
                ColumnRole::Income | ColumnRole::Expense if !field.trim().is_empty() => {
                    match parse_amount(field) {
                        Some(amount) if *role == ColumnRole::Income => total_income += amount,
                        Some(amount) => total_expenses += amount,
                        None => skipped += 1,
                    }
                }
                ColumnRole::Date => match parse_date(field) {
                    Some(date) => {
                        earliest = Some(earliest.map_or(date, |d| d.min(date)));
                        latest = Some(latest.map_or(date, |d| d.max(date)));
                    }
                    None => skipped += 1,
                },
                _ => {}
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} unreadable amount or date fields", skipped);
    }

    let (earliest, latest) = match (earliest, latest) {
        (Some(e), Some(l)) => (e, l),
        _ => {
            return Err(ProjectionError::InsufficientData(
                "could not determine a date range from the selected date column".to_string(),
            ))
        }
    };

    let days = (latest - earliest).num_days();
    if days <= 0 {
        return Err(ProjectionError::InsufficientData(format!(
            "all transactions fall on {}; at least two distinct dates are needed",
            earliest
        )));
    }
    let months = days as f64 / DAYS_PER_MONTH;

    log::debug!(
        "Budget {} to {}: {:.2} months, income {:.2}, expenses {:.2}",
        earliest,
        latest,
        months,
        total_income,
        total_expenses
    );

    Ok(BudgetSummary {
        earliest,
        latest,
        months,
        total_income,
        total_expenses,
        average_monthly_income: total_income / months,
        average_monthly_expenses: total_expenses / months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn selection() -> ColumnSelection {
        ColumnSelection::new()
            .with("Date", ColumnRole::Date)
            .with("Deposit", ColumnRole::Income)
            .with("Withdrawal", ColumnRole::Expense)
            .with("Memo", ColumnRole::Ignore)
    }

    const STATEMENT: &str = "\
Date,Memo,Deposit,Withdrawal
2024-01-01,Paycheck,\"3,000.00\",
2024-01-15,Rent,,1500
2024-02-01,Paycheck,3000,
03/01/2024,Groceries,,$450.50
2024-03-01,Refund,oops,
";

    #[test]
    fn test_analyze_statement() {
        let summary = analyze_transactions(STATEMENT.as_bytes(), &selection()).unwrap();

        assert_eq!(summary.earliest, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(summary.latest, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_relative_eq!(summary.total_income, 6_000.0);
        assert_relative_eq!(summary.total_expenses, 1_950.5);

        // 60 days in 2024 between Jan 1 and Mar 1
        let months = 60.0 / DAYS_PER_MONTH;
        assert_relative_eq!(summary.months, months);
        assert_relative_eq!(summary.average_monthly_income, 6_000.0 / months);
        assert_relative_eq!(summary.average_monthly_expenses, 1_950.5 / months);
    }

    #[test]
    fn test_missing_role_rejected() {
        let selection = ColumnSelection::new()
            .with("Date", ColumnRole::Date)
            .with("Deposit", ColumnRole::Income);
        let err = analyze_transactions(STATEMENT.as_bytes(), &selection).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingColumn { ref role } if role == "expense"));
    }

    #[test]
    fn test_single_day_is_insufficient() {
        let csv = "Date,Deposit,Withdrawal\n2024-05-01,100,20\n2024-05-01,50,\n";
        let err = analyze_transactions(csv.as_bytes(), &selection()).unwrap_err();
        assert!(matches!(err, ProjectionError::InsufficientData(_)));
    }

    #[test]
    fn test_no_dates_is_insufficient() {
        let csv = "Date,Deposit,Withdrawal\nyesterday,100,20\n";
        let err = analyze_transactions(csv.as_bytes(), &selection()).unwrap_err();
        assert!(matches!(err, ProjectionError::InsufficientData(_)));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_amount(" 1,234.50 "), Some(1_234.5));
        assert_eq!(parse_amount("$99"), Some(99.0));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_date("2024/02/29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("12/31/2023"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(
            parse_date("2024-06-01T09:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_summary_to_items() {
        let summary = analyze_transactions(STATEMENT.as_bytes(), &selection()).unwrap();
        let (income, expense) = summary.to_items();
        assert_relative_eq!(income.value, summary.average_monthly_income);
        assert_relative_eq!(expense.value, summary.average_monthly_expenses);
        assert!(!income.ends_at_retirement);
        assert_ne!(income.id, expense.id);
    }
}
