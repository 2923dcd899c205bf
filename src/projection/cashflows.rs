//! Age-indexed aggregation of monthly incomes and expenses

use crate::assumptions::EndPrecedence;
use crate::profile::IncomeOrExpense;

/// Inflation multiplier `(1 + rate)^years`
pub fn inflation_multiplier(inflation_rate_annual: f64, years_from_start: u32) -> f64 {
    (1.0 + inflation_rate_annual).powi(years_from_start.min(i32::MAX as u32) as i32)
}

/// Monthly income still being paid at `age`.
///
/// Income is kept flat in nominal terms: no inflation is applied to it.
pub fn active_income_at_age(
    age: u32,
    retirement_age: Option<u32>,
    incomes: &[IncomeOrExpense],
    precedence: EndPrecedence,
) -> f64 {
    incomes
        .iter()
        .filter(|i| i.is_active_at(age, retirement_age, precedence))
        .map(|i| i.value)
        .sum()
}

/// Monthly expenses still being paid at `age`, inflated to that year.
///
/// The multiplier is applied once to the whole bundle of active items.
pub fn active_expenses_at_age(
    age: u32,
    years_from_start: u32,
    retirement_age: Option<u32>,
    inflation_rate_annual: f64,
    expenses: &[IncomeOrExpense],
    precedence: EndPrecedence,
) -> f64 {
    let flat: f64 = expenses
        .iter()
        .filter(|e| e.is_active_at(age, retirement_age, precedence))
        .map(|e| e.value)
        .sum();

    // 0 * inf would poison the series with NaN
    if flat == 0.0 {
        return 0.0;
    }
    flat * inflation_multiplier(inflation_rate_annual, years_from_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn incomes() -> Vec<IncomeOrExpense> {
        vec![
            IncomeOrExpense::new("i1", "Salary", 5_000.0).ending_at_retirement(),
            IncomeOrExpense::new("i2", "Pension", 1_000.0),
            IncomeOrExpense::new("i3", "Rental", 500.0).ending_at_age(70),
        ]
    }

    fn expenses() -> Vec<IncomeOrExpense> {
        vec![
            IncomeOrExpense::new("e1", "Living", 2_500.0),
            IncomeOrExpense::new("e2", "Mortgage", 1_000.0).ending_at_age(50),
            IncomeOrExpense::new("e3", "Commute", 300.0).ending_at_retirement(),
        ]
    }

    #[test]
    fn test_income_counted_in_retirement_year() {
        let incomes = incomes();
        let p = EndPrecedence::Earliest;
        assert_relative_eq!(active_income_at_age(60, Some(60), &incomes, p), 6_500.0);
        assert_relative_eq!(active_income_at_age(61, Some(60), &incomes, p), 1_500.0);
        assert_relative_eq!(active_income_at_age(71, Some(60), &incomes, p), 1_000.0);
    }

    #[test]
    fn test_income_without_retirement_age_never_ends_by_flag() {
        let incomes = incomes();
        assert_relative_eq!(
            active_income_at_age(65, None, &incomes, EndPrecedence::Earliest),
            6_500.0
        );
    }

    #[test]
    fn test_income_not_inflated() {
        let incomes = incomes();
        // Same value regardless of how far into the projection we are
        let early = active_income_at_age(35, Some(60), &incomes, EndPrecedence::Earliest);
        let late = active_income_at_age(59, Some(60), &incomes, EndPrecedence::Earliest);
        assert_relative_eq!(early, late);
    }

    #[test]
    fn test_expenses_flat_without_inflation() {
        let expenses = expenses();
        for years in [0, 1, 10, 40] {
            assert_relative_eq!(
                active_expenses_at_age(40, years, Some(60), 0.0, &expenses, EndPrecedence::Earliest),
                3_800.0
            );
        }
    }

    #[test]
    fn test_expenses_compound_as_a_bundle() {
        let expenses = expenses();
        let p = EndPrecedence::Earliest;
        // Age 55, retired at 52: only living costs remain, inflated for 25 years
        let expected = 2_500.0 * 1.03_f64.powi(25);
        assert_relative_eq!(
            active_expenses_at_age(55, 25, Some(52), 0.03, &expenses, p),
            expected,
            max_relative = 1e-12
        );
        // Age 45: all three items, one shared multiplier
        let expected = 3_800.0 * 1.03_f64.powi(15);
        assert_relative_eq!(
            active_expenses_at_age(45, 15, Some(52), 0.03, &expenses, p),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_no_active_expenses_stays_zero_on_overflow() {
        let expenses = vec![IncomeOrExpense::new("e1", "Loan", 100.0).ending_at_age(31)];
        let value = active_expenses_at_age(100, 190, None, 100.0, &expenses, EndPrecedence::Earliest);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_inflation_multiplier() {
        assert_relative_eq!(inflation_multiplier(0.03, 0), 1.0);
        assert_relative_eq!(inflation_multiplier(0.03, 2), 1.0609, max_relative = 1e-12);
        assert_relative_eq!(inflation_multiplier(0.0, 50), 1.0);
    }
}
