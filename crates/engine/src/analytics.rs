//! Spending aggregation and budget classification.
//!
//! Everything in this module is pure: callers load the owner's expenses and
//! budget, then run [`aggregate`] and [`evaluate`] over plain values. The
//! engine ops wire the results into [`SpendingSummary`] responses.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::expenses::Expense;

/// Grouping key for expenses without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Grouping key for expenses without a date.
pub const UNKNOWN_DATE: &str = "Unknown";
/// Synthetic category slice injected when spending exceeds the budget.
pub const OVER_BUDGET: &str = "Over Budget";
/// Upper bound for the displayed percentage badge.
pub const PERCENT_CAP: u32 = 999;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Unset,
    Normal,
    Warning,
    Exceeded,
}

/// Outcome of comparing total spending against a budget.
///
/// The optional fields are `Some` exactly when a positive budget exists;
/// tier [`BudgetTier::Unset`] carries no numbers at all.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub tier: BudgetTier,
    pub percentage: Option<u32>,
    pub bar_percentage: Option<u32>,
    pub over_amount: Option<Decimal>,
}

impl BudgetStatus {
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            tier: BudgetTier::Unset,
            percentage: None,
            bar_percentage: None,
            over_amount: None,
        }
    }
}

/// Classifies `spent` against `budget`.
///
/// Classification compares the exact ratio; the rounded percentage is for
/// display only, so 799 of 1000 shows "80%" yet stays [`BudgetTier::Normal`].
/// A budget of zero or less means no budget is configured.
#[must_use]
pub fn evaluate(budget: Decimal, spent: Decimal) -> BudgetStatus {
    if budget <= Decimal::ZERO {
        return BudgetStatus::unset();
    }

    let raw = spent / budget * Decimal::ONE_HUNDRED;
    let rounded = raw
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO);
    let percentage = rounded.to_u32().unwrap_or(PERCENT_CAP).min(PERCENT_CAP);

    let (tier, over_amount) = if spent >= budget {
        (BudgetTier::Exceeded, spent - budget)
    } else if spent * Decimal::ONE_HUNDRED >= budget * Decimal::from(80) {
        (BudgetTier::Warning, Decimal::ZERO)
    } else {
        (BudgetTier::Normal, Decimal::ZERO)
    };

    BudgetStatus {
        tier,
        percentage: Some(percentage),
        bar_percentage: Some(percentage.min(100)),
        over_amount: Some(over_amount),
    }
}

/// Spending totals grouped by date and by category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total_spent: Decimal,
    pub by_date: BTreeMap<String, Decimal>,
    pub by_category: BTreeMap<String, Decimal>,
}

/// Sums a set of expenses into per-date and per-category buckets.
///
/// Expenses without a date or category land in the [`UNKNOWN_DATE`] and
/// [`UNCATEGORIZED`] buckets. Never fails: unreadable stored amounts have
/// already been read as zero.
pub fn aggregate<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Aggregate {
    let mut totals = Aggregate::default();
    for expense in expenses {
        totals.total_spent += expense.amount;

        let date_key = expense
            .date
            .map_or_else(|| UNKNOWN_DATE.to_string(), |d| d.to_string());
        *totals.by_date.entry(date_key).or_default() += expense.amount;

        let category_key = expense
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *totals.by_category.entry(category_key).or_default() += expense.amount;
    }
    totals
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_spent: Decimal,
    pub by_date: BTreeMap<String, Decimal>,
    pub by_category: BTreeMap<String, Decimal>,
    pub status: BudgetStatus,
}

impl SpendingSummary {
    /// Combines aggregate totals with the budget status.
    ///
    /// When spending exceeds the budget by a positive amount, an extra
    /// [`OVER_BUDGET`] category slice is added for proportional chart
    /// rendering. The slice is never persisted.
    #[must_use]
    pub fn assemble(totals: Aggregate, status: BudgetStatus) -> Self {
        let mut by_category = totals.by_category;
        if status.tier == BudgetTier::Exceeded {
            let over = status.over_amount.unwrap_or_default();
            if over > Decimal::ZERO {
                by_category.insert(OVER_BUDGET.to_string(), over);
            }
        }
        Self {
            total_spent: totals.total_spent,
            by_date: totals.by_date,
            by_category,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;

    fn expense(amount: Decimal, category: Option<&str>, date: Option<NaiveDate>) -> Expense {
        let now = Utc::now();
        Expense {
            id: Uuid::new_v4(),
            owner_id: "alice".to_string(),
            name: "test".to_string(),
            amount,
            category: category.map(str::to_string),
            description: None,
            date,
            created_at: now,
            updated_at: now,
            edit_count: 0,
        }
    }

    #[test]
    fn evaluate_without_budget_is_unset() {
        assert_eq!(evaluate(Decimal::ZERO, dec!(500)), BudgetStatus::unset());
        assert_eq!(evaluate(dec!(-10), dec!(500)), BudgetStatus::unset());
    }

    #[test]
    fn evaluate_classifies_on_the_exact_ratio() {
        let status = evaluate(dec!(1000), dec!(799));
        assert_eq!(status.tier, BudgetTier::Normal);
        assert_eq!(status.percentage, Some(80));
        assert_eq!(status.over_amount, Some(Decimal::ZERO));

        let status = evaluate(dec!(1000), dec!(800));
        assert_eq!(status.tier, BudgetTier::Warning);
        assert_eq!(status.percentage, Some(80));
    }

    #[test]
    fn evaluate_marks_the_exact_boundary_as_exceeded() {
        let status = evaluate(dec!(1000), dec!(1000));
        assert_eq!(status.tier, BudgetTier::Exceeded);
        assert_eq!(status.percentage, Some(100));
        assert_eq!(status.over_amount, Some(Decimal::ZERO));
    }

    #[test]
    fn evaluate_reports_the_overrun() {
        let status = evaluate(dec!(1000), dec!(1200));
        assert_eq!(status.tier, BudgetTier::Exceeded);
        assert_eq!(status.percentage, Some(120));
        assert_eq!(status.bar_percentage, Some(100));
        assert_eq!(status.over_amount, Some(dec!(200)));
    }

    #[test]
    fn evaluate_caps_the_badge_percentage() {
        let status = evaluate(dec!(1), dec!(50));
        assert_eq!(status.percentage, Some(PERCENT_CAP));
        assert_eq!(status.bar_percentage, Some(100));
    }

    #[test]
    fn evaluate_rounds_half_up() {
        let status = evaluate(dec!(1000), dec!(805));
        assert_eq!(status.percentage, Some(81));

        let status = evaluate(dec!(1000), dec!(804));
        assert_eq!(status.percentage, Some(80));
    }

    #[test]
    fn aggregate_groups_by_date_and_category() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 1);
        let expenses = vec![
            expense(dec!(10), Some("Food"), date),
            expense(dec!(5), Some("Food"), date),
            expense(dec!(20), Some("Travel"), NaiveDate::from_ymd_opt(2026, 7, 2)),
        ];

        let totals = aggregate(&expenses);

        assert_eq!(totals.total_spent, dec!(35));
        assert_eq!(totals.by_date.get("2026-07-01"), Some(&dec!(15)));
        assert_eq!(totals.by_date.get("2026-07-02"), Some(&dec!(20)));
        assert_eq!(totals.by_category.get("Food"), Some(&dec!(15)));
        assert_eq!(totals.by_category.get("Travel"), Some(&dec!(20)));
    }

    #[test]
    fn aggregate_buckets_missing_keys_under_sentinels() {
        let expenses = vec![expense(dec!(7), None, None)];

        let totals = aggregate(&expenses);

        assert_eq!(totals.by_date.get(UNKNOWN_DATE), Some(&dec!(7)));
        assert_eq!(totals.by_category.get(UNCATEGORIZED), Some(&dec!(7)));
    }

    #[test]
    fn assemble_adds_an_over_budget_slice_only_when_over() {
        let expenses = vec![expense(dec!(1200), Some("Food"), None)];
        let totals = aggregate(&expenses);

        let summary = SpendingSummary::assemble(totals.clone(), evaluate(dec!(1000), dec!(1200)));
        assert_eq!(summary.by_category.get(OVER_BUDGET), Some(&dec!(200)));

        // Exactly on budget: exceeded, but nothing to draw.
        let summary = SpendingSummary::assemble(totals, evaluate(dec!(1200), dec!(1200)));
        assert_eq!(summary.status.tier, BudgetTier::Exceeded);
        assert!(!summary.by_category.contains_key(OVER_BUDGET));
    }
}
