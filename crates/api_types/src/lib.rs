use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod expense {
    use super::*;

    /// Request body for creating or replacing an expense.
    ///
    /// The amount is decimal text (e.g. `12.50`) and the date, when present,
    /// must be `YYYY-MM-DD`. The server validates both.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        pub amount: String,
        pub category: Option<String>,
        pub description: Option<String>,
        pub date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub name: String,
        /// Serialized as a decimal string in JSON.
        pub amount: Decimal,
        pub category: Option<String>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        /// Total number of times this expense has been edited.
        pub edit_count: i64,
    }

    /// Field values as they stood on one side of an edit.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SnapshotView {
        pub name: String,
        pub amount: Decimal,
        pub category: Option<String>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EditEntryView {
        pub editor_id: String,
        pub editor_name: String,
        pub recorded_at: DateTime<Utc>,
        pub before: SnapshotView,
        pub after: SnapshotView,
        /// Human-readable change lines, e.g. `Amount: 50 → 75`.
        pub changes: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDetail {
        pub expense: ExpenseView,
        pub history: Vec<EditEntryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub history: Vec<EditEntryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseSaved {
        pub id: Uuid,
        pub message: String,
    }

    /// Outcome of a replace: status message plus the rendered change lines.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UpdateOutcome {
        pub message: String,
        pub changes: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub message: String,
    }
}

pub mod budget {
    use super::*;

    /// Request body for setting the budget.
    ///
    /// Zero or negative amounts reset the budget instead.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetPut {
        pub amount: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TierView {
        Unset,
        Normal,
        Warning,
        Exceeded,
    }

    /// Budget evaluation against current spending.
    ///
    /// The optional fields are present exactly when a budget is configured.
    /// `percentage` is capped at 999 for badge display; `bar_percentage`
    /// additionally clamps at 100.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub tier: TierView,
        pub percentage: Option<u32>,
        pub bar_percentage: Option<u32>,
        pub over_amount: Option<Decimal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetOverview {
        pub amount: Decimal,
        pub updated_at: Option<DateTime<Utc>>,
        pub status: BudgetStatusView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSaved {
        pub message: String,
        pub amount: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetReset {
        pub message: String,
    }
}

pub mod summary {
    use super::*;

    /// Spending totals and budget status in one response.
    ///
    /// `by_category` may carry an extra `Over Budget` slice when spending
    /// exceeds the budget; it is derived, never stored.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingSummary {
        pub total_spent: Decimal,
        pub by_date: BTreeMap<String, Decimal>,
        pub by_category: BTreeMap<String, Decimal>,
        pub status: budget::BudgetStatusView,
    }
}

pub mod events {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ChangeKind {
        Created,
        Updated,
        Deleted,
    }

    /// One message on the live event stream.
    ///
    /// The stream is already scoped to the authenticated owner, so events
    /// carry no owner id.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "scope", rename_all = "snake_case")]
    pub enum ChangeNotification {
        Expenses {
            action: ChangeKind,
            expense_id: Uuid,
        },
        Budget {
            /// Zero after a reset.
            amount: Decimal,
        },
    }
}
