//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update),
//! keeping call sites readable and avoiding long argument lists. Field
//! values arrive raw (amounts as strings, dates as `YYYY-MM-DD` text); the
//! engine validates and normalizes them.

use uuid::Uuid;

/// Raw expense fields as submitted by a caller.
#[derive(Clone, Debug)]
pub struct ExpenseFields {
    pub name: String,
    pub amount: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl ExpenseFields {
    #[must_use]
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            category: None,
            description: None,
            date: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Create a new expense for an owner.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub owner_id: String,
    pub fields: ExpenseFields,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(owner_id: impl Into<String>, fields: ExpenseFields) -> Self {
        Self {
            owner_id: owner_id.into(),
            fields,
        }
    }
}

/// Replace the tracked fields of an expense, appending an audit entry.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub expense_id: Uuid,
    pub owner_id: String,
    pub editor_name: Option<String>,
    pub fields: ExpenseFields,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(expense_id: Uuid, owner_id: impl Into<String>, fields: ExpenseFields) -> Self {
        Self {
            expense_id,
            owner_id: owner_id.into(),
            editor_name: None,
            fields,
        }
    }

    #[must_use]
    pub fn editor_name(mut self, editor_name: impl Into<String>) -> Self {
        self.editor_name = Some(editor_name.into());
        self
    }
}
