//! Edit history entries.
//!
//! An [`EditEntry`] is an immutable audit record appended every time an
//! expense is updated. It carries full before/after snapshots of the tracked
//! fields plus a pre-rendered list of change strings, so a history row stays
//! readable even after later edits or deletion of neighbouring rows.
//!
//! Entries are self-contained: under concurrent edits entry N+1's before
//! snapshot need not equal entry N's after snapshot. The expense row is the
//! source of truth for current state, never a replay of the history.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, amount, expenses};

/// Sole entry in a change list when no tracked field differs.
pub const NO_CHANGES: &str = "No significant changes";
/// Editor display name used when the caller does not supply one.
pub const UNKNOWN_EDITOR: &str = "Unknown";

/// The five tracked fields of an expense, frozen at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub name: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl FieldSnapshot {
    /// Renders one `Label: old → new` string per differing field.
    ///
    /// Amounts are compared as [`Decimal`], so `50` and `50.00` are equal.
    /// When nothing differs the list holds exactly [`NO_CHANGES`].
    pub fn diff(&self, after: &Self) -> Vec<String> {
        let mut changes = Vec::new();
        if self.name != after.name {
            changes.push(format!("Name: \"{}\" → \"{}\"", self.name, after.name));
        }
        if self.amount != after.amount {
            changes.push(format!(
                "Amount: {} → {}",
                amount::encode(self.amount),
                amount::encode(after.amount)
            ));
        }
        if self.category != after.category {
            changes.push(format!(
                "Category: {} → {}",
                category_label(self.category.as_deref()),
                category_label(after.category.as_deref())
            ));
        }
        if self.description != after.description {
            changes.push(format!(
                "Description: \"{}\" → \"{}\"",
                self.description.as_deref().unwrap_or_default(),
                after.description.as_deref().unwrap_or_default()
            ));
        }
        if self.date != after.date {
            changes.push(format!(
                "Date: {} → {}",
                date_label(self.date),
                date_label(after.date)
            ));
        }
        if changes.is_empty() {
            changes.push(NO_CHANGES.to_string());
        }
        changes
    }
}

impl From<&expenses::Expense> for FieldSnapshot {
    fn from(expense: &expenses::Expense) -> Self {
        Self {
            name: expense.name.clone(),
            amount: expense.amount,
            category: expense.category.clone(),
            description: expense.description.clone(),
            date: expense.date,
        }
    }
}

fn category_label(value: Option<&str>) -> &str {
    value.unwrap_or("(none)")
}

fn date_label(value: Option<NaiveDate>) -> String {
    value.map_or_else(|| "(none)".to_string(), |d| d.to_string())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditEntry {
    pub expense_id: Uuid,
    pub editor_id: String,
    pub editor_name: String,
    pub recorded_at: DateTime<Utc>,
    pub before: FieldSnapshot,
    pub after: FieldSnapshot,
    pub changes: Vec<String>,
}

impl EditEntry {
    pub(crate) fn new(
        expense_id: Uuid,
        editor_id: String,
        editor_name: String,
        before: FieldSnapshot,
        after: FieldSnapshot,
    ) -> Self {
        let changes = before.diff(&after);
        Self {
            expense_id,
            editor_id,
            editor_name,
            recorded_at: Utc::now(),
            before,
            after,
            changes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "edit_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub expense_id: String,
    pub editor_id: String,
    pub editor_name: String,
    pub recorded_at: DateTimeUtc,
    pub before_name: String,
    pub before_amount: String,
    pub before_category: Option<String>,
    pub before_description: Option<String>,
    pub before_date: Option<String>,
    pub after_name: String,
    pub after_amount: String,
    pub after_category: Option<String>,
    pub after_description: Option<String>,
    pub after_date: Option<String>,
    pub changes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&EditEntry> for ActiveModel {
    fn from(entry: &EditEntry) -> Self {
        Self {
            id: ActiveValue::NotSet,
            expense_id: ActiveValue::Set(entry.expense_id.to_string()),
            editor_id: ActiveValue::Set(entry.editor_id.clone()),
            editor_name: ActiveValue::Set(entry.editor_name.clone()),
            recorded_at: ActiveValue::Set(entry.recorded_at),
            before_name: ActiveValue::Set(entry.before.name.clone()),
            before_amount: ActiveValue::Set(amount::encode(entry.before.amount)),
            before_category: ActiveValue::Set(entry.before.category.clone()),
            before_description: ActiveValue::Set(entry.before.description.clone()),
            before_date: ActiveValue::Set(entry.before.date.map(|d| d.to_string())),
            after_name: ActiveValue::Set(entry.after.name.clone()),
            after_amount: ActiveValue::Set(amount::encode(entry.after.amount)),
            after_category: ActiveValue::Set(entry.after.category.clone()),
            after_description: ActiveValue::Set(entry.after.description.clone()),
            after_date: ActiveValue::Set(entry.after.date.map(|d| d.to_string())),
            changes: ActiveValue::Set(serde_json::to_string(&entry.changes).unwrap_or_default()),
        }
    }
}

impl TryFrom<Model> for EditEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let before = FieldSnapshot {
            name: model.before_name,
            amount: amount::parse_lossy(&model.before_amount),
            category: model.before_category,
            description: model.before_description,
            date: expenses::parse_stored_date(model.before_date.as_deref()),
        };
        let after = FieldSnapshot {
            name: model.after_name,
            amount: amount::parse_lossy(&model.after_amount),
            category: model.after_category,
            description: model.after_description,
            date: expenses::parse_stored_date(model.after_date.as_deref()),
        };
        Ok(Self {
            expense_id: Uuid::parse_str(&model.expense_id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            editor_id: model.editor_id,
            editor_name: model.editor_name,
            recorded_at: model.recorded_at,
            before,
            after,
            changes: serde_json::from_str(&model.changes).unwrap_or_default(),
        })
    }
}
