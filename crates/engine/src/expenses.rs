//! Expense records.
//!
//! An `Expense` is a single spending entry belonging to exactly one owner.
//! Its edit history lives in `edit_history`; `edit_count` is denormalized on
//! the record and always matches the number of history rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, amount, ops::NormalizedFields};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_stored_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub description: Option<String>,
    /// User-supplied calendar date, not the creation instant.
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub edit_count: i64,
}

impl Expense {
    pub(crate) fn new(owner_id: String, fields: NormalizedFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: fields.name,
            amount: fields.amount,
            category: fields.category,
            description: fields.description,
            date: fields.date,
            created_at: now,
            updated_at: now,
            edit_count: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub amount: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub edit_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::edit_history::Entity")]
    EditHistory,
}

impl Related<super::edit_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EditHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            owner_id: ActiveValue::Set(expense.owner_id.clone()),
            name: ActiveValue::Set(expense.name.clone()),
            amount: ActiveValue::Set(amount::encode(expense.amount)),
            category: ActiveValue::Set(expense.category.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            date: ActiveValue::Set(expense.date.map(|d| d.to_string())),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
            edit_count: ActiveValue::Set(expense.edit_count),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            owner_id: model.owner_id,
            name: model.name,
            // Stored values may predate validation; unreadable amounts and
            // dates read as zero/absent instead of failing the whole row.
            amount: amount::parse_lossy(&model.amount),
            category: model.category,
            description: model.description,
            date: parse_stored_date(model.date.as_deref()),
            created_at: model.created_at,
            updated_at: model.updated_at,
            edit_count: model.edit_count,
        })
    }
}
