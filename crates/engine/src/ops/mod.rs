use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;

use crate::{
    EngineError, ExpenseFields, ResultEngine, amount,
    edit_history::FieldSnapshot,
    events::{ChangeEvent, ChangeFeed},
    expenses::DATE_FORMAT,
};

mod access;
mod audit;
mod budgets;
mod expenses;

pub use budgets::BudgetOverview;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    events: ChangeFeed,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Opens a live feed of this owner's committed changes.
    pub async fn subscribe(&self, owner_id: &str) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe(owner_id).await
    }
}

fn normalize_required_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(
            "name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn normalize_date(value: Option<&str>) -> ResultEngine<Option<NaiveDate>> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| EngineError::InvalidField("date must be YYYY-MM-DD".to_string()))
}

/// Expense fields after trimming, amount parsing and date parsing.
///
/// Create and update run the exact same checks; this is the only way field
/// values reach the tables.
pub(crate) struct NormalizedFields {
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    pub(crate) category: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) date: Option<NaiveDate>,
}

fn normalize_fields(fields: &ExpenseFields) -> ResultEngine<NormalizedFields> {
    Ok(NormalizedFields {
        name: normalize_required_name(&fields.name)?,
        amount: amount::parse(&fields.amount)?,
        category: normalize_optional_text(fields.category.as_deref()),
        description: normalize_optional_text(fields.description.as_deref()),
        date: normalize_date(fields.date.as_deref())?,
    })
}

impl From<&NormalizedFields> for FieldSnapshot {
    fn from(fields: &NormalizedFields) -> Self {
        Self {
            name: fields.name.clone(),
            amount: fields.amount,
            category: fields.category.clone(),
            description: fields.description.clone(),
            date: fields.date,
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            events: ChangeFeed::default(),
        })
    }
}
