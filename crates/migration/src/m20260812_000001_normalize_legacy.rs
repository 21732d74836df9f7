//! Repairs rows written before field validation existed: free-text amounts
//! and dates become canonical, blank text becomes NULL, and edit counters
//! are recomputed from the audit trail.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbBackend, Statement, Value};
use sea_orm_migration::{SchemaManagerConnection, prelude::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        normalize_expenses(db, backend).await?;
        normalize_budgets(db, backend).await?;

        // Older versions bumped the counter in application code and could
        // lose increments; the trail itself is the authority.
        db.execute(Statement::from_string(
            backend,
            "UPDATE expenses SET edit_count = \
             (SELECT COUNT(*) FROM edit_entries \
              WHERE edit_entries.expense_id = expenses.id);",
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}

async fn normalize_expenses(
    db: &SchemaManagerConnection<'_>,
    backend: DbBackend,
) -> Result<(), DbErr> {
    let rows = db
        .query_all(Statement::from_string(
            backend,
            "SELECT id, amount, category, description, date FROM expenses;",
        ))
        .await?;

    for row in rows {
        let id: String = row.try_get("", "id")?;
        let amount: String = row.try_get("", "amount")?;
        let category: Option<String> = row.try_get("", "category")?;
        let description: Option<String> = row.try_get("", "description")?;
        let date: Option<String> = row.try_get("", "date")?;

        let new_amount = canonical_amount(&amount);
        let new_category = canonical_text(category.clone());
        let new_description = canonical_text(description.clone());
        let new_date = date.as_deref().and_then(canonical_date);

        if new_amount == amount
            && new_category == category
            && new_description == description
            && new_date == date
        {
            continue;
        }

        db.execute(Statement::from_sql_and_values(
            backend,
            "UPDATE expenses SET amount = ?, category = ?, description = ?, date = ? \
             WHERE id = ?;",
            vec![
                new_amount.into(),
                opt_value(new_category),
                opt_value(new_description),
                opt_value(new_date),
                id.into(),
            ],
        ))
        .await?;
    }

    Ok(())
}

async fn normalize_budgets(
    db: &SchemaManagerConnection<'_>,
    backend: DbBackend,
) -> Result<(), DbErr> {
    let rows = db
        .query_all(Statement::from_string(
            backend,
            "SELECT owner_id, amount FROM budgets;",
        ))
        .await?;

    for row in rows {
        let owner_id: String = row.try_get("", "owner_id")?;
        let amount: String = row.try_get("", "amount")?;

        match parse_amount(&amount) {
            Some(value) if value > Decimal::ZERO => {
                let canonical = value.normalize().to_string();
                if canonical != amount {
                    db.execute(Statement::from_sql_and_values(
                        backend,
                        "UPDATE budgets SET amount = ? WHERE owner_id = ?;",
                        vec![canonical.into(), owner_id.into()],
                    ))
                    .await?;
                }
            }
            // A budget of zero or less means none is configured.
            _ => {
                db.execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM budgets WHERE owner_id = ?;",
                    vec![owner_id.into()],
                ))
                .await?;
            }
        }
    }

    Ok(())
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_str(&trimmed.replace(',', ".")))
        .ok()
}

fn canonical_amount(raw: &str) -> String {
    parse_amount(raw)
        .unwrap_or(Decimal::ZERO)
        .normalize()
        .to_string()
}

fn canonical_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn canonical_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.to_string());
        }
    }
    None
}

fn opt_value(value: Option<String>) -> Value {
    match value {
        Some(v) => v.into(),
        None => Value::String(None),
    }
}
