use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Budget, ResultEngine, amount,
    analytics::{self, BudgetStatus, SpendingSummary},
    budgets,
    events::ChangeEvent,
};

use super::{Engine, with_tx};

/// A budget together with its evaluation against current spending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub amount: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
    pub status: BudgetStatus,
}

impl Engine {
    async fn find_budget(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
    ) -> ResultEngine<Option<Budget>> {
        let model = budgets::Entity::find_by_id(owner_id.to_string())
            .one(db)
            .await?;
        model.map(Budget::try_from).transpose()
    }

    /// Sets the owner's budget, replacing any previous value.
    ///
    /// A zero or negative amount resets instead: the row is deleted and the
    /// canonical "no budget" state remains. Returns the stored budget, or
    /// `None` after a reset.
    pub async fn set_budget(
        &self,
        owner_id: &str,
        raw_amount: &str,
    ) -> ResultEngine<Option<Budget>> {
        let amount = amount::parse_decimal(raw_amount)?;
        if amount <= Decimal::ZERO {
            self.reset_budget(owner_id).await?;
            return Ok(None);
        }

        let budget = Budget {
            owner_id: owner_id.to_string(),
            amount,
            updated_at: Utc::now(),
        };
        with_tx!(self, |db_tx| {
            let existing = budgets::Entity::find_by_id(owner_id.to_string())
                .one(&db_tx)
                .await?;
            let active = budgets::ActiveModel::from(&budget);
            if existing.is_some() {
                active.update(&db_tx).await?;
            } else {
                active.insert(&db_tx).await?;
            }
            Ok(())
        })?;
        self.events
            .publish(ChangeEvent::Budget {
                owner_id: owner_id.to_string(),
                amount,
            })
            .await;
        Ok(Some(budget))
    }

    /// Removes the owner's budget. Safe to call when none exists.
    pub async fn reset_budget(&self, owner_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            budgets::Entity::delete_by_id(owner_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })?;
        self.events
            .publish(ChangeEvent::Budget {
                owner_id: owner_id.to_string(),
                amount: Decimal::ZERO,
            })
            .await;
        Ok(())
    }

    /// The owner's configured budget, if any.
    pub async fn budget(&self, owner_id: &str) -> ResultEngine<Option<Budget>> {
        with_tx!(self, |db_tx| {
            let out = self.find_budget(&db_tx, owner_id).await?;
            Ok(out)
        })
    }

    /// The owner's budget with its status against current spending.
    ///
    /// With no budget configured the amount reads as zero and `updated_at`
    /// is absent.
    pub async fn budget_overview(&self, owner_id: &str) -> ResultEngine<BudgetOverview> {
        with_tx!(self, |db_tx| {
            let budget = self.find_budget(&db_tx, owner_id).await?;
            let expenses = self.owner_expenses(&db_tx, owner_id).await?;
            let totals = analytics::aggregate(&expenses);
            let (amount, updated_at) =
                budget.map_or((Decimal::ZERO, None), |b| (b.amount, Some(b.updated_at)));
            Ok(BudgetOverview {
                amount,
                updated_at,
                status: analytics::evaluate(amount, totals.total_spent),
            })
        })
    }

    /// Spending totals, grouping buckets and budget status in one read.
    pub async fn spending_summary(&self, owner_id: &str) -> ResultEngine<SpendingSummary> {
        with_tx!(self, |db_tx| {
            let budget = self.find_budget(&db_tx, owner_id).await?;
            let expenses = self.owner_expenses(&db_tx, owner_id).await?;
            let totals = analytics::aggregate(&expenses);
            let amount = budget.map_or(Decimal::ZERO, |b| b.amount);
            let status = analytics::evaluate(amount, totals.total_spent);
            Ok(SpendingSummary::assemble(totals, status))
        })
    }
}
