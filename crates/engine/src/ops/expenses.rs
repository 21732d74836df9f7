use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateExpenseCmd, EditEntry, Expense, ResultEngine, edit_history,
    events::{ChangeAction, ChangeEvent},
    expenses,
};

use super::{Engine, normalize_fields, with_tx};

impl Engine {
    pub(super) async fn owner_expenses(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::OwnerId.eq(owner_id.to_string()))
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id)
            .all(db)
            .await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Expense::try_from(model)?);
        }
        Ok(out)
    }

    /// Creates an expense with a fresh id, a zero edit counter and no history.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Expense> {
        let CreateExpenseCmd { owner_id, fields } = cmd;
        let fields = normalize_fields(&fields)?;
        let expense = Expense::new(owner_id, fields);
        with_tx!(self, |db_tx| {
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            Ok(())
        })?;
        self.events
            .publish(ChangeEvent::Expenses {
                owner_id: expense.owner_id.clone(),
                action: ChangeAction::Created,
                expense_id: expense.id,
            })
            .await;
        Ok(expense)
    }

    /// Lists the owner's expenses, newest first.
    pub async fn list_expenses(&self, owner_id: &str) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            let out = self.owner_expenses(&db_tx, owner_id).await?;
            Ok(out)
        })
    }

    /// Loads one expense together with its full edit history.
    pub async fn expense_with_history(
        &self,
        expense_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<(Expense, Vec<EditEntry>)> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_visible(&db_tx, expense_id, owner_id)
                .await?;
            let expense = Expense::try_from(model)?;
            let history = self.load_history(&db_tx, expense_id).await?;
            Ok((expense, history))
        })
    }

    /// Deletes an expense and its edit history in one transaction.
    pub async fn delete_expense(&self, expense_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_visible(&db_tx, expense_id, owner_id)
                .await?;
            edit_history::Entity::delete_many()
                .filter(edit_history::Column::ExpenseId.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })?;
        self.events
            .publish(ChangeEvent::Expenses {
                owner_id: owner_id.to_string(),
                action: ChangeAction::Deleted,
                expense_id,
            })
            .await;
        Ok(())
    }
}
