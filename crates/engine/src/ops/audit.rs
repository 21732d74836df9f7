use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EditEntry, Expense, ResultEngine, UpdateExpenseCmd, amount,
    edit_history::{self, FieldSnapshot, UNKNOWN_EDITOR},
    events::{ChangeAction, ChangeEvent},
    expenses,
};

use super::{Engine, normalize_fields, normalize_optional_text, with_tx};

impl Engine {
    /// Applies new field values to an expense and appends an audit entry.
    ///
    /// The field update, the counter increment and the history insert commit
    /// together or not at all. The counter is incremented as a SQL expression
    /// (`edit_count = edit_count + 1`), so concurrent edits cannot lose a
    /// count. An edit that changes nothing is still recorded, with the
    /// sentinel change list.
    ///
    /// Returns the updated expense and the rendered change strings.
    pub async fn record_edit(&self, cmd: UpdateExpenseCmd) -> ResultEngine<(Expense, Vec<String>)> {
        let UpdateExpenseCmd {
            expense_id,
            owner_id,
            editor_name,
            fields,
        } = cmd;
        let editor_name = normalize_optional_text(editor_name.as_deref())
            .unwrap_or_else(|| UNKNOWN_EDITOR.to_string());
        let fields = normalize_fields(&fields)?;

        let (expense, changes) = with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owned(&db_tx, expense_id, &owner_id)
                .await?;
            let current = Expense::try_from(model)?;
            let entry = EditEntry::new(
                expense_id,
                owner_id.clone(),
                editor_name.clone(),
                FieldSnapshot::from(&current),
                FieldSnapshot::from(&fields),
            );
            let changes = entry.changes.clone();

            expenses::Entity::update_many()
                .col_expr(expenses::Column::Name, Expr::value(fields.name.clone()))
                .col_expr(
                    expenses::Column::Amount,
                    Expr::value(amount::encode(fields.amount)),
                )
                .col_expr(
                    expenses::Column::Category,
                    Expr::value(fields.category.clone()),
                )
                .col_expr(
                    expenses::Column::Description,
                    Expr::value(fields.description.clone()),
                )
                .col_expr(
                    expenses::Column::Date,
                    Expr::value(fields.date.map(|d| d.to_string())),
                )
                .col_expr(expenses::Column::UpdatedAt, Expr::value(entry.recorded_at))
                .col_expr(
                    expenses::Column::EditCount,
                    Expr::col(expenses::Column::EditCount).add(1),
                )
                .filter(expenses::Column::Id.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;

            edit_history::ActiveModel::from(&entry).insert(&db_tx).await?;

            let updated = self
                .require_expense_owned(&db_tx, expense_id, &owner_id)
                .await?;
            Ok((Expense::try_from(updated)?, changes))
        })?;

        self.events
            .publish(ChangeEvent::Expenses {
                owner_id,
                action: ChangeAction::Updated,
                expense_id,
            })
            .await;

        Ok((expense, changes))
    }

    /// Edit history for one expense in append order. Empty if never edited.
    pub async fn history(&self, expense_id: Uuid, owner_id: &str) -> ResultEngine<Vec<EditEntry>> {
        with_tx!(self, |db_tx| {
            self.require_expense_visible(&db_tx, expense_id, owner_id)
                .await?;
            let out = self.load_history(&db_tx, expense_id).await?;
            Ok(out)
        })
    }

    pub(super) async fn load_history(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
    ) -> ResultEngine<Vec<EditEntry>> {
        let models = edit_history::Entity::find()
            .filter(edit_history::Column::ExpenseId.eq(expense_id.to_string()))
            .order_by_asc(edit_history::Column::Id)
            .all(db)
            .await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(EditEntry::try_from(model)?);
        }
        Ok(out)
    }
}
