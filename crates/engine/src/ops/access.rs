use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expenses};

use super::Engine;

impl Engine {
    async fn find_expense_by_id(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
    ) -> ResultEngine<Option<expenses::Model>> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Read access. A row owned by someone else reports the same error as a
    /// missing row, so readers cannot probe for foreign ids.
    pub(super) async fn require_expense_visible(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<expenses::Model> {
        let model = self
            .find_expense_by_id(db, expense_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        if model.owner_id != owner_id {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(model)
    }

    /// Write access. A row owned by someone else is rejected explicitly.
    pub(super) async fn require_expense_owned(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<expenses::Model> {
        let model = self
            .find_expense_by_id(db, expense_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        if model.owner_id != owner_id {
            return Err(EngineError::Forbidden(
                "expense belongs to another owner".to_string(),
            ));
        }
        Ok(model)
    }
}
