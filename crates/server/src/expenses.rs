//! Expense API endpoints

use api_types::expense::{
    EditEntryView, ExpenseDeleted, ExpenseDetail, ExpenseListResponse, ExpenseNew, ExpenseSaved,
    ExpenseView, HistoryResponse, SnapshotView, UpdateOutcome,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{Identity, ServerState},
};
use engine::{CreateExpenseCmd, ExpenseFields, UpdateExpenseCmd};

fn fields_from(payload: ExpenseNew) -> ExpenseFields {
    let mut fields = ExpenseFields::new(payload.name, payload.amount);
    if let Some(category) = payload.category {
        fields = fields.category(category);
    }
    if let Some(description) = payload.description {
        fields = fields.description(description);
    }
    if let Some(date) = payload.date {
        fields = fields.date(date);
    }
    fields
}

fn expense_view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        name: expense.name,
        amount: expense.amount,
        category: expense.category,
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
        edit_count: expense.edit_count,
    }
}

fn snapshot_view(snapshot: engine::FieldSnapshot) -> SnapshotView {
    SnapshotView {
        name: snapshot.name,
        amount: snapshot.amount,
        category: snapshot.category,
        description: snapshot.description,
        date: snapshot.date,
    }
}

fn entry_view(entry: engine::EditEntry) -> EditEntryView {
    EditEntryView {
        editor_id: entry.editor_id,
        editor_name: entry.editor_name,
        recorded_at: entry.recorded_at,
        before: snapshot_view(entry.before),
        after: snapshot_view(entry.after),
        changes: entry.changes,
    }
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseSaved>), ServerError> {
    let expense = state
        .engine
        .create_expense(CreateExpenseCmd::new(
            identity.owner_id,
            fields_from(payload),
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseSaved {
            id: expense.id,
            message: "Expense saved".to_string(),
        }),
    ))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state.engine.list_expenses(&identity.owner_id).await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(expense_view).collect(),
    }))
}

pub async fn detail(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseDetail>, ServerError> {
    let (expense, history) = state
        .engine
        .expense_with_history(id, &identity.owner_id)
        .await?;

    Ok(Json(ExpenseDetail {
        expense: expense_view(expense),
        history: history.into_iter().map(entry_view).collect(),
    }))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<UpdateOutcome>, ServerError> {
    let Identity {
        owner_id,
        display_name,
    } = identity;

    let mut cmd = UpdateExpenseCmd::new(id, owner_id, fields_from(payload));
    if let Some(name) = display_name {
        cmd = cmd.editor_name(name);
    }

    let (_, changes) = state.engine.record_edit(cmd).await?;

    Ok(Json(UpdateOutcome {
        message: "Expense updated".to_string(),
        changes,
    }))
}

pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    state.engine.delete_expense(id, &identity.owner_id).await?;

    Ok(Json(ExpenseDeleted {
        message: "Expense deleted".to_string(),
    }))
}

pub async fn history(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let history = state.engine.history(id, &identity.owner_id).await?;

    Ok(Json(HistoryResponse {
        history: history.into_iter().map(entry_view).collect(),
    }))
}
