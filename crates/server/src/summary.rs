//! Spending summary API endpoint

use api_types::summary::SpendingSummary;
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError, budgets,
    server::{Identity, ServerState},
};

pub async fn get_summary(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<SpendingSummary>, ServerError> {
    let summary = state.engine.spending_summary(&identity.owner_id).await?;

    Ok(Json(SpendingSummary {
        total_spent: summary.total_spent,
        by_date: summary.by_date,
        by_category: summary.by_category,
        status: budgets::status_view(summary.status),
    }))
}
