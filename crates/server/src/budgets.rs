//! Budget API endpoints

use api_types::budget::{
    BudgetOverview, BudgetPut, BudgetReset, BudgetSaved, BudgetStatusView, TierView,
};
use axum::{Extension, Json, extract::State};
use rust_decimal::Decimal;

use crate::{
    ServerError,
    server::{Identity, ServerState},
};

fn tier_view(tier: engine::BudgetTier) -> TierView {
    match tier {
        engine::BudgetTier::Unset => TierView::Unset,
        engine::BudgetTier::Normal => TierView::Normal,
        engine::BudgetTier::Warning => TierView::Warning,
        engine::BudgetTier::Exceeded => TierView::Exceeded,
    }
}

pub fn status_view(status: engine::BudgetStatus) -> BudgetStatusView {
    BudgetStatusView {
        tier: tier_view(status.tier),
        percentage: status.percentage,
        bar_percentage: status.bar_percentage,
        over_amount: status.over_amount,
    }
}

pub async fn overview(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetOverview>, ServerError> {
    let overview = state.engine.budget_overview(&identity.owner_id).await?;

    Ok(Json(BudgetOverview {
        amount: overview.amount,
        updated_at: overview.updated_at,
        status: status_view(overview.status),
    }))
}

pub async fn set(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetPut>,
) -> Result<Json<BudgetSaved>, ServerError> {
    let stored = state
        .engine
        .set_budget(&identity.owner_id, &payload.amount)
        .await?;

    let response = match stored {
        Some(budget) => BudgetSaved {
            message: "Budget saved".to_string(),
            amount: budget.amount,
        },
        None => BudgetSaved {
            message: "Budget reset".to_string(),
            amount: Decimal::ZERO,
        },
    };
    Ok(Json(response))
}

pub async fn reset(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetReset>, ServerError> {
    state.engine.reset_budget(&identity.owner_id).await?;

    Ok(Json(BudgetReset {
        message: "Budget reset".to_string(),
    }))
}
