//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use fisc_core::models::{Budget, BudgetStatus};
use fisc_core::month::MonthKey;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetBudgetRequest {
    /// Month key (YYYY-MM)
    pub month: String,
    pub limit: f64,
}

/// POST /api/budgets - Set or update the budget for a month
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SetBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let month: MonthKey = req
        .month
        .parse()
        .map_err(|e: fisc_core::Error| AppError::bad_request(&e.to_string()))?;
    if !req.limit.is_finite() || req.limit <= 0.0 {
        return Err(AppError::bad_request("Limit must be a positive number"));
    }

    let budget = state.db.set_budget(auth.id, month, req.limit)?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /api/budgets/:month - Budget with refreshed spent total and alert
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(month): Path<String>,
) -> Result<Json<BudgetStatus>, AppError> {
    let month: MonthKey = month
        .parse()
        .map_err(|e: fisc_core::Error| AppError::bad_request(&e.to_string()))?;

    let status = state.db.get_budget_status(auth.id, month)?;
    Ok(Json(status))
}
