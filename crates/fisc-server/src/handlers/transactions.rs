//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::reports::resolve_range;
use crate::{AppError, AppState, AuthUser, SuccessResponse};
use fisc_core::db::TransactionFilter;
use fisc_core::models::{NewTransaction, Transaction, TransactionType, TransactionUpdate};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub wallet: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// POST /api/transactions - Add a transaction
pub async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<AddTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    if !req.amount.is_finite() || req.amount < 0.0 {
        return Err(AppError::bad_request("Amount must be non-negative"));
    }
    if req.category.trim().is_empty() {
        return Err(AppError::bad_request("Category is required"));
    }
    if req.wallet.trim().is_empty() {
        return Err(AppError::bad_request("Wallet is required"));
    }

    let tx = state.db.insert_transaction(
        auth.id,
        &NewTransaction {
            kind: req.kind,
            amount: req.amount,
            category: req.category.trim().to_string(),
            wallet: req.wallet.trim().to_string(),
            date: req.date,
            note: req.note,
        },
    )?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Month key (YYYY-MM); takes precedence over from/to
    pub month: Option<String>,
    /// Custom start date (YYYY-MM-DD, inclusive)
    pub from: Option<String>,
    /// Custom end date (YYYY-MM-DD, inclusive)
    pub to: Option<String>,
    /// Filter by transaction type
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/transactions - List the caller's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let mut filter = TransactionFilter::default();

    if let Some((start, end)) = resolve_range(
        params.month.as_deref(),
        params.from.as_deref(),
        params.to.as_deref(),
    )? {
        filter = filter.date_range(start, end);
    }

    if let Some(ref kind) = params.kind {
        let kind: TransactionType = kind
            .parse()
            .map_err(|e: String| AppError::bad_request(&e))?;
        filter = filter.kind(kind);
    }

    let transactions = state.db.list_transactions(auth.id, &filter)?;
    Ok(Json(transactions))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub wallet: Option<String>,
    pub date: Option<NaiveDate>,
    /// Absent = keep, null = clear, string = replace
    #[serde(default, deserialize_with = "double_option")]
    pub note: Option<Option<String>>,
}

/// Distinguish a missing field (outer None) from an explicit null (Some(None))
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// PUT /api/transactions/:id - Update an owned transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let existing = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    if existing.user_id != auth.id {
        return Err(AppError::unauthorized("Not authorized"));
    }

    if let Some(amount) = req.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::bad_request("Amount must be non-negative"));
        }
    }

    let updated = state.db.update_transaction(
        id,
        &TransactionUpdate {
            kind: req.kind,
            amount: req.amount,
            category: req.category,
            wallet: req.wallet,
            date: req.date,
            note: req.note,
        },
    )?;

    Ok(Json(updated))
}

/// DELETE /api/transactions/:id - Delete an owned transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let existing = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    if existing.user_id != auth.id {
        return Err(AppError::unauthorized("Not authorized"));
    }

    state.db.delete_transaction(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
