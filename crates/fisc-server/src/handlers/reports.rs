//! Report handlers
//!
//! Thin HTTP wrappers over the pure projections in `fisc_core::stats`: fetch
//! the caller's transactions for the requested period, then reduce.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use fisc_core::db::TransactionFilter;
use fisc_core::models::TransactionType;
use fisc_core::month::MonthKey;
use fisc_core::stats::{self, CategorySummary, Totals};

/// Maximum number of categories a breakdown may return
const MAX_CATEGORY_LIMIT: usize = 100;

/// Resolve a period into a half-open `[start, end)` date window
///
/// `month` wins over from/to. Explicit from/to are inclusive calendar dates
/// and must be given together. No parameters means no date filter.
pub(crate) fn resolve_range(
    month: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<(NaiveDate, NaiveDate)>, AppError> {
    if let Some(month) = month {
        let key: MonthKey = month
            .parse()
            .map_err(|e: fisc_core::Error| AppError::bad_request(&e.to_string()))?;
        return Ok(Some(key.window()));
    }

    match (from, to) {
        (Some(from), Some(to)) => {
            let start = NaiveDate::parse_from_str(from, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("Invalid from date format (use YYYY-MM-DD)"))?;
            let to = NaiveDate::parse_from_str(to, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("Invalid to date format (use YYYY-MM-DD)"))?;
            if to < start {
                return Err(AppError::bad_request("to must not be before from"));
            }
            let end = to
                .succ_opt()
                .ok_or_else(|| AppError::bad_request("to date is out of range"))?;
            Ok(Some((start, end)))
        }
        (None, None) => Ok(None),
        _ => Err(AppError::bad_request(
            "from and to must be provided together",
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportPeriodQuery {
    /// Month key (YYYY-MM); takes precedence over from/to
    pub month: Option<String>,
    /// Custom start date (YYYY-MM-DD, inclusive)
    pub from: Option<String>,
    /// Custom end date (YYYY-MM-DD, inclusive)
    pub to: Option<String>,
}

/// GET /api/reports/summary - Income/expense totals for a period
pub async fn report_summary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ReportPeriodQuery>,
) -> Result<Json<Totals>, AppError> {
    let mut filter = TransactionFilter::default();
    if let Some((start, end)) = resolve_range(
        params.month.as_deref(),
        params.from.as_deref(),
        params.to.as_deref(),
    )? {
        filter = filter.date_range(start, end);
    }

    let transactions = state.db.list_transactions(auth.id, &filter)?;
    Ok(Json(stats::totals(&transactions)))
}

#[derive(Debug, Deserialize)]
pub struct ReportCategoriesQuery {
    /// Transaction type to rank (default: expense)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Number of categories to return (default: 5)
    pub limit: Option<usize>,
    pub month: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/reports/categories - Ranked category breakdown for a period
pub async fn report_categories(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ReportCategoriesQuery>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let kind: TransactionType = params
        .kind
        .as_deref()
        .unwrap_or("expense")
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;
    let limit = params.limit.unwrap_or(5).clamp(1, MAX_CATEGORY_LIMIT);

    let mut filter = TransactionFilter::default().kind(kind);
    if let Some((start, end)) = resolve_range(
        params.month.as_deref(),
        params.from.as_deref(),
        params.to.as_deref(),
    )? {
        filter = filter.date_range(start, end);
    }

    let transactions = state.db.list_transactions(auth.id, &filter)?;
    Ok(Json(stats::category_breakdown(&transactions, kind, limit)))
}
