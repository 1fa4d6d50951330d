//! CSV export handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response},
    Extension,
};
use tracing::info;

use super::{today, PeriodQuery};
use crate::{AppError, AppState, AuthUser};
use spendwise_core::export::{export_expenses_csv, ExportOptions};

/// GET /api/expenses/export - Download the caller's expenses as CSV
///
/// With `year` or `month` only that month is exported.
pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Response<Body>, AppError> {
    let period = if params.is_set() {
        Some(params.resolve(today())?)
    } else {
        None
    };

    let csv = export_expenses_csv(&state.db, user.account_id, &ExportOptions { period })?;
    let rows = csv.lines().count().saturating_sub(1);

    state.db.log_audit(
        &user.email,
        "export",
        Some("expense"),
        None,
        Some(&format!("rows={}", rows)),
    )?;
    info!(user = %user.email, rows, "Exported expenses");

    let filename = match period {
        Some(p) => format!("expenses-{}-{:02}.csv", p.year, p.month),
        None => "expenses.csv".to_string(),
    };

    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(csv))
        .map_err(|_| AppError::internal("Failed to build response"))
}
