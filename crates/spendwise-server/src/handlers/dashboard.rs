//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use super::{current_account, today, PeriodQuery};
use crate::{AppError, AppState, AuthUser};
use spendwise_core::ledger::{Ledger, MonthlySummary, RolloverOutcome};

/// GET /api/dashboard - Monthly summary with insights
///
/// Applies any pending savings rollover first so savings figures are current.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let today = today();
    let period = params.resolve(today)?;
    let mut account = current_account(&state, &user)?;

    let ledger = Ledger::new(&state.db);
    if let RolloverOutcome::Applied {
        period: rolled,
        surplus,
        ..
    } = ledger.rollover_savings(&mut account, Utc::now())?
    {
        state.db.log_audit(
            &user.email,
            "savings_rollover",
            Some("account"),
            Some(account.id),
            Some(&format!("period={}, surplus={:.2}", rolled, surplus)),
        )?;
    }

    let summary = ledger.monthly_summary(&account, period, today)?;

    state.db.log_audit(
        &user.email,
        "view",
        Some("dashboard"),
        None,
        Some(&format!(
            "period={}, expenses={}",
            period,
            summary.expenses.len()
        )),
    )?;

    Ok(Json(summary))
}
