//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{current_account, today, PeriodQuery};
use crate::{AppError, AppState, AuthUser};
use spendwise_core::insights::{AnalysisContext, InsightEngine, InsightLine};
use spendwise_core::period::YearMonth;

/// Query parameters for reading insights
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// When false the report is empty unless there are no expenses
    #[serde(default)]
    pub generate: bool,
}

/// Insight report for one month
#[derive(Serialize)]
pub struct InsightResponse {
    pub period: YearMonth,
    /// Newline-joined report text
    pub report: String,
    /// Structured form of the same lines
    pub lines: Vec<InsightLine>,
}

fn build_report(
    state: &AppState,
    user: &AuthUser,
    period: YearMonth,
    generate: bool,
) -> Result<InsightResponse, AppError> {
    let account = current_account(state, user)?;
    let expenses = state.db.list_expenses_in_month(account.id, period)?;

    let ctx = AnalysisContext::new(&expenses, today())
        .with_period(Some(period.month), Some(period.year))
        .with_finances(account.monthly_salary, account.current_savings);
    let report = InsightEngine::new().build(&ctx, generate);

    Ok(InsightResponse {
        period,
        report: report.text,
        lines: report.lines,
    })
}

/// GET /api/insights - Insight report for a month
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<InsightQuery>,
) -> Result<Json<InsightResponse>, AppError> {
    let period = PeriodQuery {
        year: params.year,
        month: params.month,
    }
    .resolve(today())?;
    let response = build_report(&state, &user, period, params.generate)?;

    state.db.log_audit(
        &user.email,
        "view",
        Some("insight"),
        None,
        Some(&format!("period={}, generate={}", period, params.generate)),
    )?;

    Ok(Json(response))
}

/// POST /api/insights/generate - Generate the insight report for a month
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(params): Json<PeriodQuery>,
) -> Result<Json<InsightResponse>, AppError> {
    let period = params.resolve(today())?;
    let response = build_report(&state, &user, period, true)?;

    state.db.log_audit(
        &user.email,
        "generate",
        Some("insight"),
        None,
        Some(&format!("period={}, lines={}", period, response.lines.len())),
    )?;
    info!(user = %user.email, period = %period, "Generated insights");

    Ok(Json(response))
}
