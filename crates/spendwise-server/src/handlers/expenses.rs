//! Expense handlers
//!
//! Lookups are scoped to the caller's account, so another account's expense
//! is reported as not found.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::info;

use super::{today, PeriodQuery};
use crate::{AppError, AppState, AuthUser, SuccessResponse};
use spendwise_core::models::{Expense, ExpenseInput, DEFAULT_CATEGORIES};
use spendwise_core::period::YearMonth;

/// Expense list with its total
#[derive(Serialize)]
pub struct ExpenseListResponse {
    /// Month the list covers, absent when listing everything
    pub period: Option<YearMonth>,
    pub total: f64,
    pub expenses: Vec<Expense>,
}

/// Suggested categories for the expense form
#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<&'static str>,
}

/// GET /api/categories - List suggested expense categories
///
/// Any non-empty category is accepted on create; these are only suggestions.
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: DEFAULT_CATEGORIES.to_vec(),
    })
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ExpenseInput>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let new = req.validate(today())?;
    let expense = state.db.insert_expense(user.account_id, &new)?;

    state.db.log_audit(
        &user.email,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!(
            "amount={:.2}, category={}, date={}",
            expense.amount, expense.category, expense.date
        )),
    )?;
    info!(user = %user.email, expense_id = expense.id, "Expense added");

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses - List expenses, optionally for one month
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let (period, expenses) = if params.is_set() {
        let period = params.resolve(today())?;
        (
            Some(period),
            state.db.list_expenses_in_month(user.account_id, period)?,
        )
    } else {
        (None, state.db.list_expenses(user.account_id)?)
    };
    let total = expenses.iter().map(|e| e.amount).sum();

    state.db.log_audit(
        &user.email,
        "list",
        Some("expense"),
        None,
        Some(&format!(
            "period={}, count={}",
            period.map(|p| p.to_string()).unwrap_or_else(|| "all".to_string()),
            expenses.len()
        )),
    )?;

    Ok(Json(ExpenseListResponse {
        period,
        total,
        expenses,
    }))
}

/// GET /api/expenses/:id - Get one expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(user.account_id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state
        .db
        .log_audit(&user.email, "view", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Replace an expense's fields
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<ExpenseInput>,
) -> Result<Json<Expense>, AppError> {
    if state.db.get_expense(user.account_id, id)?.is_none() {
        return Err(AppError::not_found("Expense not found"));
    }

    let changes = req.validate(today())?;
    if !state.db.update_expense(user.account_id, id, &changes)? {
        return Err(AppError::not_found("Expense not found"));
    }

    state.db.log_audit(
        &user.email,
        "update",
        Some("expense"),
        Some(id),
        Some(&format!(
            "amount={:.2}, category={}, date={}",
            changes.amount, changes.category, changes.date
        )),
    )?;
    info!(user = %user.email, expense_id = id, "Expense updated");

    let expense = state
        .db
        .get_expense(user.account_id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;
    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_expense(user.account_id, id)? {
        return Err(AppError::not_found("Expense not found"));
    }

    state
        .db
        .log_audit(&user.email, "delete", Some("expense"), Some(id), None)?;
    info!(user = %user.email, expense_id = id, "Expense deleted");

    Ok(Json(SuccessResponse { success: true }))
}
