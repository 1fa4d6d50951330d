//! Account settings handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;

use super::current_account;
use crate::{AppError, AppState, AuthUser};
use spendwise_core::models::{Account, FinancesInput};

/// PUT /api/account/finances - Update monthly salary and current savings
pub async fn update_finances(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FinancesInput>,
) -> Result<Json<Account>, AppError> {
    let finances = req.validate()?;

    if !state.db.update_account_finances(user.account_id, &finances)? {
        return Err(AppError::unauthorized("Account no longer exists"));
    }

    state.db.log_audit(
        &user.email,
        "update",
        Some("account"),
        Some(user.account_id),
        Some(&format!(
            "monthly_salary={:.2}, current_savings={:.2}",
            finances.monthly_salary, finances.current_savings
        )),
    )?;
    info!(user = %user.email, "Financial info updated");

    Ok(Json(current_account(&state, &user)?))
}
