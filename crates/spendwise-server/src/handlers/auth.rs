//! Registration, login and session handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::current_account;
use crate::session::issue_token;
use crate::{AppError, AppState, AuthUser, SuccessResponse};
use spendwise_core::auth::{authenticate, register_account, Registration};
use spendwise_core::models::Account;

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token plus the account it belongs to
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub account: Account,
}

/// Response for the health check
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Liveness check (no auth)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/auth/register - Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<Registration>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let account = register_account(&state.db, &form)?;
    let token = issue_token(&state.config, &account)?;

    state.db.log_audit(
        &account.email,
        "register",
        Some("account"),
        Some(account.id),
        None,
    )?;
    info!(user = %account.email, "New user registered");

    Ok((StatusCode::CREATED, Json(SessionResponse { token, account })))
}

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("Please fill in all fields"));
    }

    let Some(account) = authenticate(&state.db, &req.email, &req.password)? else {
        warn!(user = %req.email.trim(), "Failed login attempt");
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    let token = issue_token(&state.config, &account)?;
    state
        .db
        .log_audit(&account.email, "login", Some("account"), Some(account.id), None)?;
    info!(user = %account.email, "User logged in");

    Ok(Json(SessionResponse { token, account }))
}

/// POST /api/auth/logout - Acknowledge logout (the client drops its token)
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .db
        .log_audit(&user.email, "logout", Some("account"), Some(user.account_id), None)?;
    info!(user = %user.email, "User logged out");

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/me - The authenticated account
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Account>, AppError> {
    let account = current_account(&state, &user)?;
    Ok(Json(account))
}
