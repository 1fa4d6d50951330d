//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod account;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod export;
pub mod insights;

// Re-export all handlers for use in router
pub use account::*;
pub use audit::*;
pub use auth::*;
pub use dashboard::*;
pub use expenses::*;
pub use export::*;
pub use insights::*;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use spendwise_core::models::Account;
use spendwise_core::period::{YearMonth, MAX_YEAR, MIN_YEAR};

/// Optional `year`/`month` query parameters, defaulting to the current month
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl PeriodQuery {
    /// Whether either part was given
    pub fn is_set(&self) -> bool {
        self.year.is_some() || self.month.is_some()
    }

    /// Resolve to a calendar month, filling missing parts from `today`
    pub fn resolve(&self, today: NaiveDate) -> Result<YearMonth, AppError> {
        let current = YearMonth::of(&today);
        let year = self.year.unwrap_or(current.year);
        let month = self.month.unwrap_or(current.month);
        if !(1..=12).contains(&month) {
            return Err(AppError::bad_request("Month must be between 1 and 12"));
        }
        YearMonth::new(year, month).ok_or_else(|| {
            AppError::bad_request(&format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR))
        })
    }
}

/// Server-side "today" (UTC)
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Load the caller's account
///
/// A valid token for a deleted account is treated as unauthenticated.
pub(crate) fn current_account(state: &AppState, user: &AuthUser) -> Result<Account, AppError> {
    state
        .db
        .get_account(user.account_id)?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))
}
