//! Insight generator - rule-based spending observations
//!
//! A pure transformation from a month's expenses plus salary and savings to a
//! short report. Each check in [`checks`] is independent and contributes
//! zero or more lines; the [`InsightEngine`] runs them in a fixed order.
//!
//! ## Checks
//!
//! - **Spending ratio** - warns above 90% of income, encourages below 60%
//! - **Emergency fund** - months of income covered by savings
//! - **Top category** - the largest category total
//! - **Category concentration** - any category above 40% of spending
//! - **Frequent days** - days with more than three transactions
//! - **Small expenses** - more than five purchases under $10
//! - **Month-end projection** - only for the running month
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::insights::{AnalysisContext, InsightEngine};
//!
//! let ctx = AnalysisContext::new(&expenses, today)
//!     .with_period(Some(6), Some(2024))
//!     .with_finances(account.monthly_salary, account.current_savings);
//! let report = InsightEngine::new().report(&ctx, true);
//! ```

pub mod checks;
pub mod engine;
pub mod types;

pub use engine::{AnalysisContext, Insight, InsightEngine, InsightReport};
pub use types::{InsightKind, InsightLine, Severity};

/// Returned for an empty expense list, whatever the other inputs
pub const ONBOARDING_MESSAGE: &str = "Start tracking your expenses to receive AI-powered insights!";
