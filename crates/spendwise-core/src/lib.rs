//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise expense tracker:
//! - Database access and migrations (SQLCipher, pooled)
//! - Repository interface with database and in-memory backends
//! - Monthly aggregation and savings rollover
//! - Rule-based insight generator
//! - Account registration and password hashing
//! - CSV export and demo data

pub mod auth;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod period;
pub mod repository;
pub mod seed;

/// Test fixtures for accounts and expenses
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use auth::{authenticate, hash_password, register_account, verify_password, Registration};
pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use export::{export_expenses_csv, write_expenses_csv, ExportOptions};
pub use insights::{
    AnalysisContext, InsightEngine, InsightKind, InsightLine, InsightReport, Severity,
};
pub use ledger::{Ledger, MonthlySummary, RolloverOutcome};
pub use period::{month_name, YearMonth};
pub use repository::{MemoryRepository, Repository};
pub use seed::{seed_demo_data, SeedSummary};
