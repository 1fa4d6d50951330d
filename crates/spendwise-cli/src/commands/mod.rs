//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, find_account, resolve_period)
//! - `export` - CSV export of an account's expenses
//! - `reports` - Monthly summary with insights
//! - `seed` - Demo account generation
//! - `serve` - Web server command
//! - `status` - Users listing and database reset

pub mod core;
pub mod export;
pub mod reports;
pub mod seed;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use reports::*;
pub use seed::*;
pub use serve::*;
pub use status::*;
