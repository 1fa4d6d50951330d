//! Core command implementations and shared utilities

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendwise_core::db::Database;
use spendwise_core::models::Account;
use spendwise_core::YearMonth;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up an account by email or fail with a hint
pub fn find_account(db: &Database, email: &str) -> Result<Account> {
    db.get_account_by_email(email)?.with_context(|| {
        format!(
            "No account registered for {}. Run 'spendwise users' to list accounts.",
            email
        )
    })
}

/// Pick the month from --year/--month, filling gaps from today
pub fn resolve_period(year: Option<i32>, month: Option<u32>, today: NaiveDate) -> Result<YearMonth> {
    let current = YearMonth::of(&today);
    let year = year.unwrap_or(current.year);
    let month = month.unwrap_or(current.month);
    YearMonth::new(year, month)
        .with_context(|| {
            format!("Invalid period {}-{} (month 1-12, year 1-9999)", year, month)
        })
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    // Opening runs the migrations
    let db = open_db(db_path, no_encrypt)?;
    let accounts = db.list_accounts()?.len();
    println!("   Schema ready ({} existing users)", accounts);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Try the demo data: spendwise seed");
    println!("  2. Start web UI: SPENDWISE_SESSION_SECRET=... spendwise serve");

    Ok(())
}
