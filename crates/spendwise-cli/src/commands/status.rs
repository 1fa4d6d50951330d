//! Users listing and database reset

use std::path::Path;

use anyhow::{Context, Result};
use spendwise_core::db::Database;

use super::open_db;

pub fn cmd_users(db: &Database) -> Result<()> {
    let accounts = db.list_accounts()?;

    if accounts.is_empty() {
        println!("No users registered. Create the demo account with:");
        println!("  spendwise seed");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────");

    for account in accounts {
        println!(
            "   #{} {} <{}>  salary ${:.2}, savings ${:.2}",
            account.id,
            account.username,
            account.email,
            account.monthly_salary,
            account.current_savings
        );
    }

    Ok(())
}

/// Reset the database (soft or hard)
pub fn cmd_reset(db_path: &Path, soft: bool, yes: bool, no_encrypt: bool) -> Result<()> {
    use std::fs;
    use std::io::{self, Write};

    if soft {
        if !db_path.exists() {
            anyhow::bail!("Database not found: {}", db_path.display());
        }

        if !yes {
            print!("⚠️  This will delete all expenses and the audit log.\n");
            print!("   User accounts and their settings will be preserved.\n\n");
            print!("Are you sure? [y/N] ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let db = open_db(db_path, no_encrypt)?;
        db.soft_reset()?;

        println!("✅ Database soft reset complete.");
        println!("   Cleared: expenses, audit log");
        println!("   Preserved: accounts");
    } else {
        if !yes {
            print!("⚠️  This will DELETE the entire database and start fresh.\n");
            print!("   All users and expenses will be lost.\n\n");
            print!("Are you sure? [y/N] ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        }

        if db_path.exists() {
            fs::remove_file(db_path)
                .with_context(|| format!("Failed to delete database: {}", db_path.display()))?;
            for suffix in ["-wal", "-shm", "-journal"] {
                let mut sidecar = db_path.as_os_str().to_owned();
                sidecar.push(suffix);
                let _ = fs::remove_file(sidecar);
            }
        }

        super::cmd_init(db_path, no_encrypt)?;

        println!("\n✅ Database hard reset complete.");
    }

    Ok(())
}
