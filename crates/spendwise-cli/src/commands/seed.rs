//! Demo data command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use spendwise_core::db::Database;
use spendwise_core::seed::{DEMO_EMAIL, DEMO_PASSWORD};
use spendwise_core::seed_demo_data;

pub fn cmd_seed(db: &Database) -> Result<()> {
    println!("🌱 Creating demo account...");

    let summary = seed_demo_data(db, Utc::now()).context("Failed to seed demo data")?;

    println!(
        "   Added {} expenses across {} months",
        summary.expense_count,
        summary.months.len()
    );

    for month in &summary.months {
        println!();
        println!("   {} {}", month.period.name(), month.period.year);
        for (category, amount) in &month.by_category {
            println!("      {:<16} ${:>9.2}", category, amount);
        }
        println!("      {:<16} ${:>9.2}", "Total", month.total());
    }

    println!();
    println!("✅ Demo data ready!");
    println!("   Email: {}", DEMO_EMAIL);
    println!("   Password: {}", DEMO_PASSWORD);

    Ok(())
}
