//! Report command implementation

use anyhow::Result;
use chrono::Utc;
use spendwise_core::db::Database;
use spendwise_core::{Ledger, MonthlySummary, RolloverOutcome};

use super::{find_account, resolve_period};

/// Print the month's summary for an account, rolling savings over first
pub fn cmd_report(db: &Database, email: &str, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let now = Utc::now();
    let today = now.date_naive();
    let period = resolve_period(year, month, today)?;

    let mut account = find_account(db, email)?;
    let ledger = Ledger::new(db);

    match ledger.rollover_savings(&mut account, now)? {
        RolloverOutcome::Applied {
            period, surplus, ..
        } => {
            db.log_audit(
                &account.email,
                "savings_rollover",
                Some("account"),
                Some(account.id),
                Some(&format!("period={}, surplus={:.2}", period, surplus)),
            )?;
            println!(
                "💰 Rolled ${:.2} left over from {} into savings",
                surplus,
                period.name()
            );
        }
        RolloverOutcome::NoSurplus { .. } | RolloverOutcome::NotDue => {}
    }

    let summary = ledger.monthly_summary(&account, period, today)?;
    print_summary(&account.username, &summary);

    Ok(())
}

fn print_summary(username: &str, summary: &MonthlySummary) {
    println!();
    println!(
        "📊 {} {} for {}",
        summary.month_name, summary.year, username
    );
    println!("   ─────────────────────────────────────────────");
    println!("   Monthly salary:   ${:>10.2}", summary.monthly_salary);
    println!("   Spent:            ${:>10.2}", summary.total_expenses);
    println!("   Balance (now):    ${:>10.2}", summary.balance);
    println!("   Savings:          ${:>10.2}", summary.current_savings);

    if !summary.expenses_by_category.is_empty() {
        println!();
        println!("   By category");
        for cat in &summary.expenses_by_category {
            println!(
                "   {:<18} ${:>10.2}  ({} expenses)",
                cat.category, cat.total, cat.count
            );
        }
    }

    println!();
    println!("💡 Insights");
    for line in summary.insights.lines() {
        println!("   {}", line);
    }
    println!();
}
