//! Export command implementation

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use spendwise_core::db::Database;
use spendwise_core::{export_expenses_csv, ExportOptions, YearMonth};

use super::find_account;

pub fn cmd_export(
    db: &Database,
    email: &str,
    output: Option<PathBuf>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let period = match (year, month) {
        (Some(year), Some(month)) => Some(
            YearMonth::new(year, month)
                .with_context(|| {
                    format!("Invalid period {}-{} (month 1-12, year 1-9999)", year, month)
                })?,
        ),
        _ => None,
    };

    let account = find_account(db, email)?;
    let csv = export_expenses_csv(db, account.id, &ExportOptions { period })?;

    db.log_audit(
        &account.email,
        "export",
        Some("expense"),
        None,
        Some(&format!(
            "source=cli, period={}",
            period.map(|p| p.to_string()).unwrap_or_else(|| "all".to_string())
        )),
    )?;

    match output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(csv.as_bytes())?;

            let rows = csv.lines().count().saturating_sub(1);
            println!("✅ Exported {} expenses to {}", rows, path.display());
        }
        None => {
            print!("{}", csv);
        }
    }

    Ok(())
}
