//! CSV export of an account's expenses

use std::io::Write;

use crate::error::{Error, Result};
use crate::models::Expense;
use crate::period::YearMonth;
use crate::repository::Repository;

/// Options for expense export
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Restrict to a single calendar month
    pub period: Option<YearMonth>,
}

/// Write expenses as CSV with a `date,category,description,amount` header
///
/// Returns the number of rows written.
pub fn write_expenses_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "category", "description", "amount"])?;

    for expense in expenses {
        wtr.write_record([
            expense.date.to_string().as_str(),
            expense.category.as_str(),
            expense.description.as_str(),
            format!("{:.2}", expense.amount).as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(expenses.len())
}

/// Export an account's expenses to a CSV string
pub fn export_expenses_csv<R: Repository + ?Sized>(
    repo: &R,
    account_id: i64,
    opts: &ExportOptions,
) -> Result<String> {
    let expenses = match opts.period {
        Some(period) => repo.list_expenses_in_month(account_id, period)?,
        None => repo.list_expenses(account_id)?,
    };

    let mut buf = Vec::new();
    write_expenses_csv(&mut buf, &expenses)?;

    String::from_utf8(buf).map_err(|e| Error::Validation(format!("Export is not UTF-8: {}", e)))
}
