//! Expense operations
//!
//! Every query is scoped by the owning account id, so a lookup for another
//! account's expense behaves exactly like a lookup for a missing one.

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};
use crate::period::YearMonth;

const EXPENSE_COLUMNS: &str = "id, account_id, amount, category, description, date, created_at";

impl Database {
    /// Insert a new expense for an account
    pub fn insert_expense(&self, account_id: i64, expense: &NewExpense) -> Result<Expense> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (account_id, amount, category, description, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                account_id,
                expense.amount,
                expense.category,
                expense.description,
                expense.date.to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_expense(account_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} after insert", id)))
    }

    /// Get an expense by ID if it belongs to the account
    pub fn get_expense(&self, account_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND account_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, account_id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// List all expenses for an account in insertion order
    pub fn list_expenses(&self, account_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE account_id = ? ORDER BY id",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![account_id], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// List an account's expenses dated within a calendar month
    pub fn list_expenses_in_month(
        &self,
        account_id: i64,
        period: YearMonth,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE account_id = ? AND date >= ? AND date < ? ORDER BY id",
            EXPENSE_COLUMNS
        ))?;

        let start = period.first_day().to_string();
        let end = period.next().first_day().to_string();
        let expenses = stmt
            .query_map(params![account_id, start, end], Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Replace an expense's fields
    ///
    /// Returns false if no expense with this ID belongs to the account.
    pub fn update_expense(&self, account_id: i64, id: i64, expense: &NewExpense) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, description = ?, date = ?
            WHERE id = ? AND account_id = ?
            "#,
            params![
                expense.amount,
                expense.category,
                expense.description,
                expense.date.to_string(),
                id,
                account_id,
            ],
        )?;
        Ok(updated > 0)
    }

    /// Delete an expense
    ///
    /// Returns false if no expense with this ID belongs to the account.
    pub fn delete_expense(&self, account_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND account_id = ?",
            params![id, account_id],
        )?;
        Ok(deleted > 0)
    }

    /// Count all expenses across accounts
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let date_str: String = row.get(5)?;
        let created_at: String = row.get(6)?;

        let date = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Expense {
            id: row.get(0)?,
            account_id: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            date,
            created_at: parse_datetime(6, &created_at)?,
        })
    }
}
