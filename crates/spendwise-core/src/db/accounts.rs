//! Account operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Account, Finances, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, monthly_salary, \
     current_savings, last_savings_update, created_at";

impl Database {
    /// Create a new account, rejecting duplicate emails
    pub fn create_account(&self, new: &NewAccount) -> Result<Account> {
        if self.get_account_by_email(&new.email)?.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO accounts (username, email, password_hash, monthly_salary,
                                  current_savings, last_savings_update)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                new.username,
                new.email,
                new.password_hash,
                new.monthly_salary,
                new.current_savings,
                format_datetime(&new.last_savings_update),
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_account(id)?
            .ok_or_else(|| Error::NotFound(format!("Account {} after insert", id)))
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
                params![id],
                Self::row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    /// Find an account by email (exact match)
    pub fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!("SELECT {} FROM accounts WHERE email = ?", ACCOUNT_COLUMNS),
                params![email],
                Self::row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    /// List all accounts
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts ORDER BY id",
            ACCOUNT_COLUMNS
        ))?;

        let accounts = stmt
            .query_map([], Self::row_to_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    /// Update an account's salary and savings
    ///
    /// Returns false if the account does not exist.
    pub fn update_account_finances(&self, id: i64, finances: &Finances) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET monthly_salary = ?, current_savings = ? WHERE id = ?",
            params![finances.monthly_salary, finances.current_savings, id],
        )?;
        Ok(updated > 0)
    }

    /// Persist the result of a savings rollover
    pub fn record_savings_rollover(
        &self,
        id: i64,
        current_savings: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET current_savings = ?, last_savings_update = ? WHERE id = ?",
            params![current_savings, format_datetime(&updated_at), id],
        )?;
        Ok(updated > 0)
    }

    fn row_to_account(row: &rusqlite::Row) -> rusqlite::Result<Account> {
        let last_update: String = row.get(6)?;
        let created_at: String = row.get(7)?;

        Ok(Account {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            monthly_salary: row.get(4)?,
            current_savings: row.get(5)?,
            last_savings_update: parse_datetime(6, &last_update)?,
            created_at: parse_datetime(7, &created_at)?,
        })
    }
}
