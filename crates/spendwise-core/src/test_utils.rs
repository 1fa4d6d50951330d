//! Test utilities for spendwise-core
//!
//! Fixtures shared by unit tests here and by the server and CLI test suites.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::auth::hash_password;
use crate::models::{Account, Expense, NewAccount, NewExpense};
use crate::repository::Repository;

/// Password used for every fixture account
pub const TEST_PASSWORD: &str = "secret123";

/// Shorthand for a calendar date
///
/// # Panics
/// Panics on an invalid date; only meant for literals in tests.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Noon UTC on a calendar date
pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid test timestamp")
}

/// Build expense fields
pub fn new_expense(amount: f64, category: &str, date: NaiveDate) -> NewExpense {
    NewExpense {
        amount,
        category: category.to_string(),
        description: format!("{} expense", category),
        date,
    }
}

/// Create an account with [`TEST_PASSWORD`] and the given finances
pub fn create_account<R: Repository + ?Sized>(
    repo: &R,
    email: &str,
    monthly_salary: f64,
    current_savings: f64,
    last_savings_update: DateTime<Utc>,
) -> Account {
    let username = email.split('@').next().unwrap_or(email);
    let mut new = NewAccount::new(
        username,
        email,
        hash_password(TEST_PASSWORD).expect("hash test password"),
    );
    new.monthly_salary = monthly_salary;
    new.current_savings = current_savings;
    new.last_savings_update = last_savings_update;
    repo.create_account(&new).expect("create test account")
}

/// Insert an expense for an account
pub fn add_expense<R: Repository + ?Sized>(
    repo: &R,
    account_id: i64,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Expense {
    repo.insert_expense(account_id, &new_expense(amount, category, date))
        .expect("insert test expense")
}
