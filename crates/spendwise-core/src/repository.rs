//! Storage interface for accounts and expenses
//!
//! The ledger and the web layer talk to storage only through [`Repository`].
//! [`Database`] is the persistent implementation; [`MemoryRepository`] keeps
//! everything in process and is used for tests and throwaway sessions.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Account, Expense, Finances, NewAccount, NewExpense};
use crate::period::YearMonth;

/// Create/read/update/delete by id for accounts and their expenses
///
/// Ids are allocated by the implementation. Expense operations are always
/// scoped by the owning account id.
pub trait Repository: Send + Sync {
    fn create_account(&self, new: &NewAccount) -> Result<Account>;

    fn get_account(&self, id: i64) -> Result<Option<Account>>;

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    fn update_account_finances(&self, id: i64, finances: &Finances) -> Result<bool>;

    fn record_savings_rollover(
        &self,
        id: i64,
        current_savings: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    fn insert_expense(&self, account_id: i64, expense: &NewExpense) -> Result<Expense>;

    fn get_expense(&self, account_id: i64, id: i64) -> Result<Option<Expense>>;

    /// All of an account's expenses in insertion order
    fn list_expenses(&self, account_id: i64) -> Result<Vec<Expense>>;

    /// An account's expenses dated within a month, in insertion order
    fn list_expenses_in_month(&self, account_id: i64, period: YearMonth) -> Result<Vec<Expense>> {
        Ok(self
            .list_expenses(account_id)?
            .into_iter()
            .filter(|e| period.contains(&e.date))
            .collect())
    }

    fn update_expense(&self, account_id: i64, id: i64, expense: &NewExpense) -> Result<bool>;

    fn delete_expense(&self, account_id: i64, id: i64) -> Result<bool>;
}

impl Repository for Database {
    fn create_account(&self, new: &NewAccount) -> Result<Account> {
        Database::create_account(self, new)
    }

    fn get_account(&self, id: i64) -> Result<Option<Account>> {
        Database::get_account(self, id)
    }

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Database::get_account_by_email(self, email)
    }

    fn update_account_finances(&self, id: i64, finances: &Finances) -> Result<bool> {
        Database::update_account_finances(self, id, finances)
    }

    fn record_savings_rollover(
        &self,
        id: i64,
        current_savings: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        Database::record_savings_rollover(self, id, current_savings, updated_at)
    }

    fn insert_expense(&self, account_id: i64, expense: &NewExpense) -> Result<Expense> {
        Database::insert_expense(self, account_id, expense)
    }

    fn get_expense(&self, account_id: i64, id: i64) -> Result<Option<Expense>> {
        Database::get_expense(self, account_id, id)
    }

    fn list_expenses(&self, account_id: i64) -> Result<Vec<Expense>> {
        Database::list_expenses(self, account_id)
    }

    fn list_expenses_in_month(&self, account_id: i64, period: YearMonth) -> Result<Vec<Expense>> {
        Database::list_expenses_in_month(self, account_id, period)
    }

    fn update_expense(&self, account_id: i64, id: i64, expense: &NewExpense) -> Result<bool> {
        Database::update_expense(self, account_id, id, expense)
    }

    fn delete_expense(&self, account_id: i64, id: i64) -> Result<bool> {
        Database::delete_expense(self, account_id, id)
    }
}

#[derive(Default)]
struct MemoryState {
    accounts: Vec<Account>,
    expenses: Vec<Expense>,
    next_account_id: i64,
    next_expense_id: i64,
}

/// In-process repository backed by vectors
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Repository for MemoryRepository {
    fn create_account(&self, new: &NewAccount) -> Result<Account> {
        let mut state = self.write();
        if state.accounts.iter().any(|a| a.email == new.email) {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        state.next_account_id += 1;
        let account = Account {
            id: state.next_account_id,
            username: new.username.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            monthly_salary: new.monthly_salary,
            current_savings: new.current_savings,
            last_savings_update: new.last_savings_update,
            created_at: Utc::now(),
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    fn get_account(&self, id: i64) -> Result<Option<Account>> {
        Ok(self.read().accounts.iter().find(|a| a.id == id).cloned())
    }

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .read()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    fn update_account_finances(&self, id: i64, finances: &Finances) -> Result<bool> {
        let mut state = self.write();
        match state.accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.monthly_salary = finances.monthly_salary;
                account.current_savings = finances.current_savings;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn record_savings_rollover(
        &self,
        id: i64,
        current_savings: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut state = self.write();
        match state.accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.current_savings = current_savings;
                account.last_savings_update = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn insert_expense(&self, account_id: i64, expense: &NewExpense) -> Result<Expense> {
        let mut state = self.write();
        if !state.accounts.iter().any(|a| a.id == account_id) {
            return Err(Error::NotFound(format!("Account {}", account_id)));
        }

        state.next_expense_id += 1;
        let record = Expense {
            id: state.next_expense_id,
            account_id,
            amount: expense.amount,
            category: expense.category.clone(),
            description: expense.description.clone(),
            date: expense.date,
            created_at: Utc::now(),
        };
        state.expenses.push(record.clone());
        Ok(record)
    }

    fn get_expense(&self, account_id: i64, id: i64) -> Result<Option<Expense>> {
        Ok(self
            .read()
            .expenses
            .iter()
            .find(|e| e.id == id && e.account_id == account_id)
            .cloned())
    }

    fn list_expenses(&self, account_id: i64) -> Result<Vec<Expense>> {
        Ok(self
            .read()
            .expenses
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect())
    }

    fn update_expense(&self, account_id: i64, id: i64, expense: &NewExpense) -> Result<bool> {
        let mut state = self.write();
        match state
            .expenses
            .iter_mut()
            .find(|e| e.id == id && e.account_id == account_id)
        {
            Some(record) => {
                record.amount = expense.amount;
                record.category = expense.category.clone();
                record.description = expense.description.clone();
                record.date = expense.date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_expense(&self, account_id: i64, id: i64) -> Result<bool> {
        let mut state = self.write();
        let before = state.expenses.len();
        state
            .expenses
            .retain(|e| !(e.id == id && e.account_id == account_id));
        Ok(state.expenses.len() < before)
    }
}
