//! Monthly aggregation and savings rollover
//!
//! The free functions work on plain expense slices. [`Ledger`] wraps a
//! [`Repository`] and applies them to an account's stored expenses.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::insights::{AnalysisContext, InsightEngine, InsightLine};
use crate::models::{Account, CategoryTotal, Expense};
use crate::period::{month_name, YearMonth};
use crate::repository::Repository;

/// Expenses dated within a calendar month, in input order
pub fn monthly_expenses(
    expenses: &[Expense],
    period: YearMonth,
) -> impl Iterator<Item = &Expense> + '_ {
    expenses.iter().filter(move |e| period.contains(&e.date))
}

/// Sum of amounts for a calendar month (0 when there are none)
pub fn monthly_total(expenses: &[Expense], period: YearMonth) -> f64 {
    monthly_expenses(expenses, period).map(|e| e.amount).sum()
}

/// Per-category totals in first-encountered order
pub fn category_totals<'a, I>(expenses: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(entry) => {
                entry.total += expense.amount;
                entry.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: expense.category.clone(),
                total: expense.amount,
                count: 1,
            }),
        }
    }
    totals
}

/// Result of a savings rollover attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RolloverOutcome {
    /// Already rolled over this month
    NotDue,
    /// Previous month's surplus was added to savings
    Applied {
        period: YearMonth,
        surplus: f64,
        current_savings: f64,
    },
    /// Previous month had no surplus; timestamp left unchanged so the
    /// check runs again next time
    NoSurplus { period: YearMonth, delta: f64 },
}

/// A selectable month for period pickers
#[derive(Debug, Clone, Serialize)]
pub struct MonthOption {
    pub number: u32,
    pub name: &'static str,
}

/// Everything the dashboard shows for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub expenses: Vec<Expense>,
    pub total_expenses: f64,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub monthly_salary: f64,
    /// Salary minus spending for the real current month
    pub balance: f64,
    pub current_savings: f64,
    pub insights: String,
    pub insight_lines: Vec<InsightLine>,
    pub months: Vec<MonthOption>,
    pub years: Vec<i32>,
}

/// Account-level aggregation over a repository
pub struct Ledger<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> Ledger<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// All of the account's expenses dated within the month
    pub fn monthly_expenses(&self, account: &Account, period: YearMonth) -> Result<Vec<Expense>> {
        self.repo.list_expenses_in_month(account.id, period)
    }

    /// Total spend for the month
    pub fn monthly_total(&self, account: &Account, period: YearMonth) -> Result<f64> {
        Ok(self
            .monthly_expenses(account, period)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    /// Salary minus the current month's spending (may be negative)
    pub fn current_balance(&self, account: &Account, today: NaiveDate) -> Result<f64> {
        let spent = self.monthly_total(account, YearMonth::of(&today))?;
        Ok(account.monthly_salary - spent)
    }

    /// Move last month's surplus into savings, at most once per month
    ///
    /// Runs only when `now` falls in a later calendar month than the last
    /// rollover. A non-positive delta leaves the account untouched, including
    /// its timestamp. On success the account is updated in place and persisted.
    pub fn rollover_savings(
        &self,
        account: &mut Account,
        now: DateTime<Utc>,
    ) -> Result<RolloverOutcome> {
        let current = YearMonth::of(&now);
        if current <= YearMonth::of(&account.last_savings_update) {
            return Ok(RolloverOutcome::NotDue);
        }

        let previous = current.previous();
        let previous_total = self.monthly_total(account, previous)?;
        let delta = account.monthly_salary - previous_total;

        if delta <= 0.0 {
            debug!(
                account_id = account.id,
                period = %previous,
                delta,
                "No surplus to roll into savings"
            );
            return Ok(RolloverOutcome::NoSurplus {
                period: previous,
                delta,
            });
        }

        let new_savings = account.current_savings + delta;
        self.repo
            .record_savings_rollover(account.id, new_savings, now)?;
        account.current_savings = new_savings;
        account.last_savings_update = now;

        info!(
            account_id = account.id,
            period = %previous,
            "Updated savings: +${:.2}",
            delta
        );

        Ok(RolloverOutcome::Applied {
            period: previous,
            surplus: delta,
            current_savings: new_savings,
        })
    }

    /// Build the dashboard summary for a month
    ///
    /// Does not run the rollover; callers do that first so the insight
    /// report sees up-to-date savings.
    pub fn monthly_summary(
        &self,
        account: &Account,
        period: YearMonth,
        today: NaiveDate,
    ) -> Result<MonthlySummary> {
        let expenses = self.monthly_expenses(account, period)?;
        let total_expenses = expenses.iter().map(|e| e.amount).sum();
        let expenses_by_category = category_totals(&expenses);
        let balance = self.current_balance(account, today)?;

        let ctx = AnalysisContext::new(&expenses, today)
            .with_period(Some(period.month), Some(period.year))
            .with_finances(account.monthly_salary, account.current_savings);
        let report = InsightEngine::new().build(&ctx, true);

        Ok(MonthlySummary {
            year: period.year,
            month: period.month,
            month_name: period.name(),
            expenses,
            total_expenses,
            expenses_by_category,
            monthly_salary: account.monthly_salary,
            balance,
            current_savings: account.current_savings,
            insights: report.text,
            insight_lines: report.lines,
            months: (1..=12)
                .filter_map(|m| month_name(m).map(|name| MonthOption { number: m, name }))
                .collect(),
            years: (today.year() - 2..=today.year()).collect(),
        })
    }
}
