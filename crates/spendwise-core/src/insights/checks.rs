//! Built-in insight checks
//!
//! Each check looks at one aspect of the selected expenses and either stays
//! silent or emits its own lines. Checks never depend on each other.

use std::collections::BTreeMap;

use chrono::Datelike;

use super::engine::{AnalysisContext, Insight};
use super::types::{InsightKind, InsightLine, Severity};
use crate::models::CategoryTotal;
use crate::period::YearMonth;

/// Spending ratio above which a warning is shown
const HIGH_SPENDING_PCT: f64 = 90.0;
/// Spending ratio below which the user is encouraged
const LOW_SPENDING_PCT: f64 = 60.0;
/// Suggested long-term savings share of income
const SAVINGS_TARGET_SHARE: f64 = 0.3;

const EMERGENCY_FUND_MIN_MONTHS: f64 = 3.0;
const EMERGENCY_FUND_MAX_MONTHS: f64 = 6.0;

const CONCENTRATION_PCT: f64 = 40.0;

/// A day-of-month with more than this many transactions counts as busy
const BUSY_DAY_TRANSACTIONS: usize = 3;

const SMALL_EXPENSE_LIMIT: f64 = 10.0;
const SMALL_EXPENSE_MIN_COUNT: usize = 5;

/// Compares spending to monthly income
pub struct SpendingRatioCheck;

impl Insight for SpendingRatioCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::SpendingRatio
    }

    fn name(&self) -> &'static str {
        "Spending ratio"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        if ctx.monthly_salary <= 0.0 {
            return vec![];
        }

        let ratio = ctx.total_spending / ctx.monthly_salary * 100.0;
        let remaining = ctx.monthly_salary - ctx.total_spending;

        if ratio > HIGH_SPENDING_PCT {
            vec![InsightLine::new(
                self.kind(),
                Severity::Warning,
                "⚠️",
                format!(
                    "You've spent {:.1}% of your monthly income in {}. \
                     Consider reducing expenses to maintain your savings goals.",
                    ratio,
                    ctx.month_label()
                ),
            )]
        } else if ratio < LOW_SPENDING_PCT {
            let target = ctx.monthly_salary * SAVINGS_TARGET_SHARE;
            vec![InsightLine::new(
                self.kind(),
                Severity::Info,
                "🎯",
                format!(
                    "Great job! You're on track to save ${:.2} this month. \
                     Consider setting aside ${:.2} (30% of your income) for long-term savings.",
                    remaining, target
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// How many months of income the savings would cover
pub struct EmergencyFundCheck;

impl Insight for EmergencyFundCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::EmergencyFund
    }

    fn name(&self) -> &'static str {
        "Emergency fund"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        if ctx.current_savings <= 0.0 {
            return vec![];
        }

        let months = if ctx.monthly_salary > 0.0 {
            ctx.current_savings / ctx.monthly_salary
        } else {
            0.0
        };

        if months < EMERGENCY_FUND_MIN_MONTHS {
            vec![InsightLine::new(
                self.kind(),
                Severity::Attention,
                "💰",
                format!(
                    "Your current savings (${:.2}) could cover {:.1} months of expenses. \
                     Aim to build a 3-6 month emergency fund.",
                    ctx.current_savings, months
                ),
            )]
        } else if months > EMERGENCY_FUND_MAX_MONTHS {
            vec![InsightLine::new(
                self.kind(),
                Severity::Info,
                "🌟",
                format!(
                    "Excellent! Your savings (${:.2}) could cover {:.1} months of expenses. \
                     Consider investing any additional savings for long-term growth.",
                    ctx.current_savings, months
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// Names the category with the largest total
///
/// Ties go to the category encountered first.
pub struct TopCategoryCheck;

impl Insight for TopCategoryCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::TopCategory
    }

    fn name(&self) -> &'static str {
        "Top category"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        let top = ctx
            .category_totals
            .iter()
            .fold(None, |best: Option<&CategoryTotal>, entry| match best {
                Some(b) if b.total >= entry.total => Some(b),
                _ => Some(entry),
            });

        top.map(|entry| {
            InsightLine::new(
                self.kind(),
                Severity::Info,
                "📊",
                format!(
                    "Your highest spending category in {} is {} (${:.2}).",
                    ctx.month_label(),
                    entry.category,
                    entry.total
                ),
            )
        })
        .into_iter()
        .collect()
    }
}

/// Flags every category above 40% of spending
pub struct CategoryConcentrationCheck;

impl Insight for CategoryConcentrationCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::CategoryConcentration
    }

    fn name(&self) -> &'static str {
        "Category concentration"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        if ctx.total_spending <= 0.0 {
            return vec![];
        }

        ctx.category_totals
            .iter()
            .filter_map(|entry| {
                let pct = entry.total / ctx.total_spending * 100.0;
                (pct > CONCENTRATION_PCT).then(|| {
                    InsightLine::new(
                        self.kind(),
                        Severity::Attention,
                        "⚖️",
                        format!(
                            "You spent {:.1}% of your budget on {}. \
                             Consider diversifying your expenses.",
                            pct, entry.category
                        ),
                    )
                })
            })
            .collect()
    }
}

/// Counts days of the month with more than three transactions
///
/// Days are grouped by day-of-month only, so the 5th of two different
/// months share a bucket.
pub struct FrequentDaysCheck;

impl Insight for FrequentDaysCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::FrequentDays
    }

    fn name(&self) -> &'static str {
        "Frequent transaction days"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        let mut per_day: BTreeMap<u32, usize> = BTreeMap::new();
        for expense in ctx.expenses {
            *per_day.entry(expense.date.day()).or_default() += 1;
        }

        let busy_days = per_day
            .values()
            .filter(|&&count| count > BUSY_DAY_TRANSACTIONS)
            .count();
        if busy_days == 0 {
            return vec![];
        }

        vec![InsightLine::new(
            self.kind(),
            Severity::Attention,
            "📅",
            format!(
                "You had multiple transactions on {} days this month. \
                 Consider consolidating purchases to reduce impulse spending.",
                busy_days
            ),
        )]
    }
}

/// Reports many purchases under $10
pub struct SmallExpensesCheck;

impl Insight for SmallExpensesCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::SmallExpenses
    }

    fn name(&self) -> &'static str {
        "Small expenses"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        let (count, total) = ctx
            .expenses
            .iter()
            .filter(|e| e.amount < SMALL_EXPENSE_LIMIT)
            .fold((0usize, 0.0), |(n, sum), e| (n + 1, sum + e.amount));

        if count <= SMALL_EXPENSE_MIN_COUNT {
            return vec![];
        }

        vec![InsightLine::new(
            self.kind(),
            Severity::Attention,
            "🔍",
            format!(
                "You had {} small expenses (<$10) totaling ${:.2}. \
                 These small purchases can add up quickly!",
                count, total
            ),
        )]
    }
}

/// Projects month-end savings from the daily average so far
///
/// Only applies when the selected period is the real current month and at
/// least one day remains.
pub struct MonthEndProjectionCheck;

impl Insight for MonthEndProjectionCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::MonthEndProjection
    }

    fn name(&self) -> &'static str {
        "Month-end projection"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        let (Some(month), Some(year)) = (ctx.selected_month, ctx.selected_year) else {
            return vec![];
        };
        let Some(selected) = YearMonth::new(year, month) else {
            return vec![];
        };
        if selected != YearMonth::of(&ctx.today) {
            return vec![];
        }

        let days_in_month = selected.days_in_month();
        let day = ctx.today.day();
        if days_in_month <= day {
            return vec![];
        }

        let daily_average = ctx.total_spending / f64::from(day);
        let projected_total = daily_average * f64::from(days_in_month);
        let projected_savings = ctx.monthly_salary - projected_total;

        let line = if projected_savings > 0.0 {
            InsightLine::new(
                self.kind(),
                Severity::Info,
                "📈",
                format!(
                    "At your current rate, you might save ${:.2} by the end of {}!",
                    projected_savings,
                    ctx.month_label()
                ),
            )
        } else {
            InsightLine::new(
                self.kind(),
                Severity::Warning,
                "📉",
                format!(
                    "At your current spending rate, you might exceed your monthly income \
                     by ${:.2} by the end of {}.",
                    -projected_savings,
                    ctx.month_label()
                ),
            )
        };
        vec![line]
    }
}
