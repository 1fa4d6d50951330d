//! Demo account with four months of realistic spending
//!
//! The generator is seeded with a fixed value so repeated runs on the same
//! day produce the same data.

use chrono::{DateTime, Days, Utc};
use tracing::info;

use crate::auth::hash_password;
use crate::error::{Error, Result};
use crate::models::{Account, NewAccount, NewExpense};
use crate::period::YearMonth;
use crate::repository::Repository;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_SALARY: f64 = 6000.0;
pub const DEMO_SAVINGS: f64 = 14000.0;

/// Days of history generated before today
const HISTORY_DAYS: u64 = 120;

const RNG_SEED: u64 = 0x5EED_DA7A;

struct CategoryPlan {
    name: &'static str,
    items: [&'static str; 5],
    monthly_target: f64,
}

const PLAN: [CategoryPlan; 6] = [
    CategoryPlan {
        name: "Food",
        items: [
            "Grocery shopping",
            "Restaurant dinner",
            "Coffee shop",
            "Lunch at work",
            "Food delivery",
        ],
        monthly_target: 800.0,
    },
    CategoryPlan {
        name: "Transportation",
        items: [
            "Gas refill",
            "Bus ticket",
            "Train pass",
            "Car maintenance",
            "Parking fees",
        ],
        monthly_target: 400.0,
    },
    CategoryPlan {
        name: "Entertainment",
        items: [
            "Movie tickets",
            "Netflix subscription",
            "Concert tickets",
            "Video games",
            "Streaming services",
        ],
        monthly_target: 300.0,
    },
    CategoryPlan {
        name: "Shopping",
        items: [
            "Clothes shopping",
            "Electronics",
            "Home decor",
            "Books",
            "Personal care items",
        ],
        monthly_target: 500.0,
    },
    CategoryPlan {
        name: "Bills",
        items: [
            "Electricity bill",
            "Water bill",
            "Internet service",
            "Phone bill",
            "Insurance payment",
        ],
        monthly_target: 1200.0,
    },
    CategoryPlan {
        name: "Other",
        items: [
            "Healthcare",
            "Gift for friend",
            "Home repairs",
            "Pet supplies",
            "Office supplies",
        ],
        monthly_target: 800.0,
    },
];

/// SplitMix64, enough for demo data
struct DemoRng(u64);

impl DemoRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in [0, len)
    fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    /// Uniform between two bounds in either order
    fn uniform(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.next_f64()
    }
}

/// Per-month totals of the generated data
#[derive(Debug, Clone)]
pub struct SeededMonth {
    pub period: YearMonth,
    /// Totals in plan order, including categories with nothing spent
    pub by_category: Vec<(&'static str, f64)>,
}

impl SeededMonth {
    pub fn total(&self) -> f64 {
        self.by_category.iter().map(|(_, amount)| amount).sum()
    }
}

/// Result of seeding
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub account: Account,
    pub expense_count: usize,
    pub months: Vec<SeededMonth>,
}

/// Create the demo account and its expense history
///
/// Fails with a conflict if the demo email is already registered.
pub fn seed_demo_data<R: Repository + ?Sized>(repo: &R, now: DateTime<Utc>) -> Result<SeedSummary> {
    if repo.get_account_by_email(DEMO_EMAIL)?.is_some() {
        return Err(Error::Conflict(format!(
            "Demo account {} already exists",
            DEMO_EMAIL
        )));
    }

    let mut new = NewAccount::new(DEMO_USERNAME, DEMO_EMAIL, hash_password(DEMO_PASSWORD)?);
    new.monthly_salary = DEMO_SALARY;
    new.current_savings = DEMO_SAVINGS;
    new.last_savings_update = now;
    let account = repo.create_account(&new)?;

    let today = now.date_naive();
    let mut day = today
        .checked_sub_days(Days::new(HISTORY_DAYS))
        .unwrap_or(today);

    let mut rng = DemoRng(RNG_SEED);
    let mut months: Vec<SeededMonth> = Vec::new();
    let mut expense_count = 0;

    while day <= today {
        let period = YearMonth::of(&day);
        if months.last().map(|m| m.period) != Some(period) {
            months.push(SeededMonth {
                period,
                by_category: PLAN.iter().map(|c| (c.name, 0.0)).collect(),
            });
        }
        let Some(month) = months.last_mut() else {
            break;
        };

        let daily_count = 1 + rng.index(4);
        for _ in 0..daily_count {
            let available: Vec<usize> = PLAN
                .iter()
                .enumerate()
                .filter(|(i, plan)| month.by_category[*i].1 < plan.monthly_target)
                .map(|(i, _)| i)
                .collect();
            if available.is_empty() {
                continue;
            }

            let idx = available[rng.index(available.len())];
            let plan = &PLAN[idx];
            let description = plan.items[rng.index(plan.items.len())];

            let remaining = plan.monthly_target - month.by_category[idx].1;
            let low = remaining.min(10.0);
            let high = (remaining * 0.5).min(200.0);
            let amount = ((rng.uniform(low, high) * 100.0).round() / 100.0).max(0.01);

            repo.insert_expense(
                account.id,
                &NewExpense {
                    amount,
                    category: plan.name.to_string(),
                    description: description.to_string(),
                    date: day,
                },
            )?;
            month.by_category[idx].1 += amount;
            expense_count += 1;
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    info!(
        account_id = account.id,
        expenses = expense_count,
        months = months.len(),
        "Seeded demo data"
    );

    Ok(SeedSummary {
        account,
        expense_count,
        months,
    })
}
