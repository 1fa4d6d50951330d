//! Insight engine - runs the registered checks and renders the report

use chrono::NaiveDate;

use crate::ledger::category_totals;
use crate::models::{CategoryTotal, Expense};
use crate::period::month_name;

use super::checks::{
    CategoryConcentrationCheck, EmergencyFundCheck, FrequentDaysCheck, MonthEndProjectionCheck,
    SmallExpensesCheck, SpendingRatioCheck, TopCategoryCheck,
};
use super::types::{InsightKind, InsightLine, Severity};
use super::ONBOARDING_MESSAGE;

/// Label used when no month is selected
const CURRENT_MONTH_LABEL: &str = "current month";

/// Inputs shared by every check
///
/// Totals are computed once on construction.
pub struct AnalysisContext<'a> {
    pub expenses: &'a [Expense],
    pub selected_month: Option<u32>,
    pub selected_year: Option<i32>,
    pub monthly_salary: f64,
    pub current_savings: f64,
    /// The real current date, used for the month-end projection
    pub today: NaiveDate,
    pub total_spending: f64,
    /// Per-category totals in first-encountered order
    pub category_totals: Vec<CategoryTotal>,
}

impl<'a> AnalysisContext<'a> {
    /// Create a context with no period selected and zero salary/savings
    pub fn new(expenses: &'a [Expense], today: NaiveDate) -> Self {
        Self {
            expenses,
            selected_month: None,
            selected_year: None,
            monthly_salary: 0.0,
            current_savings: 0.0,
            today,
            total_spending: expenses.iter().map(|e| e.amount).sum(),
            category_totals: category_totals(expenses),
        }
    }

    pub fn with_period(mut self, month: Option<u32>, year: Option<i32>) -> Self {
        self.selected_month = month;
        self.selected_year = year;
        self
    }

    pub fn with_finances(mut self, monthly_salary: f64, current_savings: f64) -> Self {
        self.monthly_salary = monthly_salary;
        self.current_savings = current_savings;
        self
    }

    /// Display name of the selected month, or "current month"
    pub fn month_label(&self) -> &'static str {
        self.selected_month
            .and_then(month_name)
            .unwrap_or(CURRENT_MONTH_LABEL)
    }
}

/// Rendered report text together with the lines it was built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightReport {
    /// Newline-joined report, or the onboarding prompt
    pub text: String,
    pub lines: Vec<InsightLine>,
}

/// A single independent check over the analysis context
pub trait Insight: Send + Sync {
    /// Kind of line this check produces
    fn kind(&self) -> InsightKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce zero or more lines
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine>;
}

/// Runs checks in registration order
pub struct InsightEngine {
    insights: Vec<Box<dyn Insight>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in checks in report order
    pub fn new() -> Self {
        let mut engine = Self { insights: vec![] };

        engine.register(Box::new(SpendingRatioCheck));
        engine.register(Box::new(EmergencyFundCheck));
        engine.register(Box::new(TopCategoryCheck));
        engine.register(Box::new(CategoryConcentrationCheck));
        engine.register(Box::new(FrequentDaysCheck));
        engine.register(Box::new(SmallExpensesCheck));
        engine.register(Box::new(MonthEndProjectionCheck));

        engine
    }

    /// Register a check, appended after existing ones
    pub fn register(&mut self, insight: Box<dyn Insight>) {
        self.insights.push(insight);
    }

    /// Run every check and collect lines, with a fallback if none fired
    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<InsightLine> {
        let mut lines = vec![];

        for insight in &self.insights {
            let found = insight.analyze(ctx);
            tracing::debug!(
                insight = insight.name(),
                kind = insight.kind().as_str(),
                count = found.len(),
                "Insight check complete"
            );
            lines.extend(found);
        }

        if lines.is_empty() {
            lines.push(InsightLine::new(
                InsightKind::Reasonable,
                Severity::Info,
                "✨",
                format!(
                    "Your spending patterns in {} look reasonable. Keep up the good work!",
                    ctx.month_label()
                ),
            ));
        }

        lines
    }

    /// Run the checks once and render the report
    ///
    /// An empty expense list always yields the onboarding prompt with no
    /// lines. Otherwise `generate = false` yields an empty report.
    pub fn build(&self, ctx: &AnalysisContext<'_>, generate: bool) -> InsightReport {
        if ctx.expenses.is_empty() {
            return InsightReport {
                text: ONBOARDING_MESSAGE.to_string(),
                lines: vec![],
            };
        }
        if !generate {
            return InsightReport::default();
        }

        let lines = self.analyze(ctx);
        let text = lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        InsightReport { text, lines }
    }

    /// Render the newline-joined report text
    pub fn report(&self, ctx: &AnalysisContext<'_>, generate: bool) -> String {
        self.build(ctx, generate).text
    }

    /// Kinds of the registered checks, in order
    pub fn insight_kinds(&self) -> Vec<InsightKind> {
        self.insights.iter().map(|i| i.kind()).collect()
    }
}
