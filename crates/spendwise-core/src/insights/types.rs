//! Core types for the insight generator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which check produced an insight line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Spending as a share of monthly income
    SpendingRatio,
    /// Months of income covered by savings
    EmergencyFund,
    /// Category with the largest total
    TopCategory,
    /// A category taking more than 40% of spending
    CategoryConcentration,
    /// Days of the month with many transactions
    FrequentDays,
    /// Many purchases under $10
    SmallExpenses,
    /// Projected month-end balance for the running month
    MonthEndProjection,
    /// Nothing else fired
    Reasonable,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::SpendingRatio => "spending_ratio",
            InsightKind::EmergencyFund => "emergency_fund",
            InsightKind::TopCategory => "top_category",
            InsightKind::CategoryConcentration => "category_concentration",
            InsightKind::FrequentDays => "frequent_days",
            InsightKind::SmallExpenses => "small_expenses",
            InsightKind::MonthEndProjection => "month_end_projection",
            InsightKind::Reasonable => "reasonable",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of an insight line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Encouragement or plain information
    Info,
    /// Worth a look
    Attention,
    /// Spending is outrunning income
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One textual observation about spending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightLine {
    pub kind: InsightKind,
    pub severity: Severity,
    /// Leading emoji shown before the message
    pub marker: &'static str,
    pub message: String,
}

impl InsightLine {
    pub fn new(
        kind: InsightKind,
        severity: Severity,
        marker: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            marker,
            message: message.into(),
        }
    }
}

impl fmt::Display for InsightLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker, self.message)
    }
}
