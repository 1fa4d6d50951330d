//! Domain models for Spendwise

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Suggested expense categories offered by the UI (the set is open)
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Bills",
    "Other",
];

/// A registered user and their financial context
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub monthly_salary: f64,
    pub current_savings: f64,
    pub last_savings_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Account to be created at registration
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub monthly_salary: f64,
    pub current_savings: f64,
    pub last_savings_update: DateTime<Utc>,
}

impl NewAccount {
    /// A fresh account with zero salary and savings
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            monthly_salary: 0.0,
            current_savings: 0.0,
            last_savings_update: Utc::now(),
        }
    }
}

/// A recorded expense owned by one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub account_id: i64,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Validated expense fields for insert or update
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

/// A numeric form field that may arrive as a JSON number or a decimal string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Parse into a finite number
    pub fn parse(&self, field: &str) -> Result<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::Validation(format!("Invalid {} entered", field)))?,
        };
        if !value.is_finite() {
            return Err(Error::Validation(format!("Invalid {} entered", field)));
        }
        Ok(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Raw expense submission as received from a client
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    pub amount: NumericInput,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// ISO `YYYY-MM-DD`; defaults to today when absent or empty
    #[serde(default)]
    pub date: Option<String>,
}

impl ExpenseInput {
    /// Validate the submission against today's date
    ///
    /// Amount must be a positive number, category non-empty, and the date
    /// (if given) a valid ISO date that is not in the future.
    pub fn validate(&self, today: NaiveDate) -> Result<NewExpense> {
        let amount = self.amount.parse("amount")?;
        if amount <= 0.0 {
            return Err(Error::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::Validation("Category is required".to_string()));
        }

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| Error::Validation("Invalid amount or date format".to_string()))?,
        };
        if date > today {
            return Err(Error::Validation(
                "Cannot add future expenses".to_string(),
            ));
        }

        Ok(NewExpense {
            amount,
            category: category.to_string(),
            description: self.description.trim().to_string(),
            date,
        })
    }
}

/// Raw salary/savings settings submission
#[derive(Debug, Clone, Deserialize)]
pub struct FinancesInput {
    pub monthly_salary: NumericInput,
    pub current_savings: NumericInput,
}

/// Validated salary/savings settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finances {
    pub monthly_salary: f64,
    pub current_savings: f64,
}

impl FinancesInput {
    pub fn validate(&self) -> Result<Finances> {
        let monthly_salary = self.monthly_salary.parse("salary")?;
        if monthly_salary < 0.0 {
            return Err(Error::Validation("Salary cannot be negative".to_string()));
        }
        let current_savings = self.current_savings.parse("savings")?;
        if current_savings < 0.0 {
            return Err(Error::Validation("Savings cannot be negative".to_string()));
        }
        Ok(Finances {
            monthly_salary,
            current_savings,
        })
    }
}

/// Summed spending for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn input(amount: &str, date: Option<&str>) -> ExpenseInput {
        ExpenseInput {
            amount: NumericInput::Text(amount.to_string()),
            category: "Food".to_string(),
            description: " Lunch ".to_string(),
            date: date.map(String::from),
        }
    }

    #[test]
    fn test_expense_input_valid() {
        let expense = input("12.50", Some("2024-06-01")).validate(today()).unwrap();
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_expense_input_defaults_to_today() {
        let expense = input("3", None).validate(today()).unwrap();
        assert_eq!(expense.date, today());

        let expense = input("3", Some("")).validate(today()).unwrap();
        assert_eq!(expense.date, today());
    }

    #[test]
    fn test_expense_input_rejects_non_positive_amount() {
        let err = input("0", None).validate(today()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("greater than 0")));

        assert!(input("-4.00", None).validate(today()).is_err());
    }

    #[test]
    fn test_expense_input_rejects_malformed_amount() {
        let err = input("twelve", None).validate(today()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("amount")));
        assert!(input("NaN", None).validate(today()).is_err());
        assert!(input("inf", None).validate(today()).is_err());
    }

    #[test]
    fn test_expense_input_rejects_bad_or_future_date() {
        assert!(input("5", Some("06/01/2024")).validate(today()).is_err());
        assert!(input("5", Some("2024-02-30")).validate(today()).is_err());

        let err = input("5", Some("2024-06-16")).validate(today()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("future")));
    }

    #[test]
    fn test_expense_input_requires_category() {
        let mut raw = input("5", None);
        raw.category = "   ".to_string();
        assert!(raw.validate(today()).is_err());
    }

    #[test]
    fn test_numeric_input_deserializes_number_or_string() {
        let raw: ExpenseInput =
            serde_json::from_str(r#"{"amount": 9.99, "category": "Food"}"#).unwrap();
        assert_eq!(raw.amount.parse("amount").unwrap(), 9.99);
        assert_eq!(raw.description, "");

        let raw: ExpenseInput =
            serde_json::from_str(r#"{"amount": "9.99", "category": "Food"}"#).unwrap();
        assert_eq!(raw.amount.parse("amount").unwrap(), 9.99);
    }

    #[test]
    fn test_finances_input_rejects_negative() {
        let ok = FinancesInput {
            monthly_salary: 6000.0.into(),
            current_savings: 0.0.into(),
        };
        assert_eq!(ok.validate().unwrap().monthly_salary, 6000.0);

        let bad_salary = FinancesInput {
            monthly_salary: (-1.0).into(),
            current_savings: 0.0.into(),
        };
        assert!(bad_salary.validate().is_err());

        let bad_savings = FinancesInput {
            monthly_salary: 100.0.into(),
            current_savings: NumericInput::Text("-5".to_string()),
        };
        assert!(bad_savings.validate().is_err());
    }

    #[test]
    fn test_account_hides_password_hash() {
        let account = Account {
            id: 1,
            username: "demo".to_string(),
            email: "demo@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            monthly_salary: 0.0,
            current_savings: 0.0,
            last_savings_update: Utc::now(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "demo@example.com");
    }
}
