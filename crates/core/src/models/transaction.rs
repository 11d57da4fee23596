use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::errors::CoreError;

/// Category suggestions offered when entering a transaction by hand.
/// Categories are free text; nothing enforces this list.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Groceries",
    "Transportation",
    "Utilities",
    "Dining Out",
    "Shopping",
    "Travel",
    "Health",
    "Entertainment",
    "Services",
    "Credit Card Payment",
    "Salary",
    "Investment",
    "Refund",
    "Other",
];

fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("invalid date regex"))
}

/// Check the `YYYY-MM-DD` shape with ASCII digits only. Calendar validity
/// is not checked: `2024-13-45` passes.
pub fn is_iso_date(s: &str) -> bool {
    date_shape().is_match(s)
}

/// Direction of cash flow. Amounts are always positive; this carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Parse the exact literal `income` or `expense`.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque transaction identifier.
///
/// New ids are UUID v4 strings. Any string is accepted on load so lists
/// written with older id schemes still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO `YYYY-MM-DD` date kept as text.
///
/// Ordering is plain string ordering, which matches chronological order
/// because every component is zero-padded and fixed width. Deserializing
/// applies the same shape check as [`TransactionDate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionDate(String);

impl TransactionDate {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if is_iso_date(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(CoreError::ValidationError(format!(
                "Invalid date format (YYYY-MM-DD). Got: \"{s}\""
            )))
        }
    }

    /// `YYYY-MM` grouping key (first 7 characters).
    pub fn month_key(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TransactionDate {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TransactionDate> for String {
    fn from(date: TransactionDate) -> Self {
        date.0
    }
}

impl From<chrono::NaiveDate> for TransactionDate {
    fn from(date: chrono::NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl std::fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transaction that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: TransactionDate,
    pub description: String,
    pub category: String,
    /// Always positive
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    pub fn new(
        date: TransactionDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            amount,
            transaction_type,
        }
    }

    /// Rules for a single hand-entered transaction.
    /// Any failure blocks the submission entirely.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.description.trim().is_empty() || self.category.trim().is_empty() {
            return Err(CoreError::ValidationError("All fields are required.".into()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CoreError::ValidationError(
                "Amount must be a positive number.".into(),
            ));
        }
        Ok(())
    }

    /// Attach a freshly generated id.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            date: self.date,
            description: self.description,
            category: self.category,
            amount: self.amount,
            transaction_type: self.transaction_type,
        }
    }
}

/// A single recorded income or expense event.
///
/// Serialized as `{id, date, description, category, amount, type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: TransactionDate,
    pub description: String,
    pub category: String,
    /// Always positive; direction lives in `transaction_type`
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}
