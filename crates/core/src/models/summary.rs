use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Income, expense and net over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of income amounts
    pub income: f64,

    /// Sum of expense amounts
    pub expense: f64,

    /// income - expense
    pub net: f64,
}

/// Summed expenses of one category (a pie-chart slice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

/// One calendar month of transactions with its totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub key: String,

    /// Display label, e.g. "January 2024"
    pub label: String,

    pub totals: Totals,

    /// In the order they had in the source list (newest first for the store)
    pub transactions: Vec<Transaction>,
}
