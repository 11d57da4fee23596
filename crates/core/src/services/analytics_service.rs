use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::summary::{CategoryTotal, MonthlySummary, Totals};
use crate::models::transaction::{Transaction, TransactionType};

/// Aggregations over arbitrary transaction subsets: totals, category
/// breakdown, month grouping.
///
/// Pure arithmetic over slices; no state.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Income, expense and net. Empty input gives all zeros.
    pub fn totals(&self, transactions: &[Transaction]) -> Totals {
        let mut totals = Totals::default();
        for t in transactions {
            match t.transaction_type {
                TransactionType::Income => totals.income += t.amount,
                TransactionType::Expense => totals.expense += t.amount,
            }
        }
        totals.net = totals.income - totals.expense;
        totals
    }

    /// Expense sums per category, largest first.
    ///
    /// Categories are grouped in order of first appearance and the sort is
    /// stable, so equal values keep that order. Income never contributes,
    /// so a category with only income entries does not appear.
    pub fn category_breakdown(&self, transactions: &[Transaction]) -> Vec<CategoryTotal> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut breakdown: Vec<CategoryTotal> = Vec::new();

        for t in transactions.iter().filter(|t| t.is_expense()) {
            match index.get(t.category.as_str()) {
                Some(&i) => breakdown[i].value += t.amount,
                None => {
                    index.insert(t.category.as_str(), breakdown.len());
                    breakdown.push(CategoryTotal {
                        name: t.category.clone(),
                        value: t.amount,
                    });
                }
            }
        }

        breakdown.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        breakdown
    }

    /// Group by `YYYY-MM`. Order inside a group is the input order.
    pub fn group_by_month(&self, transactions: &[Transaction]) -> HashMap<String, Vec<Transaction>> {
        let mut groups: HashMap<String, Vec<Transaction>> = HashMap::new();
        for t in transactions {
            groups
                .entry(t.date.month_key().to_string())
                .or_default()
                .push(t.clone());
        }
        groups
    }

    /// Month keys newest first. Plain string comparison is enough because
    /// keys are fixed-width, zero-padded `YYYY-MM`.
    pub fn sorted_month_keys(&self, groups: &HashMap<String, Vec<Transaction>>) -> Vec<String> {
        let mut keys: Vec<String> = groups.keys().cloned().collect();
        keys.sort_by(|a, b| b.cmp(a));
        keys
    }

    /// "2024-01" → "January 2024". Keys that are not a valid year-month
    /// come back unchanged.
    pub fn month_label(&self, key: &str) -> String {
        NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|_| key.to_string())
    }

    /// One summary per month, newest month first.
    pub fn monthly_summaries(&self, transactions: &[Transaction]) -> Vec<MonthlySummary> {
        let mut groups = self.group_by_month(transactions);
        let keys = self.sorted_month_keys(&groups);

        keys.into_iter()
            .filter_map(|key| {
                let transactions = groups.remove(&key)?;
                Some(MonthlySummary {
                    label: self.month_label(&key),
                    totals: self.totals(&transactions),
                    key,
                    transactions,
                })
            })
            .collect()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
