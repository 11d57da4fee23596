use serde_json::Value;
use tracing::warn;

use super::transaction::{is_iso_date, NewTransaction, TransactionDate, TransactionType};

/// An unvalidated, transaction-shaped record returned by an extractor.
pub type Candidate = Value;

/// Validate one candidate against the import rules.
///
/// - `date`: string in `YYYY-MM-DD` shape
/// - `description`, `category`: non-blank strings
/// - `amount`: JSON number, finite and strictly positive
/// - `type`: exactly `"income"` or `"expense"`
pub fn validate_candidate(candidate: &Candidate) -> Option<NewTransaction> {
    let date = candidate.get("date")?.as_str()?;
    if !is_iso_date(date) {
        return None;
    }
    let description = candidate.get("description")?.as_str()?;
    let category = candidate.get("category")?.as_str()?;
    let amount = candidate.get("amount")?.as_f64()?;
    if amount.is_nan() || amount <= 0.0 {
        return None;
    }
    let transaction_type = TransactionType::from_literal(candidate.get("type")?.as_str()?)?;

    let input = NewTransaction {
        date: TransactionDate::parse(date).ok()?,
        description: description.to_string(),
        category: category.to_string(),
        amount,
        transaction_type,
    };
    input.validate().ok()?;
    Some(input)
}

/// Keep the candidates that pass validation, in order. Rejects are logged
/// and dropped; they are never reported individually to the caller.
pub fn validate_candidates(candidates: &[Candidate]) -> Vec<NewTransaction> {
    candidates
        .iter()
        .filter_map(|c| {
            let validated = validate_candidate(c);
            if validated.is_none() {
                warn!(candidate = %c, "Skipping invalid transaction candidate");
            }
            validated
        })
        .collect()
}
