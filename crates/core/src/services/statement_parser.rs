use crate::models::transaction::{is_iso_date, NewTransaction, TransactionDate, TransactionType};

/// Number of comma-separated fields per statement line.
const FIELD_COUNT: usize = 5;

/// Result of parsing a pasted statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStatement {
    /// Valid lines, in input order
    pub accepted: Vec<NewTransaction>,

    /// One message per rejected line, in input order
    pub errors: Vec<String>,
}

impl ParsedStatement {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parser for the `YYYY-MM-DD,Description,Category,Amount,Type` line format.
///
/// Errors accumulate: a bad line is reported and skipped, parsing continues.
pub struct StatementParser;

impl StatementParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a block of lines.
    ///
    /// The block is trimmed first, so line numbers count from the first
    /// non-blank line. Blank lines inside the block are skipped silently
    /// but still counted.
    pub fn parse(&self, text: &str) -> ParsedStatement {
        let mut parsed = ParsedStatement::default();

        for (index, line) in text.trim().split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Self::parse_line(line, index + 1) {
                Ok(input) => parsed.accepted.push(input),
                Err(message) => parsed.errors.push(message),
            }
        }

        parsed
    }

    /// Checks run in field order; the first failure is the line's only error.
    fn parse_line(line: &str, line_no: usize) -> Result<NewTransaction, String> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[date, description, category, amount, kind] = parts.as_slice() else {
            return Err(format!(
                "Line {line_no}: Incorrect CSV format. Expected {FIELD_COUNT} comma-separated values (Date,Description,Category,Amount,Type)."
            ));
        };

        if !is_iso_date(date) {
            return Err(format!(
                "Line {line_no}: Invalid date format (YYYY-MM-DD). Got: \"{date}\""
            ));
        }
        if description.is_empty() {
            return Err(format!("Line {line_no}: Description is missing."));
        }
        if category.is_empty() {
            return Err(format!("Line {line_no}: Category is missing."));
        }
        let amount_value = match amount.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => {
                return Err(format!(
                    "Line {line_no}: Amount must be a positive number. Got: \"{amount}\""
                ))
            }
        };
        let Some(transaction_type) = TransactionType::from_literal(kind) else {
            return Err(format!(
                "Line {line_no}: Type must be 'income' or 'expense'. Got: \"{kind}\""
            ));
        };

        let date = TransactionDate::parse(date)
            .map_err(|e| format!("Line {line_no}: {e}"))?;

        Ok(NewTransaction::new(
            date,
            description,
            category,
            amount_value,
            transaction_type,
        ))
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}
