use crate::errors::CoreError;
use crate::models::transaction::Transaction;

/// Column headers of exported tables.
pub const EXPORT_HEADERS: [&str; 5] = ["Date", "Description", "Category", "Amount", "Type"];

/// Tabular export of transaction sets.
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Write `transactions` as CSV, one row each, in the order given.
    pub fn write_csv<W: std::io::Write>(
        &self,
        transactions: &[Transaction],
        writer: W,
    ) -> Result<(), CoreError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(EXPORT_HEADERS)?;
        for t in transactions {
            wtr.write_record([
                t.date.as_str(),
                t.description.as_str(),
                t.category.as_str(),
                &t.amount.to_string(),
                t.transaction_type.as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// CSV document as a string.
    pub fn to_csv(&self, transactions: &[Transaction]) -> Result<String, CoreError> {
        let mut buf = Vec::new();
        self.write_csv(transactions, &mut buf)?;
        String::from_utf8(buf).map_err(|e| CoreError::Export(e.to_string()))
    }

    /// Suggested file name for a month export, e.g. `Transactions_2024-01.csv`.
    pub fn month_file_name(&self, month_key: &str) -> String {
        format!("Transactions_{month_key}.csv")
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}
