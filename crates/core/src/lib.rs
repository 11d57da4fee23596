pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;

use models::{
    settings::Settings,
    summary::{CategoryTotal, MonthlySummary, Totals},
    transaction::{NewTransaction, Transaction, TransactionId},
};
use providers::traits::{PdfTextExtractor, TransactionExtractor};
use services::{
    analytics_service::AnalyticsService,
    export_service::ExportService,
    import_service::{ImportOutcome, ImportService},
    transaction_service::TransactionService,
};
use storage::{kv::KeyValueStore, manager::StorageManager};
use tracing::info;

use errors::CoreError;

/// Callback invoked with the full list after every completed mutation.
pub type ChangeObserver = Box<dyn FnMut(&[Transaction]) + Send>;

/// Result of applying an import to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportReport {
    /// The stored transactions, with their new ids.
    Imported(Vec<Transaction>),
    /// The source held no transactions; nothing was stored.
    NothingFound,
}

/// Main entry point for the Finance Tracker core library.
/// Owns the transaction list and keeps persistence in step with it.
///
/// Every mutation re-sorts the list (newest date first), writes the whole
/// list back to storage, then notifies observers once.
#[must_use]
pub struct FinanceTracker {
    transactions: Vec<Transaction>,
    storage: StorageManager,
    settings: Settings,
    transaction_service: TransactionService,
    analytics_service: AnalyticsService,
    import_service: ImportService,
    export_service: ExportService,
    observers: Vec<ChangeObserver>,
    /// Number of completed mutations since construction.
    revision: u64,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("transactions", &self.transactions.len())
            .field("storage_key", &self.settings.storage_key)
            .field("observers", &self.observers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl FinanceTracker {
    /// Open the tracker over a key-value store with default settings.
    /// The persisted list is read once, here.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        Self::open_with_settings(store, Settings::default())
    }

    pub fn open_with_settings(store: Box<dyn KeyValueStore>, settings: Settings) -> Self {
        let storage = StorageManager::new(store, settings.storage_key.clone());
        let mut transactions = storage.load_all();
        // Payloads written elsewhere may not be sorted.
        TransactionService::sort_newest_first(&mut transactions);
        info!(count = transactions.len(), "Finance tracker opened");

        Self {
            transactions,
            storage,
            settings,
            transaction_service: TransactionService::new(),
            analytics_service: AnalyticsService::new(),
            import_service: ImportService::new(),
            export_service: ExportService::new(),
            observers: Vec::new(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a callback fired once after each completed mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&[Transaction]) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Count of completed mutations. Increases by exactly one per change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Transaction Management ──────────────────────────────────────

    /// Add one hand-entered transaction. Invalid input changes nothing.
    pub fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction, CoreError> {
        let added = self
            .transaction_service
            .add_one(&mut self.transactions, input)?;
        self.commit();
        Ok(added)
    }

    /// Add a batch with a single sort, save and notification.
    /// An empty batch is a no-op; any invalid input changes nothing.
    pub fn add_transactions(
        &mut self,
        inputs: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, CoreError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let added = self
            .transaction_service
            .add_many(&mut self.transactions, inputs)?;
        self.commit();
        Ok(added)
    }

    /// Remove a transaction by id. Unknown ids are ignored.
    pub fn delete_transaction(&mut self, id: &TransactionId) {
        if !self
            .transaction_service
            .delete_by_id(&mut self.transactions, id)
        {
            info!(%id, "Delete requested for unknown transaction");
        }
        self.commit();
    }

    /// All transactions, newest date first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[must_use]
    pub fn get_transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    // ── Summaries ───────────────────────────────────────────────────

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.analytics_service.totals(&self.transactions)
    }

    #[must_use]
    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        self.analytics_service.category_breakdown(&self.transactions)
    }

    #[must_use]
    pub fn group_by_month(&self) -> HashMap<String, Vec<Transaction>> {
        self.analytics_service.group_by_month(&self.transactions)
    }

    #[must_use]
    pub fn monthly_summaries(&self) -> Vec<MonthlySummary> {
        self.analytics_service.monthly_summaries(&self.transactions)
    }

    // ── Import ──────────────────────────────────────────────────────

    /// Import pasted CSV-style lines. Any bad line rejects the whole batch.
    pub fn import_pasted(&mut self, text: &str) -> Result<ImportReport, CoreError> {
        let outcome = self.import_service.import_pasted(text)?;
        self.apply_import(outcome)
    }

    /// Import a PDF statement through text extraction and the AI extractor.
    pub async fn import_pdf_bytes(
        &mut self,
        pdf_bytes: &[u8],
        pdf: &dyn PdfTextExtractor,
        extractor: &dyn TransactionExtractor,
    ) -> Result<ImportReport, CoreError> {
        let outcome = self
            .import_service
            .import_pdf_bytes(pdf_bytes, pdf, extractor)
            .await?;
        self.apply_import(outcome)
    }

    /// Read a PDF statement from disk and import it (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn import_pdf_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
        pdf: &dyn PdfTextExtractor,
        extractor: &dyn TransactionExtractor,
    ) -> Result<ImportReport, CoreError> {
        let outcome = self
            .import_service
            .import_pdf_file(path, pdf, extractor)
            .await?;
        self.apply_import(outcome)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// CSV of one month (`YYYY-MM`), newest first. Empty months give just the header.
    pub fn export_month(&self, month_key: &str) -> Result<String, CoreError> {
        let month: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.date.month_key() == month_key)
            .cloned()
            .collect();
        self.export_service.to_csv(&month)
    }

    /// CSV of every transaction, newest first.
    pub fn export_all(&self) -> Result<String, CoreError> {
        self.export_service.to_csv(&self.transactions)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn apply_import(&mut self, outcome: ImportOutcome) -> Result<ImportReport, CoreError> {
        match outcome {
            ImportOutcome::Ready(inputs) => Ok(ImportReport::Imported(self.add_transactions(inputs)?)),
            ImportOutcome::NothingFound => Ok(ImportReport::NothingFound),
        }
    }

    /// Persist, bump the revision, notify. Called once per mutation.
    fn commit(&mut self) {
        self.storage.save_all(&self.transactions);
        self.revision += 1;
        for observer in &mut self.observers {
            observer(&self.transactions);
        }
    }
}
