use tracing::{debug, error};

use crate::errors::CoreError;
use crate::models::transaction::Transaction;

use super::kv::KeyValueStore;

/// High-level storage operations: load/save the whole transaction list
/// as one JSON array under a single key.
///
/// Persistence never fails loudly. Read problems degrade to an empty list;
/// write problems leave the in-memory list ahead of storage until the next
/// successful save. Both are logged.
pub struct StorageManager {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl StorageManager {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Serialize a transaction list to its JSON wire form.
    pub fn serialize(transactions: &[Transaction]) -> Result<String, CoreError> {
        serde_json::to_string(transactions)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize transactions: {e}")))
    }

    /// Parse the JSON wire form back into a transaction list.
    pub fn deserialize(payload: &str) -> Result<Vec<Transaction>, CoreError> {
        serde_json::from_str(payload).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize transactions: {e}"))
        })
    }

    /// Read the persisted list. Missing key or malformed payload ⇒ empty list.
    pub fn load_all(&self) -> Vec<Transaction> {
        match self.try_load() {
            Ok(transactions) => {
                debug!(count = transactions.len(), key = %self.key, "Loaded transactions");
                transactions
            }
            Err(e) => {
                error!(error = %e, key = %self.key, "Error loading transactions from storage");
                Vec::new()
            }
        }
    }

    /// Persist the full list, replacing whatever was stored.
    pub fn save_all(&mut self, transactions: &[Transaction]) {
        if let Err(e) = self.try_save(transactions) {
            error!(error = %e, key = %self.key, "Error saving transactions to storage");
        }
    }

    fn try_load(&self) -> Result<Vec<Transaction>, CoreError> {
        match self.store.get(&self.key)? {
            Some(payload) => Self::deserialize(&payload),
            None => Ok(Vec::new()),
        }
    }

    fn try_save(&mut self, transactions: &[Transaction]) -> Result<(), CoreError> {
        let payload = Self::serialize(transactions)?;
        self.store.set(&self.key, &payload)?;
        debug!(count = transactions.len(), key = %self.key, "Saved transactions");
        Ok(())
    }
}
