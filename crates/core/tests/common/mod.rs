#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::candidate::Candidate;
use finance_tracker_core::models::transaction::{
    NewTransaction, TransactionDate, TransactionType,
};
use finance_tracker_core::providers::traits::{PdfTextExtractor, TransactionExtractor};
use finance_tracker_core::storage::kv::KeyValueStore;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn input(date: &str, description: &str, category: &str, amount: f64, kind: TransactionType) -> NewTransaction {
    NewTransaction::new(
        TransactionDate::parse(date).unwrap(),
        description,
        category,
        amount,
        kind,
    )
}

pub fn expense(date: &str, category: &str, amount: f64) -> NewTransaction {
    input(date, "Test expense", category, amount, TransactionType::Expense)
}

pub fn income(date: &str, category: &str, amount: f64) -> NewTransaction {
    input(date, "Test income", category, amount, TransactionType::Income)
}

// ═══════════════════════════════════════════════════════════════════
// Key-value stores
// ═══════════════════════════════════════════════════════════════════

/// Memory store whose contents stay visible to the test after being boxed.
#[derive(Clone, Default)]
pub struct SharedStore {
    pub entries: Arc<Mutex<std::collections::HashMap<String, String>>>,
    pub writes: Arc<Mutex<usize>>,
}

impl SharedStore {
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.into(), value.into());
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.get_raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        *self.writes.lock().unwrap() += 1;
        self.put_raw(key, value);
        Ok(())
    }
}

/// Store where every operation fails (quota exceeded, unavailable, ...).
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
        Err(CoreError::Storage("storage unavailable".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), CoreError> {
        Err(CoreError::Storage("quota exceeded".into()))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Extractors
// ═══════════════════════════════════════════════════════════════════

/// Returns a fixed candidate list (or error) and records what it was asked.
pub struct MockExtractor {
    response: Result<Vec<Candidate>, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn returning(candidates: Vec<Value>) -> Self {
        Self {
            response: Ok(candidates),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionExtractor for MockExtractor {
    fn name(&self) -> &str {
        "MockExtractor"
    }

    async fn extract(&self, text: &str) -> Result<Vec<Candidate>, CoreError> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.response {
            Ok(candidates) => Ok(candidates.clone()),
            Err(message) => Err(CoreError::Api {
                provider: "MockExtractor".into(),
                message: message.clone(),
            }),
        }
    }
}

/// Treats the PDF bytes as UTF-8 text.
pub struct PlainTextPdf;

impl PdfTextExtractor for PlainTextPdf {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, CoreError> {
        String::from_utf8(pdf_bytes.to_vec()).map_err(|e| CoreError::TextExtraction(e.to_string()))
    }
}

pub struct BrokenPdf;

impl PdfTextExtractor for BrokenPdf {
    fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<String, CoreError> {
        Err(CoreError::FileIO("Invalid PDF structure".into()))
    }
}
