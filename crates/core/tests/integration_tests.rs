// ═══════════════════════════════════════════════════════════════════
// Integration Tests — FinanceTracker facade over a key-value store
// ═══════════════════════════════════════════════════════════════════

mod common;

use serde_json::json;
use std::sync::{Arc, Mutex};

use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::settings::Settings;
use finance_tracker_core::models::transaction::{
    NewTransaction, TransactionDate, TransactionId, TransactionType,
};
use finance_tracker_core::storage::kv::{FileStore, MemoryStore};
use finance_tracker_core::storage::manager::StorageManager;
use finance_tracker_core::{FinanceTracker, ImportReport};

use common::{expense, income, init_tracing, FailingStore, MockExtractor, PlainTextPdf, SharedStore};

const KEY: &str = "financeTrackerTransactions";

fn tracker_with_store() -> (FinanceTracker, SharedStore) {
    let shared = SharedStore::default();
    (FinanceTracker::open(Box::new(shared.clone())), shared)
}

fn persisted(shared: &SharedStore) -> Vec<finance_tracker_core::models::transaction::Transaction> {
    StorageManager::deserialize(&shared.get_raw(KEY).unwrap()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════

mod loading {
    use super::*;

    #[test]
    fn empty_store_starts_empty() {
        let (tracker, shared) = tracker_with_store();
        assert!(tracker.is_empty());
        assert_eq!(tracker.revision(), 0);
        assert_eq!(shared.write_count(), 0);
    }

    #[test]
    fn malformed_store_starts_empty() {
        init_tracing();
        let tracker = FinanceTracker::open(Box::new(MemoryStore::with_entry(KEY, "corrupted")));
        assert!(tracker.is_empty());
    }

    #[test]
    fn unreadable_store_starts_empty() {
        init_tracing();
        let tracker = FinanceTracker::open(Box::new(FailingStore));
        assert!(tracker.is_empty());
    }

    #[test]
    fn loaded_list_is_sorted_newest_first() {
        let payload = r#"[
            {"id":"a","date":"2024-01-01","description":"x","category":"Food","amount":1,"type":"expense"},
            {"id":"b","date":"2024-03-01","description":"y","category":"Food","amount":2,"type":"expense"}
        ]"#;
        let tracker = FinanceTracker::open(Box::new(MemoryStore::with_entry(KEY, payload)));
        assert_eq!(tracker.transactions()[0].id.as_str(), "b");
    }

    #[test]
    fn custom_storage_key() {
        let shared = SharedStore::default();
        let settings = Settings {
            storage_key: "alt".into(),
            ..Settings::default()
        };
        let mut tracker = FinanceTracker::open_with_settings(Box::new(shared.clone()), settings);
        tracker.add_transaction(expense("2024-01-01", "Food", 1.0)).unwrap();
        assert!(shared.get_raw("alt").is_some());
        assert!(shared.get_raw(KEY).is_none());
        assert_eq!(tracker.settings().storage_key, "alt");
    }

    #[test]
    fn reopen_file_store_restores_list() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut tracker = FinanceTracker::open(Box::new(FileStore::new(dir.path())));
            tracker
                .add_transaction(income("2024-05-01", "Salary", 3000.0))
                .unwrap()
                .id
        };
        let reopened = FinanceTracker::open(Box::new(FileStore::new(dir.path())));
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get_transaction(&id).unwrap().amount, 3000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Mutations & persistence
// ═══════════════════════════════════════════════════════════════════

mod mutations {
    use super::*;

    #[test]
    fn add_one_persists_full_list() {
        let (mut tracker, shared) = tracker_with_store();
        tracker.add_transaction(expense("2024-01-01", "Food", 1.0)).unwrap();
        tracker.add_transaction(expense("2024-02-01", "Food", 2.0)).unwrap();
        assert_eq!(shared.write_count(), 2);
        assert_eq!(persisted(&shared), tracker.transactions().to_vec());
        assert_eq!(tracker.transactions()[0].date.as_str(), "2024-02-01");
    }

    #[test]
    fn invalid_add_changes_nothing() {
        let (mut tracker, shared) = tracker_with_store();
        let err = tracker
            .add_transaction(expense("2024-01-01", "  ", 1.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(tracker.is_empty());
        assert_eq!(tracker.revision(), 0);
        assert_eq!(shared.write_count(), 0);
    }

    #[test]
    fn add_many_persists_once() {
        let (mut tracker, shared) = tracker_with_store();
        let added = tracker.add_transactions(vec![
            expense("2024-01-01", "Food", 1.0),
            expense("2024-01-02", "Food", 2.0),
            income("2024-01-03", "Salary", 3.0),
        ]).unwrap();
        assert_eq!(added.len(), 3);
        assert_eq!(shared.write_count(), 1);
        assert_eq!(tracker.revision(), 1);
    }

    #[test]
    fn invalid_batch_changes_nothing() {
        let (mut tracker, shared) = tracker_with_store();
        let bad = NewTransaction::new(
            TransactionDate::parse("2024-01-01").unwrap(),
            "",
            "",
            -5.0,
            TransactionType::Expense,
        );
        let err = tracker
            .add_transactions(vec![expense("2024-01-02", "Food", 1.0), bad])
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(tracker.is_empty());
        assert_eq!(tracker.revision(), 0);
        assert_eq!(shared.write_count(), 0);
    }

    #[test]
    fn add_many_empty_is_noop() {
        let (mut tracker, shared) = tracker_with_store();
        assert!(tracker.add_transactions(Vec::new()).unwrap().is_empty());
        assert_eq!(shared.write_count(), 0);
        assert_eq!(tracker.revision(), 0);
    }

    #[test]
    fn add_then_delete_restores_prior_list() {
        let (mut tracker, shared) = tracker_with_store();
        tracker.add_transactions(vec![
            expense("2024-01-01", "Food", 1.0),
            income("2024-01-10", "Salary", 100.0),
        ]).unwrap();
        let before = tracker.transactions().to_vec();

        let added = tracker.add_transaction(expense("2024-01-05", "Fun", 7.0)).unwrap();
        assert_eq!(tracker.len(), 3);
        tracker.delete_transaction(&added.id);

        assert_eq!(tracker.transactions(), before.as_slice());
        assert_eq!(persisted(&shared), before);
    }

    #[test]
    fn delete_unknown_id_still_persists() {
        let (mut tracker, shared) = tracker_with_store();
        tracker.add_transaction(expense("2024-01-01", "Food", 1.0)).unwrap();
        tracker.delete_transaction(&TransactionId::from("nope"));
        assert_eq!(tracker.len(), 1);
        assert_eq!(shared.write_count(), 2);
    }

    #[test]
    fn write_failure_keeps_memory_ahead() {
        init_tracing();
        let mut tracker = FinanceTracker::open(Box::new(FailingStore));
        let added = tracker.add_transaction(expense("2024-01-01", "Food", 1.0)).unwrap();
        assert_eq!(tracker.len(), 1);
        assert!(tracker.get_transaction(&added.id).is_some());
        assert_eq!(tracker.revision(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Observers
// ═══════════════════════════════════════════════════════════════════

mod observers {
    use super::*;

    #[test]
    fn notified_once_per_mutation() {
        let (mut tracker, _shared) = tracker_with_store();
        let seen: Arc<Mutex<Vec<usize>>> = Arc::default();
        let sink = Arc::clone(&seen);
        tracker.subscribe(move |list| sink.lock().unwrap().push(list.len()));

        tracker.add_transaction(expense("2024-01-01", "Food", 1.0)).unwrap();
        tracker.add_transactions(vec![
            expense("2024-01-02", "Food", 1.0),
            expense("2024-01-03", "Food", 1.0),
        ]).unwrap();
        let first = tracker.transactions()[0].id.clone();
        tracker.delete_transaction(&first);
        let _ = tracker.add_transaction(expense("2024-01-04", "Food", -1.0));

        assert_eq!(*seen.lock().unwrap(), vec![1, 3, 2]);
        assert_eq!(tracker.revision(), 3);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Summaries
// ═══════════════════════════════════════════════════════════════════

mod summaries {
    use super::*;

    #[test]
    fn totals_breakdown_and_months() {
        let (mut tracker, _shared) = tracker_with_store();
        tracker.add_transactions(vec![
            income("2024-02-01", "Salary", 2000.0),
            expense("2024-01-31", "Rent", 900.0),
            expense("2024-01-05", "Food", 100.0),
            expense("2024-02-03", "Food", 50.0),
        ]).unwrap();

        let totals = tracker.totals();
        assert_eq!(totals.income, 2000.0);
        assert_eq!(totals.expense, 1050.0);
        assert_eq!(totals.net, 950.0);

        let breakdown = tracker.category_breakdown();
        assert_eq!(breakdown[0].name, "Rent");
        assert_eq!(breakdown[1].name, "Food");
        assert_eq!(breakdown[1].value, 150.0);

        let groups = tracker.group_by_month();
        assert_eq!(groups["2024-01"].len(), 2);
        assert_eq!(groups["2024-02"].len(), 2);
        // Store order is newest first, so groups are too.
        assert_eq!(groups["2024-02"][0].date.as_str(), "2024-02-03");

        let months = tracker.monthly_summaries();
        assert_eq!(months[0].label, "February 2024");
        assert_eq!(months[1].totals.expense, 1000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Import & export
// ═══════════════════════════════════════════════════════════════════

mod import_export {
    use super::*;

    #[test]
    fn pasted_import_adds_batch() {
        let (mut tracker, shared) = tracker_with_store();
        let report = tracker
            .import_pasted("2023-10-26,Groceries,Food,55.25,expense\n2023-10-27,Pay,Salary,1000,income")
            .unwrap();
        match report {
            ImportReport::Imported(added) => assert_eq!(added.len(), 2),
            other => panic!("expected Imported, got {other:?}"),
        }
        assert_eq!(tracker.transactions()[0].date.as_str(), "2023-10-27");
        assert_eq!(shared.write_count(), 1);
    }

    #[test]
    fn pasted_import_with_bad_line_adds_nothing() {
        let (mut tracker, shared) = tracker_with_store();
        let err = tracker
            .import_pasted("2023-10-26,Groceries,Food,55.25,expense\n2023-10-27,Pay,Salary,-1,income")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error parsing manually entered data:\nLine 2: Amount must be a positive number. Got: \"-1\""
        );
        assert!(tracker.is_empty());
        assert_eq!(shared.write_count(), 0);
    }

    #[test]
    fn pasted_non_ascii_date_keeps_month_keys_clean() {
        let (mut tracker, _shared) = tracker_with_store();
        let err = tracker
            .import_pasted("٢٠٢٤-٠١-٠١,Coffee,Food,3,expense\n2024-01-05,Tea,Food,2,expense")
            .unwrap_err();
        assert!(matches!(err, CoreError::StatementParse(ref lines) if lines[0].starts_with("Line 1: Invalid date")));

        tracker
            .import_pasted("2024-01-05,Tea,Food,2,expense")
            .unwrap();
        let keys: Vec<String> = tracker.monthly_summaries().into_iter().map(|m| m.key).collect();
        assert_eq!(keys, vec!["2024-01".to_string()]);
    }

    #[tokio::test]
    async fn pdf_import_adds_valid_candidates() {
        let (mut tracker, _shared) = tracker_with_store();
        let extractor = MockExtractor::returning(vec![
            json!({"date":"2024-07-15","description":"GROCERY","category":"Groceries","amount":55.25,"type":"expense"}),
            json!({"date":"2024-07-16","description":"REFUND","category":"Refund","amount":-3,"type":"income"}),
            json!({"date":"2024-07-17","description":"PAYMENT","category":"Credit Card Payment","amount":250.0,"type":"income"}),
        ]);
        let report = tracker
            .import_pdf_bytes(b"statement text", &PlainTextPdf, &extractor)
            .await
            .unwrap();
        match report {
            ImportReport::Imported(added) => assert_eq!(added.len(), 2),
            other => panic!("expected Imported, got {other:?}"),
        }
        assert_eq!(tracker.transactions()[0].transaction_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn pdf_import_nothing_found() {
        let (mut tracker, shared) = tracker_with_store();
        let extractor = MockExtractor::returning(vec![]);
        let report = tracker
            .import_pdf_bytes(b"not a statement", &PlainTextPdf, &extractor)
            .await
            .unwrap();
        assert_eq!(report, ImportReport::NothingFound);
        assert_eq!(shared.write_count(), 0);
        assert_eq!(tracker.revision(), 0);
    }

    #[tokio::test]
    async fn pdf_import_failure_is_terminal() {
        let (mut tracker, _shared) = tracker_with_store();
        let extractor = MockExtractor::failing("boom");
        assert!(tracker
            .import_pdf_bytes(b"statement", &PlainTextPdf, &extractor)
            .await
            .is_err());
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn pdf_file_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("july.pdf");
        std::fs::write(&path, "JULY").unwrap();
        let (mut tracker, _shared) = tracker_with_store();
        let extractor = MockExtractor::returning(vec![
            json!({"date":"2024-07-15","description":"GROCERY","category":"Groceries","amount":5,"type":"expense"}),
        ]);
        let report = tracker
            .import_pdf_file(&path, &PlainTextPdf, &extractor)
            .await
            .unwrap();
        assert!(matches!(report, ImportReport::Imported(ref v) if v.len() == 1));
    }

    #[test]
    fn export_month_only_includes_that_month() {
        let (mut tracker, _shared) = tracker_with_store();
        tracker.add_transactions(vec![
            expense("2024-01-05", "Food", 10.0),
            expense("2024-01-20", "Food", 20.0),
            expense("2024-02-01", "Food", 30.0),
        ]).unwrap();
        let csv = tracker.export_month("2024-01").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-01-20"));
        assert!(lines[2].starts_with("2024-01-05"));

        let all = tracker.export_all().unwrap();
        assert_eq!(all.lines().count(), 4);
    }
}
