use crate::errors::CoreError;
use crate::models::transaction::{NewTransaction, Transaction, TransactionId};

/// Mutations of the transaction list, keeping it sorted newest date first.
///
/// Pure business logic — no I/O. Persistence is the caller's job.
pub struct TransactionService;

impl TransactionService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a single hand-entered transaction, give it an id, insert it.
    pub fn add_one(
        &self,
        transactions: &mut Vec<Transaction>,
        input: NewTransaction,
    ) -> Result<Transaction, CoreError> {
        input.validate()?;
        let transaction = input.into_transaction();
        transactions.push(transaction.clone());
        Self::sort_newest_first(transactions);
        Ok(transaction)
    }

    /// Insert a batch with one sort at the end.
    /// Every input is validated first; one bad input rejects the whole batch.
    pub fn add_many(
        &self,
        transactions: &mut Vec<Transaction>,
        inputs: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, CoreError> {
        inputs.iter().try_for_each(NewTransaction::validate)?;
        let added: Vec<Transaction> = inputs
            .into_iter()
            .map(NewTransaction::into_transaction)
            .collect();
        transactions.extend(added.iter().cloned());
        Self::sort_newest_first(transactions);
        Ok(added)
    }

    /// Remove the transaction with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete_by_id(&self, transactions: &mut Vec<Transaction>, id: &TransactionId) -> bool {
        let before = transactions.len();
        transactions.retain(|t| &t.id != id);
        transactions.len() != before
    }

    /// Stable sort by date descending: equal dates keep their current order.
    pub fn sort_newest_first(transactions: &mut [Transaction]) {
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
    }
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new()
    }
}
