//! Repository port - persistence gateway for statement rows

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{DbTransaction, ParsedRow};

/// Persistence gateway for statement rows
///
/// Implementations are shared between tasks, so every method takes `&self`.
/// A bulk add is all-or-nothing: either every row is stored or none is.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Store a single record. Fails with `DuplicateKey` if the id exists.
    async fn add(&self, tx: &DbTransaction) -> Result<()>;

    /// Store a batch of records atomically
    ///
    /// Any duplicate id, inside the batch or against stored rows, fails the
    /// whole batch and leaves the store unchanged.
    async fn add_bulk(&self, txs: &[DbTransaction]) -> Result<()>;

    /// Fetch one record by id. Fails with `NotFound` if the id is unknown.
    async fn get(&self, id: &str) -> Result<DbTransaction>;

    /// Fetch every stored record
    async fn get_all(&self) -> Result<Vec<DbTransaction>>;

    /// Fetch records for one account number
    async fn get_by_account_number(&self, account_number: &str) -> Result<Vec<DbTransaction>>;

    /// Fetch records for one canonical `YYYY-MM-DD` date
    async fn get_by_transaction_date(&self, date: &str) -> Result<Vec<DbTransaction>>;

    /// Replace a stored record. Fails with `NotFound` if the id is unknown.
    async fn update(&self, tx: &DbTransaction) -> Result<()>;

    /// Remove one record. Fails with `NotFound` if the id is unknown.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Remove every record, returning how many were removed
    async fn clear(&self) -> Result<u64>;

    /// Number of stored records
    async fn count(&self) -> Result<u64>;

    /// Convert sanitized rows to their persisted shape and store them as one batch
    async fn add_rows(&self, rows: &[ParsedRow]) -> Result<()> {
        let txs: Vec<DbTransaction> = rows.iter().map(DbTransaction::from).collect();
        self.add_bulk(&txs).await
    }
}
