//! DuckDB repository implementation

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::domain::DbTransaction;
use crate::ports::TransactionRepository;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const SELECT_COLUMNS: &str = "SELECT id, account_type, account_number, transaction_date,
        cheque_number, description1, description2, cad_amount, usd_amount
     FROM transactions";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Check if a DuckDB error is a primary-key violation
fn is_duplicate_key_error(err: &duckdb::Error) -> bool {
    let lower = err.to_string().to_lowercase();
    lower.contains("duplicate key") || lower.contains("primary key")
}

/// DuckDB-backed statement store
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff while another process holds the
    /// file lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[cashflow] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.map(Error::from).unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {MAX_RETRIES} retries"))
        }))
    }

    /// In-memory store with the schema applied
    pub fn in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let repository = Self {
            conn: Mutex::new(Connection::open_in_memory_with_flags(config)?),
            db_path: None,
        };
        repository.ensure_schema()?;
        Ok(repository)
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Extension autoloading stays off: nothing here needs one, and cached
        // extensions may fail code-signing checks on macOS.
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {e}")))
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run pending migrations and report what was applied
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn)
            .run_pending()
            .map_err(|e| Error::database(e.to_string()))
    }

    /// Ensure the schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Number of applied schema migrations, not counting the bookkeeping table
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.conn()?;
        let applied = MigrationService::new(&conn)
            .get_applied()
            .map_err(|e| Error::database(e.to_string()))?;
        Ok(applied
            .iter()
            .filter(|name| name.as_str() != "000_migrations.sql")
            .count() as u32)
    }

    // === Transaction operations ===

    pub fn insert_transaction(&self, tx: &DbTransaction) -> Result<()> {
        let conn = self.conn()?;
        Self::insert_row(&conn, tx)
    }

    /// Insert a batch inside one database transaction
    ///
    /// Nothing is written unless every row is inserted.
    pub fn insert_transactions(&self, txs: &[DbTransaction]) -> Result<()> {
        let mut seen = HashSet::with_capacity(txs.len());
        if let Some(dup) = txs.iter().find(|tx| !seen.insert(tx.id.as_str())) {
            return Err(Error::DuplicateKey(dup.id.clone()));
        }

        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;
        for tx in txs {
            // Dropping `db_tx` on the error path rolls the batch back.
            Self::insert_row(&db_tx, tx)?;
        }
        db_tx.commit()?;
        Ok(())
    }

    fn insert_row(conn: &Connection, tx: &DbTransaction) -> Result<()> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO transactions (id, account_type, account_number, transaction_date,
                                       cheque_number, description1, description2,
                                       cad_amount, usd_amount)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        stmt.execute(params![
            tx.id,
            tx.account_type,
            tx.account_number,
            tx.transaction_date,
            tx.cheque_number,
            tx.description1,
            tx.description2,
            tx.cad_amount,
            tx.usd_amount,
        ])
        .map_err(|e| {
            if is_duplicate_key_error(&e) {
                Error::DuplicateKey(tx.id.clone())
            } else {
                Error::from(e)
            }
        })?;
        Ok(())
    }

    pub fn get_transaction(&self, id: &str) -> Result<Option<DbTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?"))?;
        let tx = stmt
            .query_map([id], Self::row_to_transaction)?
            .next()
            .transpose()?;
        Ok(tx)
    }

    /// All rows, in insertion order
    pub fn get_transactions(&self) -> Result<Vec<DbTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
        let txs = stmt
            .query_map([], Self::row_to_transaction)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(txs)
    }

    pub fn get_transactions_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Vec<DbTransaction>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("{SELECT_COLUMNS} WHERE account_number = ? ORDER BY rowid"))?;
        let txs = stmt
            .query_map([account_number], Self::row_to_transaction)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(txs)
    }

    pub fn get_transactions_by_date(&self, date: &str) -> Result<Vec<DbTransaction>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("{SELECT_COLUMNS} WHERE transaction_date = ? ORDER BY rowid"))?;
        let txs = stmt
            .query_map([date], Self::row_to_transaction)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(txs)
    }

    pub fn update_transaction(&self, tx: &DbTransaction) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE transactions
             SET account_type = ?, account_number = ?, transaction_date = ?,
                 cheque_number = ?, description1 = ?, description2 = ?,
                 cad_amount = ?, usd_amount = ?
             WHERE id = ?",
            params![
                tx.account_type,
                tx.account_number,
                tx.transaction_date,
                tx.cheque_number,
                tx.description1,
                tx.description2,
                tx.cad_amount,
                tx.usd_amount,
                tx.id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("transaction {}", tx.id)));
        }
        Ok(())
    }

    pub fn delete_transaction(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM transactions WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(Error::not_found(format!("transaction {id}")));
        }
        Ok(())
    }

    pub fn clear_transactions(&self) -> Result<u64> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions", [])?;
        Ok(deleted as u64)
    }

    pub fn count_transactions(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Distinct account numbers, sorted
    pub fn get_account_numbers(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT account_number FROM transactions ORDER BY account_number",
        )?;
        let numbers = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(numbers)
    }

    /// Earliest and latest transaction dates
    ///
    /// Dates are stored as canonical `YYYY-MM-DD` text, so text order is
    /// date order.
    pub fn get_transaction_date_range(&self) -> Result<(Option<String>, Option<String>)> {
        let conn = self.conn()?;
        let range = conn.query_row(
            "SELECT MIN(transaction_date), MAX(transaction_date) FROM transactions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(range)
    }

    fn row_to_transaction(row: &duckdb::Row) -> duckdb::Result<DbTransaction> {
        Ok(DbTransaction {
            id: row.get(0)?,
            account_type: row.get(1)?,
            account_number: row.get(2)?,
            transaction_date: row.get(3)?,
            cheque_number: row.get(4)?,
            description1: row.get(5)?,
            description2: row.get(6)?,
            cad_amount: row.get(7)?,
            usd_amount: row.get(8)?,
        })
    }
}

#[async_trait]
impl TransactionRepository for DuckDbRepository {
    async fn add(&self, tx: &DbTransaction) -> Result<()> {
        self.insert_transaction(tx)
    }

    async fn add_bulk(&self, txs: &[DbTransaction]) -> Result<()> {
        self.insert_transactions(txs)
    }

    async fn get(&self, id: &str) -> Result<DbTransaction> {
        self.get_transaction(id)?
            .ok_or_else(|| Error::not_found(format!("transaction {id}")))
    }

    async fn get_all(&self) -> Result<Vec<DbTransaction>> {
        self.get_transactions()
    }

    async fn get_by_account_number(&self, account_number: &str) -> Result<Vec<DbTransaction>> {
        self.get_transactions_by_account_number(account_number)
    }

    async fn get_by_transaction_date(&self, date: &str) -> Result<Vec<DbTransaction>> {
        self.get_transactions_by_date(date)
    }

    async fn update(&self, tx: &DbTransaction) -> Result<()> {
        self.update_transaction(tx)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_transaction(id)
    }

    async fn clear(&self) -> Result<u64> {
        self.clear_transactions()
    }

    async fn count(&self) -> Result<u64> {
        self.count_transactions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, account: &str, date: &str) -> DbTransaction {
        DbTransaction {
            id: id.to_string(),
            account_type: "Chequing".to_string(),
            account_number: account.to_string(),
            transaction_date: date.to_string(),
            cheque_number: String::new(),
            description1: "Coffee".to_string(),
            description2: String::new(),
            cad_amount: "-4.50".to_string(),
            usd_amount: String::new(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let repo = DuckDbRepository::in_memory().unwrap();
        let row = tx("a", "111", "2024-01-15");
        repo.insert_transaction(&row).unwrap();

        assert_eq!(repo.get_transaction("a").unwrap(), Some(row));
        assert_eq!(repo.get_transaction("missing").unwrap(), None);
    }

    #[test]
    fn test_single_insert_rejects_duplicate_id() {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.insert_transaction(&tx("a", "111", "2024-01-15")).unwrap();

        let err = repo.insert_transaction(&tx("a", "222", "2024-01-16")).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref id) if id == "a"));
        assert_eq!(repo.count_transactions().unwrap(), 1);
    }

    #[test]
    fn test_bulk_insert_is_all_or_nothing() {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.insert_transaction(&tx("existing", "111", "2024-01-01")).unwrap();

        let batch = vec![
            tx("b1", "111", "2024-01-02"),
            tx("b2", "111", "2024-01-03"),
            tx("existing", "111", "2024-01-04"),
        ];
        let err = repo.insert_transactions(&batch).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
        assert_eq!(repo.count_transactions().unwrap(), 1);
        assert_eq!(repo.get_transaction("b1").unwrap(), None);
    }

    #[test]
    fn test_bulk_insert_rejects_duplicates_within_batch() {
        let repo = DuckDbRepository::in_memory().unwrap();
        let batch = vec![tx("x", "111", "2024-01-02"), tx("x", "111", "2024-01-03")];

        let err = repo.insert_transactions(&batch).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref id) if id == "x"));
        assert_eq!(repo.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_empty_batch_is_ok() {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.insert_transactions(&[]).unwrap();
        assert_eq!(repo.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_secondary_lookups() {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.insert_transactions(&[
            tx("1", "111", "2024-01-15"),
            tx("2", "222", "2024-01-15"),
            tx("3", "111", "2024-02-01"),
        ])
        .unwrap();

        let by_account = repo.get_transactions_by_account_number("111").unwrap();
        assert_eq!(
            by_account.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            ["1", "3"]
        );

        let by_date = repo.get_transactions_by_date("2024-01-15").unwrap();
        assert_eq!(by_date.len(), 2);
        assert!(repo.get_transactions_by_date("2023-12-31").unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_unknown_id_are_not_found() {
        let repo = DuckDbRepository::in_memory().unwrap();
        let row = tx("ghost", "111", "2024-01-15");

        assert!(matches!(repo.update_transaction(&row), Err(Error::NotFound(_))));
        assert!(matches!(repo.delete_transaction("ghost"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_replaces_fields() {
        let repo = DuckDbRepository::in_memory().unwrap();
        let mut row = tx("a", "111", "2024-01-15");
        repo.insert_transaction(&row).unwrap();

        row.description1 = "Tea".to_string();
        repo.update_transaction(&row).unwrap();
        assert_eq!(repo.get_transaction("a").unwrap().unwrap().description1, "Tea");
    }

    #[test]
    fn test_clear_reports_removed_rows() {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.insert_transactions(&[tx("1", "111", "2024-01-15"), tx("2", "111", "2024-01-16")])
            .unwrap();

        assert_eq!(repo.clear_transactions().unwrap(), 2);
        assert_eq!(repo.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_summary_queries() {
        let repo = DuckDbRepository::in_memory().unwrap();
        assert_eq!(repo.get_transaction_date_range().unwrap(), (None, None));

        repo.insert_transactions(&[
            tx("1", "222", "2024-03-01"),
            tx("2", "111", "2023-12-31"),
            tx("3", "222", "2024-01-15"),
        ])
        .unwrap();

        assert_eq!(repo.get_account_numbers().unwrap(), ["111", "222"]);
        assert_eq!(
            repo.get_transaction_date_range().unwrap(),
            (Some("2023-12-31".to_string()), Some("2024-03-01".to_string()))
        );
        assert_eq!(repo.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: Could not set lock on file"));
        assert!(is_retryable_error("The process cannot access the file"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }
}
