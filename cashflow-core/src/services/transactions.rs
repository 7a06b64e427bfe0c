//! Transaction service - read, edit and delete access to stored rows

use std::cmp::Reverse;
use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{DbTransaction, ParsedRow, RULE_TABLE};
use crate::ports::TransactionRepository;

use super::sanitize::resanitize;
use super::validate::validate_row;

/// Table-facing operations over the store
pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    /// Every stored row, newest transaction date first
    pub async fn load_all(&self) -> Result<Vec<DbTransaction>> {
        let mut txs = self.repository.get_all().await?;
        txs.sort_by_key(|tx| Reverse(tx.transaction_date.clone()));
        Ok(txs)
    }

    pub async fn load_by_account_number(&self, account_number: &str) -> Result<Vec<DbTransaction>> {
        self.repository.get_by_account_number(account_number).await
    }

    pub async fn load_by_transaction_date(&self, date: &str) -> Result<Vec<DbTransaction>> {
        self.repository.get_by_transaction_date(date).await
    }

    pub async fn load_one(&self, id: &str) -> Result<DbTransaction> {
        self.repository.get(id).await
    }

    /// Replace a stored row after sanitizing and validating it again
    ///
    /// The id is kept as given. Returns the row as stored.
    pub async fn update_one(&self, row: &ParsedRow) -> Result<DbTransaction> {
        let row = resanitize(row, 1)?;
        validate_row(&row, 1, &RULE_TABLE)?;
        let tx = DbTransaction::from(&row);
        self.repository.update(&tx).await?;
        Ok(tx)
    }

    pub async fn delete_one(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await
    }

    /// Remove every stored row. Callers confirm with the user first.
    pub async fn clear_all(&self) -> Result<u64> {
        self.repository.clear().await
    }

    pub async fn count(&self) -> Result<u64> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::domain::result::Error;

    fn tx(id: &str, date: &str) -> DbTransaction {
        DbTransaction {
            id: id.to_string(),
            account_type: "Chequing".to_string(),
            account_number: "12345".to_string(),
            transaction_date: date.to_string(),
            cheque_number: String::new(),
            description1: "Coffee".to_string(),
            description2: String::new(),
            cad_amount: "-4.50".to_string(),
            usd_amount: String::new(),
        }
    }

    fn service_with(rows: &[DbTransaction]) -> TransactionService {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.insert_transactions(rows).unwrap();
        TransactionService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_load_all_is_newest_first() {
        let service = service_with(&[
            tx("a", "2024-01-15"),
            tx("b", "2024-03-01"),
            tx("c", "2023-12-31"),
        ]);

        let ids: Vec<String> = service.load_all().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_update_one_sanitizes_and_keeps_id() {
        let service = service_with(&[tx("a", "2024-01-15")]);

        let mut row = ParsedRow::from(service.load_one("a").await.unwrap());
        row.transaction_date = "2/3/2024".to_string();
        row.description1 = "  Tea ".to_string();

        let stored = service.update_one(&row).await.unwrap();
        assert_eq!(stored.id, "a");
        assert_eq!(stored.transaction_date, "2024-02-03");
        assert_eq!(service.load_one("a").await.unwrap().description1, "Tea");
    }

    #[tokio::test]
    async fn test_update_one_rejects_invalid_rows() {
        let service = service_with(&[tx("a", "2024-01-15")]);

        let mut row = ParsedRow::from(service.load_one("a").await.unwrap());
        row.cad_amount = "lots".to_string();
        let err = service.update_one(&row).await.unwrap_err();
        assert_eq!(err.column(), Some("CAD$"));
        assert_eq!(service.load_one("a").await.unwrap().cad_amount, "-4.50");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = service_with(&[tx("a", "2024-01-15")]);

        assert!(matches!(service.load_one("zzz").await, Err(Error::NotFound(_))));
        assert!(matches!(service.delete_one("zzz").await, Err(Error::NotFound(_))));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_all_empties_store() {
        let service = service_with(&[tx("a", "2024-01-15"), tx("b", "2024-01-16")]);
        assert_eq!(service.clear_all().await.unwrap(), 2);
        assert_eq!(service.count().await.unwrap(), 0);
    }
}
