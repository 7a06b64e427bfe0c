//! Status service - store summary

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;

/// Status service for the statement store
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    pub fn get_status(&self) -> Result<StatusSummary> {
        let (earliest, latest) = self.repository.get_transaction_date_range()?;

        Ok(StatusSummary {
            total_transactions: self.repository.count_transactions()?,
            account_numbers: self.repository.get_account_numbers()?,
            date_range: DateRange { earliest, latest },
            schema_version: self.repository.schema_version()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_transactions: u64,
    pub account_numbers: Vec<String>,
    pub date_range: DateRange,
    pub schema_version: u32,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_status() {
        let service = StatusService::new(Arc::new(DuckDbRepository::in_memory().unwrap()));
        let status = service.get_status().unwrap();

        assert_eq!(status.total_transactions, 0);
        assert!(status.account_numbers.is_empty());
        assert!(status.date_range.earliest.is_none());
        assert_eq!(status.schema_version, 1);
    }
}
