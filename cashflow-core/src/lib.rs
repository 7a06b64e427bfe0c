//! Cashflow Core - bank-statement CSV ingestion and storage
//!
//! This crate follows a hexagonal architecture:
//!
//! - **domain**: statement rows, the column schema and rule table, errors
//! - **ports**: the `TransactionRepository` trait
//! - **services**: the ingestion pipeline and the read-side consumers
//! - **adapters**: DuckDB storage and the cross-process import lock

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbRepository;
use adapters::lock::ImportLock;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Column, DbTransaction, ParsedRow, RawRecord, REQUIRED_HEADERS, RULE_TABLE};
pub use ports::TransactionRepository;

/// Main context for Cashflow operations
///
/// Opens the statement database in the data directory, applies the schema
/// and wires every service to the same repository.
pub struct CashflowContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub repository: Arc<DuckDbRepository>,
    pub import_service: ImportService,
    pub transaction_service: TransactionService,
    pub cashflow_service: CashFlowService,
    pub status_service: StatusService,
}

impl CashflowContext {
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let config = Config::load(data_dir)?;

        let db_path = config.database_path(data_dir);
        let repository = Arc::new(
            DuckDbRepository::new(&db_path)
                .with_context(|| format!("Failed to open {}", db_path.display()))?,
        );
        repository.ensure_schema()?;

        let port: Arc<dyn TransactionRepository> = repository.clone();
        let import_service =
            ImportService::new(Arc::clone(&port)).with_lock_file(ImportLock::path_for(&db_path));
        let transaction_service = TransactionService::new(Arc::clone(&port));
        let cashflow_service = CashFlowService::new(port);
        let status_service = StatusService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            repository,
            import_service,
            transaction_service,
            cashflow_service,
            status_service,
        })
    }
}
