//! Import service - runs one statement file through the ingestion pipeline
//!
//! Stages run in order: decode, header check, sanitize, validate, persist.
//! The first failure aborts the attempt and nothing is written; a batch is
//! stored in full or not at all.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::adapters::lock::ImportLock;
use crate::domain::result::{Error, Result};
use crate::domain::{check_headers, ParsedRow, RowId, REQUIRED_HEADERS, RULE_TABLE};
use crate::ports::TransactionRepository;

use super::decode::decode;
use super::sanitize::sanitize;
use super::validate::validate_row;

/// Stage of an import attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    Idle,
    Decoding,
    HeaderChecking,
    Sanitizing,
    Validating,
    Persisting,
    Committed,
    Aborted,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::Idle => "idle",
            ImportStage::Decoding => "decoding",
            ImportStage::HeaderChecking => "header_checking",
            ImportStage::Sanitizing => "sanitizing",
            ImportStage::Validating => "validating",
            ImportStage::Persisting => "persisting",
            ImportStage::Committed => "committed",
            ImportStage::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStage::Committed | ImportStage::Aborted)
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed import: the stage that failed and why
#[derive(Debug, thiserror::Error)]
#[error("Import failed while {stage}: {source}")]
pub struct ImportError {
    pub stage: ImportStage,
    #[source]
    pub source: Error,
}

impl ImportError {
    pub fn new(stage: ImportStage, source: Error) -> Self {
        Self { stage, source }
    }

    /// Structured detail for the presentation boundary, raw value included
    pub fn context(&self) -> HashMap<String, serde_json::Value> {
        let mut context = self.redacted_context();
        if let Some(value) = self.source.value() {
            context.insert("value".to_string(), value.into());
        }
        context
    }

    /// Structured detail without the offending value, safe for the event log
    pub fn redacted_context(&self) -> HashMap<String, serde_json::Value> {
        let mut context = HashMap::new();
        context.insert("stage".to_string(), self.stage.as_str().into());
        context.insert("kind".to_string(), self.source.kind().into());
        if let Some(row) = self.source.row() {
            context.insert("row".to_string(), row.into());
        }
        if let Some(line) = self.source.line() {
            context.insert("line".to_string(), line.into());
        }
        if let Some(column) = self.source.column() {
            context.insert("column".to_string(), column.into());
        }
        context
    }
}

/// Stage tracker for a single attempt
///
/// Starts at `Idle`. Each attempt gets a fresh tracker, so no state carries
/// over between imports.
#[derive(Debug)]
pub struct ImportAttempt {
    stage: ImportStage,
}

impl Default for ImportAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportAttempt {
    pub fn new() -> Self {
        Self {
            stage: ImportStage::Idle,
        }
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    /// Move to the next stage
    pub fn advance(&mut self, next: ImportStage) {
        debug_assert!(!self.stage.is_terminal(), "advance from {}", self.stage);
        self.stage = next;
    }

    /// Abort at the current stage, wrapping the cause
    pub fn abort(&mut self, source: Error) -> ImportError {
        let failed = self.stage;
        self.stage = ImportStage::Aborted;
        ImportError::new(failed, source)
    }

    /// Run a stage step, aborting the attempt on error
    fn step<T>(&mut self, result: Result<T>) -> std::result::Result<T, ImportError> {
        result.map_err(|e| self.abort(e))
    }
}

/// A committed batch
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    /// Batch id, `import_YYYYMMDD_HHMMSS`
    pub batch_id: String,
    /// Number of rows written
    pub committed: usize,
    /// The sanitized rows, as stored
    pub rows: Vec<ParsedRow>,
}

/// Commit orchestrator for statement imports
///
/// Only one import runs at a time per service. With a lock path set, the
/// same holds across processes sharing the database file.
pub struct ImportService {
    repository: Arc<dyn TransactionRepository>,
    in_flight: Mutex<()>,
    lock_path: Option<PathBuf>,
}

impl ImportService {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self {
            repository,
            in_flight: Mutex::new(()),
            lock_path: None,
        }
    }

    /// Also hold an exclusive file lock at `lock_path` during each import
    pub fn with_lock_file(mut self, lock_path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(lock_path.into());
        self
    }

    /// Import a statement file from disk
    pub async fn import_file(&self, path: &Path) -> std::result::Result<ImportOutcome, ImportError> {
        let _guard = self.begin()?;
        let mut attempt = ImportAttempt::new();

        attempt.advance(ImportStage::Decoding);
        let bytes = attempt.step(
            tokio::fs::read(path)
                .await
                .map_err(|e| Error::Decode(csv::Error::from(e))),
        )?;

        self.run(attempt, &bytes).await
    }

    /// Import statement contents already in memory
    pub async fn import_bytes(&self, bytes: &[u8]) -> std::result::Result<ImportOutcome, ImportError> {
        let _guard = self.begin()?;
        let mut attempt = ImportAttempt::new();
        attempt.advance(ImportStage::Decoding);
        self.run(attempt, bytes).await
    }

    /// Claim the single import slot, failing with `Busy` if it is taken
    fn begin(&self) -> std::result::Result<ImportGuard<'_>, ImportError> {
        let busy = |source: Error| ImportError::new(ImportStage::Idle, source);

        let in_flight = self.in_flight.try_lock().map_err(|_| busy(Error::Busy))?;
        let file_lock = match &self.lock_path {
            Some(path) => Some(ImportLock::try_acquire(path).map_err(busy)?),
            None => None,
        };

        Ok(ImportGuard {
            _in_flight: in_flight,
            _file_lock: file_lock,
        })
    }

    async fn run(
        &self,
        mut attempt: ImportAttempt,
        bytes: &[u8],
    ) -> std::result::Result<ImportOutcome, ImportError> {
        let table = attempt.step(decode(bytes))?;

        attempt.advance(ImportStage::HeaderChecking);
        attempt.step(check_headers(&table.headers, &REQUIRED_HEADERS))?;

        attempt.advance(ImportStage::Sanitizing);
        let rows = attempt.step(
            table
                .records
                .iter()
                .map(|raw| sanitize(raw, RowId::generate()))
                .collect::<Result<Vec<ParsedRow>>>(),
        )?;

        attempt.advance(ImportStage::Validating);
        attempt.step(
            rows.iter()
                .enumerate()
                .try_for_each(|(i, row)| validate_row(row, i + 1, &RULE_TABLE)),
        )?;

        attempt.advance(ImportStage::Persisting);
        attempt.step(self.repository.add_rows(&rows).await)?;

        attempt.advance(ImportStage::Committed);
        Ok(ImportOutcome {
            batch_id: format!("import_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")),
            committed: rows.len(),
            rows,
        })
    }
}

struct ImportGuard<'a> {
    _in_flight: tokio::sync::MutexGuard<'a, ()>,
    _file_lock: Option<ImportLock>,
}
