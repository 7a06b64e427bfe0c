//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::Column;

/// Core library error type
///
/// The first seven variants form the ingestion taxonomy surfaced to callers;
/// the rest wrap infrastructure failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] csv::Error),

    #[error("Schema error: expected headers {expected:?}, found {actual:?}")]
    Schema {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Format error in row {row}: cannot parse transaction date '{value}'")]
    Format { row: usize, value: String },

    #[error("Validation error in row {row}: column '{column}' {reason} (value: '{value}')")]
    Validation {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Another import is already in progress")]
    Busy,

    #[error("Amount overflow: {0}")]
    Overflow(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Decode(_) => "decode_error",
            Error::Schema { .. } => "schema_error",
            Error::Format { .. } => "format_error",
            Error::Validation { .. } => "validation_error",
            Error::DuplicateKey(_) => "duplicate_key_error",
            Error::NotFound(_) => "not_found_error",
            Error::Busy => "busy_error",
            Error::Overflow(_) => "overflow_error",
            Error::Database(_) => "database_error",
            Error::Config(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
        }
    }

    /// Data row index (1-based, header excluded) the error refers to, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            Error::Format { row, .. } | Error::Validation { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Column the error refers to, if any
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Error::Validation { column, .. } => Some(*column),
            Error::Format { .. } => Some(Column::TransactionDate.header()),
            _ => None,
        }
    }

    /// Offending raw value, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            Error::Format { value, .. } | Error::Validation { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Source line of a decode failure, if the CSV reader reported one
    pub fn line(&self) -> Option<u64> {
        match self {
            Error::Decode(e) => e.position().map(|p| p.line()),
            _ => None,
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}
