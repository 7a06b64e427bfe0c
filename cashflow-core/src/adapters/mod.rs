//! Adapter implementations
//!
//! - DuckDB for the `TransactionRepository` port
//! - A file lock (flock on Unix, LockFileEx on Windows) that keeps two
//!   processes from importing into the same database at once

pub mod duckdb;
pub mod lock;
