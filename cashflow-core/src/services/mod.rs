//! Service layer - pipeline stages and use-case orchestration
//!
//! The decoder, sanitizer and validator are pure functions. The import,
//! transaction and cash-flow services sit on top of the repository port.

mod cashflow;
pub mod decode;
pub mod import;
pub mod logging;
pub mod migration;
pub mod sanitize;
mod status;
mod transactions;
pub mod validate;

pub use cashflow::{summarize_by_month, CashFlowService, MonthlyCashFlow};
pub use decode::{decode, DecodedTable};
pub use import::{ImportAttempt, ImportError, ImportOutcome, ImportService, ImportStage};
pub use logging::{LogEntry, LogEvent, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use sanitize::{canonical_date, resanitize, sanitize};
pub use status::{DateRange, StatusService, StatusSummary};
pub use transactions::TransactionService;
pub use validate::validate_row;
