//! Core domain entities
//!
//! Statement rows, the column schema, row identity and the error taxonomy.
//! Pure data structures with validation logic, no I/O.

mod identity;
pub mod result;
pub mod schema;
mod transaction;

pub use identity::RowId;
pub use schema::{check_headers, Column, ColumnRule, FieldKind, REQUIRED_HEADERS, RULE_TABLE};
pub use transaction::{
    convert_to_db_format, parse_amount, DbTransaction, FlowDirection, ParsedRow, RawRecord,
};
