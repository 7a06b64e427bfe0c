//! Database migrations - embedded SQL files
//!
//! Migrations are compiled into the binary with include_str! and applied in
//! name order. Each entry is (filename, sql_content).

/// All migrations, embedded at compile time.
///
/// New migrations get the next `NNN_description.sql` name and an entry here.
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_transactions.sql", include_str!("001_transactions.sql")),
];
