//! Log database migrations - embedded SQL files
//!
//! Kept apart from the statement store so the event log can be cleared or
//! deleted without touching imported data.

/// All log migrations, embedded at compile time, in application order
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
