//! Output formatting utilities

use cashflow_core::DbTransaction;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Amount cell, right-aligned and colored by sign
fn amount_cell(amount: &str) -> Cell {
    let text = if amount.starts_with('-') {
        amount.red().to_string()
    } else {
        amount.green().to_string()
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Table of statement rows
pub fn transaction_table(txs: &[DbTransaction]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        "ID",
        "Date",
        "Account Type",
        "Account Number",
        "Cheque",
        "Description 1",
        "Description 2",
        "CAD$",
        "USD$",
    ]);

    for tx in txs {
        table.add_row(vec![
            Cell::new(&tx.id),
            Cell::new(&tx.transaction_date),
            Cell::new(&tx.account_type),
            Cell::new(&tx.account_number),
            Cell::new(&tx.cheque_number),
            Cell::new(&tx.description1),
            Cell::new(&tx.description2),
            amount_cell(&tx.cad_amount),
            amount_cell(&tx.usd_amount),
        ]);
    }
    table
}

/// Vertical key/value table for a single row
pub fn transaction_detail(tx: &DbTransaction) -> Table {
    let mut table = create_table();
    for (label, value) in [
        ("ID", &tx.id),
        ("Account Type", &tx.account_type),
        ("Account Number", &tx.account_number),
        ("Transaction Date", &tx.transaction_date),
        ("Cheque Number", &tx.cheque_number),
        ("Description 1", &tx.description1),
        ("Description 2", &tx.description2),
        ("CAD$", &tx.cad_amount),
        ("USD$", &tx.usd_amount),
    ] {
        table.add_row(vec![label, value.as_str()]);
    }
    table
}

/// Note shown wherever CAD and USD amounts are combined
pub fn currency_note() {
    println!(
        "{}",
        "Note: CAD$ and USD$ amounts are added together without currency conversion.".dimmed()
    );
}
