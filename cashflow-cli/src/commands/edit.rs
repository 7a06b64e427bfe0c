//! Edit command - explicit update of one stored transaction

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use cashflow_core::{Column, ParsedRow};

use super::get_context;
use crate::output;

/// Replacement values; omitted flags keep the stored value
#[derive(Args, Debug, Default)]
pub struct EditFields {
    #[arg(long)]
    pub account_type: Option<String>,
    #[arg(long)]
    pub account_number: Option<String>,
    /// Transaction date, M/D/YYYY or YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub cheque_number: Option<String>,
    #[arg(long)]
    pub description1: Option<String>,
    #[arg(long)]
    pub description2: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub cad: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub usd: Option<String>,
}

impl EditFields {
    fn into_changes(self) -> Vec<(Column, String)> {
        [
            (Column::AccountType, self.account_type),
            (Column::AccountNumber, self.account_number),
            (Column::TransactionDate, self.date),
            (Column::ChequeNumber, self.cheque_number),
            (Column::Description1, self.description1),
            (Column::Description2, self.description2),
            (Column::CadAmount, self.cad),
            (Column::UsdAmount, self.usd),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }
}

pub async fn run(id: &str, fields: EditFields, json: bool) -> Result<()> {
    let changes = fields.into_changes();
    if changes.is_empty() {
        bail!("Nothing to change: pass at least one field flag");
    }

    let ctx = get_context()?;
    let mut row = ParsedRow::from(ctx.transaction_service.load_one(id).await?);
    for (column, value) in changes {
        row.set(column, value);
    }

    let stored = ctx.transaction_service.update_one(&row).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
    } else {
        println!("{}", output::transaction_detail(&stored));
        println!("{} Transaction {} updated", "✓".green(), id);
    }
    Ok(())
}
