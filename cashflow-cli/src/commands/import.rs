//! Import command - import a bank-statement CSV file

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use cashflow_core::services::LogEvent;
use cashflow_core::{DbTransaction, OperationResult};

use super::{get_context, get_logger, log_event};
use crate::output;

pub async fn run(file: &Path, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let outcome = match ctx.import_service.import_file(file).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log_event(&logger, LogEvent::import_aborted(&e));
            if json {
                let result: OperationResult<()> =
                    OperationResult::fail_with_context(e.to_string(), e.context());
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            return Err(e.into());
        }
    };

    log_event(
        &logger,
        LogEvent::new("import_committed").with_command("import"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&outcome))?);
        return Ok(());
    }

    if outcome.committed == 0 {
        output::warning("File has a valid header but no rows; nothing was imported.");
        return Ok(());
    }

    let rows: Vec<DbTransaction> = outcome.rows.iter().map(DbTransaction::from).collect();
    println!("{}", output::transaction_table(&rows));
    println!();
    println!(
        "{} Imported {} transactions (batch {})",
        "✓".green(),
        outcome.committed.to_string().bold(),
        outcome.batch_id.dimmed()
    );

    Ok(())
}
