//! Status and count commands - store summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Statement Store Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Transactions".to_string(), status.total_transactions.to_string()]);
    table.add_row(vec!["Accounts".to_string(), status.account_numbers.len().to_string()]);
    table.add_row(vec!["Schema version".to_string(), status.schema_version.to_string()]);
    table.add_row(vec![
        "Database".to_string(),
        ctx.config.database_path(&ctx.data_dir).display().to_string(),
    ]);
    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest) {
        println!("Date range: {} to {}", earliest, latest);
        println!();
    }

    if !status.account_numbers.is_empty() {
        println!("{}", "Account Numbers".bold());
        for number in &status.account_numbers {
            println!("  • {}", number);
        }
    }

    Ok(())
}

pub async fn run_count(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let count = ctx.transaction_service.count().await?;

    if json {
        println!("{}", serde_json::json!({ "count": count }));
    } else {
        println!("{} transactions", count);
    }
    Ok(())
}
