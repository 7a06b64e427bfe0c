//! Clear command - remove every stored transaction

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::Confirm;

use super::get_context;
use crate::output;

pub async fn run(force: bool, json: bool) -> Result<()> {
    if json && !force {
        bail!("--json output cannot prompt for confirmation; pass --force");
    }

    let ctx = get_context()?;
    let count = ctx.transaction_service.count().await?;

    if !force {
        println!(
            "\n{}",
            format!("This will permanently delete all {count} stored transactions.").yellow()
        );
        println!("{}\n", "This cannot be undone.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            output::info("Cancelled");
            return Ok(());
        }
    }

    let deleted = ctx.transaction_service.clear_all().await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Deleted {deleted} transactions"));
    }
    Ok(())
}
