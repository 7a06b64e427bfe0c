//! Delete command - remove one stored transaction

use anyhow::Result;
use colored::Colorize;

use super::get_context;

pub async fn run(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.transaction_service.delete_one(id).await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("{} Transaction {} deleted", "✓".green(), id);
    }
    Ok(())
}
