//! List and show commands - read stored transactions

use anyhow::Result;

use super::get_context;
use crate::output;

pub async fn run(account_number: Option<&str>, date: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.transaction_service;

    let mut txs = match (account_number, date) {
        (Some(account), _) => service.load_by_account_number(account).await?,
        (None, Some(date)) => service.load_by_transaction_date(date).await?,
        (None, None) => service.load_all().await?,
    };
    if let (Some(_), Some(date)) = (account_number, date) {
        txs.retain(|tx| tx.transaction_date == date);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&txs)?);
        return Ok(());
    }

    if txs.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("{}", output::transaction_table(&txs));
    println!("{} transactions", txs.len());
    Ok(())
}

pub async fn run_show(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let tx = ctx.transaction_service.load_one(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tx)?);
    } else {
        println!("{}", output::transaction_detail(&tx));
    }
    Ok(())
}
