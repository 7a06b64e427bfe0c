//! Chart command - monthly money in and money out

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::get_context;
use crate::output;

const BAR_WIDTH: u32 = 30;

/// Bar of `value` scaled against `max`
fn bar(value: Decimal, max: Decimal) -> String {
    if max.is_zero() {
        return String::new();
    }
    let len = (value / max * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0);
    "█".repeat(len)
}

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let months = ctx.cashflow_service.monthly().await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "months": months,
                "currencies_converted": false,
            })
        );
        return Ok(());
    }

    if months.is_empty() {
        println!("No transactions to chart.");
        return Ok(());
    }

    let max = months
        .iter()
        .flat_map(|m| [m.money_in, m.money_out])
        .max()
        .unwrap_or_default();

    let mut table = output::create_table();
    table.set_header(vec!["Month", "Money In", "", "Money Out", "", "Net"]);
    for month in &months {
        let net = if month.net.is_sign_negative() {
            month.net.to_string().red().to_string()
        } else {
            month.net.to_string().green().to_string()
        };
        table.add_row(vec![
            Cell::new(&month.month),
            Cell::new(month.money_in).set_alignment(CellAlignment::Right),
            Cell::new(bar(month.money_in, max).green().to_string()),
            Cell::new(month.money_out).set_alignment(CellAlignment::Right),
            Cell::new(bar(month.money_out, max).red().to_string()),
            Cell::new(net).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
    output::currency_note();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(Decimal::new(50, 0), Decimal::new(100, 0)).chars().count(), 15);
        assert_eq!(bar(Decimal::new(100, 0), Decimal::new(100, 0)).chars().count(), 30);
        assert!(bar(Decimal::ZERO, Decimal::ZERO).is_empty());
    }
}
