//! Cash-flow service - monthly money in and money out

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{DbTransaction, FlowDirection};
use crate::ports::TransactionRepository;

/// Totals for one calendar month
///
/// CAD and USD amounts are added together without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCashFlow {
    /// `YYYY-MM`
    pub month: String,
    pub money_in: Decimal,
    pub money_out: Decimal,
    pub net: Decimal,
}

pub struct CashFlowService {
    repository: Arc<dyn TransactionRepository>,
}

impl CashFlowService {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    /// Monthly totals over every stored row, oldest month first
    pub async fn monthly(&self) -> Result<Vec<MonthlyCashFlow>> {
        let txs = self.repository.get_all().await?;
        summarize_by_month(&txs)
    }
}

/// Group rows by month of transaction date
///
/// A positive net amount counts as money in, a negative one adds its
/// magnitude to money out, and zero counts toward neither. Totals that do
/// not fit in a `Decimal` fail with `Overflow`.
pub fn summarize_by_month(txs: &[DbTransaction]) -> Result<Vec<MonthlyCashFlow>> {
    let mut months: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();

    for tx in txs {
        let net = tx.net_amount()?;
        let direction = tx.flow_direction()?;
        let month = tx.month();
        let (money_in, money_out) = months.entry(month).or_default();
        let overflow = || Error::Overflow(format!("monthly total for {month}"));
        match direction {
            FlowDirection::In => *money_in = money_in.checked_add(net).ok_or_else(overflow)?,
            FlowDirection::Out => *money_out = money_out.checked_sub(net).ok_or_else(overflow)?,
            FlowDirection::Neither => {}
        }
    }

    Ok(months
        .into_iter()
        .map(|(month, (money_in, money_out))| MonthlyCashFlow {
            month: month.to_string(),
            money_in,
            money_out,
            // Both totals are non-negative, so the difference always fits
            net: money_in - money_out,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, cad: &str, usd: &str) -> DbTransaction {
        DbTransaction {
            id: format!("{date}-{cad}-{usd}"),
            account_type: "Chequing".to_string(),
            account_number: "12345".to_string(),
            transaction_date: date.to_string(),
            cheque_number: String::new(),
            description1: "Entry".to_string(),
            description2: String::new(),
            cad_amount: cad.to_string(),
            usd_amount: usd.to_string(),
        }
    }

    #[test]
    fn test_groups_by_month_and_direction() {
        let summary = summarize_by_month(&[
            tx("2024-02-10", "-20.00", ""),
            tx("2024-01-15", "-54.32", ""),
            tx("2024-01-20", "1000", ""),
            tx("2024-01-31", "", ""),
        ])
        .unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].month, "2024-01");
        assert_eq!(summary[0].money_in, Decimal::new(1000, 0));
        assert_eq!(summary[0].money_out, Decimal::new(5432, 2));
        assert_eq!(summary[0].net, Decimal::new(94568, 2));
        assert_eq!(summary[1].month, "2024-02");
        assert_eq!(summary[1].money_out, Decimal::new(20, 0));
    }

    #[test]
    fn test_currencies_net_before_direction() {
        // -10 CAD and +15 USD net to +5, which is money in
        let summary = summarize_by_month(&[tx("2024-03-01", "-10", "15")]).unwrap();
        assert_eq!(summary[0].money_in, Decimal::new(5, 0));
        assert_eq!(summary[0].money_out, Decimal::ZERO);
    }

    #[test]
    fn test_empty_store_has_no_months() {
        assert!(summarize_by_month(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_monthly_total_overflow_is_an_error() {
        let big = "50000000000000000000000000000";
        let err = summarize_by_month(&[tx("2024-04-01", big, ""), tx("2024-04-02", big, "")])
            .unwrap_err();
        assert!(matches!(err, Error::Overflow(ref what) if what.contains("2024-04")));

        let spent = format!("-{big}");
        let err = summarize_by_month(&[tx("2024-04-01", &spent, ""), tx("2024-04-02", &spent, "")])
            .unwrap_err();
        assert_eq!(err.kind(), "overflow_error");
    }

    #[test]
    fn test_large_totals_in_separate_months_still_chart() {
        let big = "50000000000000000000000000000";
        let summary =
            summarize_by_month(&[tx("2024-04-01", big, ""), tx("2024-05-01", big, "")]).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].money_in, summary[0].money_in);
    }
}
