//! Statement row models: decoded, sanitized and persisted shapes

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};
use super::schema::Column;

/// One decoded CSV record, keyed by header name
///
/// Carries no identifier. Discarded once the row has been sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data row index (the header row is not counted)
    pub row: usize,
    /// Line in the source file where the record starts
    pub line: u64,
    values: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(row: usize, line: u64, values: HashMap<String, String>) -> Self {
        Self { row, line, values }
    }

    /// Build a record by pairing header names with field values positionally
    pub fn from_fields<'a>(
        row: usize,
        line: u64,
        headers: &[String],
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let values = headers
            .iter()
            .cloned()
            .zip(fields.into_iter().map(str::to_string))
            .collect();
        Self::new(row, line, values)
    }

    /// Value for a header, or an empty string when the header is absent
    pub fn get(&self, header: &str) -> &str {
        self.values.get(header).map(String::as_str).unwrap_or("")
    }
}

/// A sanitized statement row, keyed by the CSV header names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRow {
    pub id: String,
    #[serde(rename = "Account Type")]
    pub account_type: String,
    #[serde(rename = "Account Number")]
    pub account_number: String,
    #[serde(rename = "Transaction Date")]
    pub transaction_date: String,
    #[serde(rename = "Cheque Number")]
    pub cheque_number: String,
    #[serde(rename = "Description 1")]
    pub description1: String,
    #[serde(rename = "Description 2")]
    pub description2: String,
    #[serde(rename = "CAD$")]
    pub cad_amount: String,
    #[serde(rename = "USD$")]
    pub usd_amount: String,
}

impl ParsedRow {
    /// Value of a column
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::AccountType => &self.account_type,
            Column::AccountNumber => &self.account_number,
            Column::TransactionDate => &self.transaction_date,
            Column::ChequeNumber => &self.cheque_number,
            Column::Description1 => &self.description1,
            Column::Description2 => &self.description2,
            Column::CadAmount => &self.cad_amount,
            Column::UsdAmount => &self.usd_amount,
        }
    }

    /// Replace the value of a column
    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        let value = value.into();
        match column {
            Column::AccountType => self.account_type = value,
            Column::AccountNumber => self.account_number = value,
            Column::TransactionDate => self.transaction_date = value,
            Column::ChequeNumber => self.cheque_number = value,
            Column::Description1 => self.description1 = value,
            Column::Description2 => self.description2 = value,
            Column::CadAmount => self.cad_amount = value,
            Column::UsdAmount => self.usd_amount = value,
        }
    }
}

/// The persisted shape of a statement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTransaction {
    pub id: String,
    pub account_type: String,
    pub account_number: String,
    pub transaction_date: String,
    pub cheque_number: String,
    pub description1: String,
    pub description2: String,
    pub cad_amount: String,
    pub usd_amount: String,
}

/// Convert a sanitized row into its persisted shape
pub fn convert_to_db_format(row: &ParsedRow) -> DbTransaction {
    DbTransaction::from(row)
}

impl From<&ParsedRow> for DbTransaction {
    fn from(row: &ParsedRow) -> Self {
        Self {
            id: row.id.clone(),
            account_type: row.account_type.clone(),
            account_number: row.account_number.clone(),
            transaction_date: row.transaction_date.clone(),
            cheque_number: row.cheque_number.clone(),
            description1: row.description1.clone(),
            description2: row.description2.clone(),
            cad_amount: row.cad_amount.clone(),
            usd_amount: row.usd_amount.clone(),
        }
    }
}

impl From<DbTransaction> for ParsedRow {
    fn from(tx: DbTransaction) -> Self {
        Self {
            id: tx.id,
            account_type: tx.account_type,
            account_number: tx.account_number,
            transaction_date: tx.transaction_date,
            cheque_number: tx.cheque_number,
            description1: tx.description1,
            description2: tx.description2,
            cad_amount: tx.cad_amount,
            usd_amount: tx.usd_amount,
        }
    }
}

/// Direction of money for a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    In,
    Out,
    Neither,
}

impl DbTransaction {
    /// CAD and USD amounts added together, with no currency conversion
    ///
    /// Empty amounts count as zero. Fails with `Overflow` when the sum does
    /// not fit in a `Decimal`.
    pub fn net_amount(&self) -> Result<Decimal> {
        let cad = parse_amount(&self.cad_amount).unwrap_or_default();
        let usd = parse_amount(&self.usd_amount).unwrap_or_default();
        cad.checked_add(usd)
            .ok_or_else(|| Error::Overflow(format!("net amount of transaction {}", self.id)))
    }

    pub fn flow_direction(&self) -> Result<FlowDirection> {
        let net = self.net_amount()?;
        Ok(if net > Decimal::ZERO {
            FlowDirection::In
        } else if net < Decimal::ZERO {
            FlowDirection::Out
        } else {
            FlowDirection::Neither
        })
    }

    /// `YYYY-MM` bucket of the transaction date
    pub fn month(&self) -> &str {
        self.transaction_date.get(..7).unwrap_or(&self.transaction_date)
    }
}

/// Parse a decimal amount string; empty means zero
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ParsedRow {
        ParsedRow {
            id: "3f1c2a5e-0000-4000-8000-000000000001".to_string(),
            account_type: "Chequing".to_string(),
            account_number: "12345".to_string(),
            transaction_date: "2024-01-15".to_string(),
            cheque_number: String::new(),
            description1: "Grocery Store".to_string(),
            description2: String::new(),
            cad_amount: "-54.32".to_string(),
            usd_amount: String::new(),
        }
    }

    #[test]
    fn test_raw_record_missing_header_reads_empty() {
        let headers = vec!["Account Type".to_string()];
        let raw = RawRecord::from_fields(1, 2, &headers, ["Chequing"]);
        assert_eq!(raw.get("Account Type"), "Chequing");
        assert_eq!(raw.get("CAD$"), "");
    }

    #[test]
    fn test_db_field_names_serialize_in_camel_case() {
        let tx = convert_to_db_format(&sample_row());
        let json = serde_json::to_value(&tx).unwrap();
        for column in Column::ALL {
            assert!(json.get(column.db_field()).is_some(), "missing {}", column.db_field());
        }
        assert_eq!(json["cadAmount"], "-54.32");
    }

    #[test]
    fn test_parsed_row_serializes_with_header_names() {
        let json = serde_json::to_value(sample_row()).unwrap();
        for column in Column::ALL {
            assert!(json.get(column.header()).is_some(), "missing {}", column.header());
        }
    }

    #[test]
    fn test_conversion_is_lossless() {
        let row = sample_row();
        let back = ParsedRow::from(convert_to_db_format(&row));
        assert_eq!(back, row);
    }

    #[test]
    fn test_net_amount_sums_currencies_unconverted() {
        let mut row = sample_row();
        row.cad_amount = "-10.50".to_string();
        row.usd_amount = "4.25".to_string();
        let tx = convert_to_db_format(&row);
        assert_eq!(tx.net_amount().unwrap(), Decimal::new(-625, 2));
        assert_eq!(tx.flow_direction().unwrap(), FlowDirection::Out);
    }

    #[test]
    fn test_flow_direction_by_sign() {
        let mut row = sample_row();
        row.cad_amount = "100".to_string();
        assert_eq!(convert_to_db_format(&row).flow_direction().unwrap(), FlowDirection::In);

        row.cad_amount = String::new();
        row.usd_amount = String::new();
        assert_eq!(convert_to_db_format(&row).flow_direction().unwrap(), FlowDirection::Neither);
    }

    #[test]
    fn test_net_amount_overflow_is_an_error() {
        let mut row = sample_row();
        row.cad_amount = "70000000000000000000000000000".to_string();
        row.usd_amount = "70000000000000000000000000000".to_string();
        let tx = convert_to_db_format(&row);

        assert!(matches!(tx.net_amount(), Err(Error::Overflow(_))));
        assert!(tx.flow_direction().is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(""), Some(Decimal::ZERO));
        assert_eq!(parse_amount(" -54.32 "), Some(Decimal::new(-5432, 2)));
        assert_eq!(parse_amount("1e3"), Some(Decimal::new(1000, 0)));
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("1e30"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_month_bucket() {
        let tx = convert_to_db_format(&sample_row());
        assert_eq!(tx.month(), "2024-01");
    }
}
