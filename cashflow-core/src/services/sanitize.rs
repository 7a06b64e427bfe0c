//! Row sanitizer - trims fields and canonicalizes the transaction date

use chrono::NaiveDate;

use crate::domain::result::{Error, Result};
use crate::domain::{Column, ParsedRow, RawRecord, RowId};

const CANONICAL_DATE: &str = "%Y-%m-%d";

/// Turn a decoded record into a sanitized row carrying `id`
///
/// Every field is trimmed and the transaction date is rewritten as
/// `YYYY-MM-DD`. Amounts are only trimmed.
pub fn sanitize(raw: &RawRecord, id: RowId) -> Result<ParsedRow> {
    normalize(id.into_string(), raw.row, |column| raw.get(column.header()).to_string())
}

/// Sanitize an already-parsed row again, keeping its id
///
/// A no-op on rows that came out of [`sanitize`].
pub fn resanitize(row: &ParsedRow, index: usize) -> Result<ParsedRow> {
    normalize(row.id.clone(), index, |column| row.get(column).to_string())
}

fn normalize(id: String, index: usize, value: impl Fn(Column) -> String) -> Result<ParsedRow> {
    let field = |column: Column| value(column).trim().to_string();

    let raw_date = field(Column::TransactionDate);
    let transaction_date = canonical_date(&raw_date).ok_or(Error::Format {
        row: index,
        value: raw_date.clone(),
    })?;

    Ok(ParsedRow {
        id,
        account_type: field(Column::AccountType),
        account_number: field(Column::AccountNumber),
        transaction_date,
        cheque_number: field(Column::ChequeNumber),
        description1: field(Column::Description1),
        description2: field(Column::Description2),
        cad_amount: field(Column::CadAmount),
        usd_amount: field(Column::UsdAmount),
    })
}

/// Canonical `YYYY-MM-DD` form of a statement date
///
/// Accepts `M/D/YYYY` or `M/D/YY` (two-digit years land in 2000-2099), and
/// dates already in canonical form. Returns `None` unless the input is three
/// numeric components naming a real calendar date.
pub fn canonical_date(value: &str) -> Option<String> {
    if is_canonical(value) {
        return Some(value.to_string());
    }

    let mut parts = value.split('/');
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let month: u32 = numeric(month, 1..=2)?.parse().ok()?;
    let day: u32 = numeric(day, 1..=2)?.parse().ok()?;
    let year: i32 = match year.len() {
        2 => 2000 + numeric(year, 2..=2)?.parse::<i32>().ok()?,
        4 => numeric(year, 4..=4)?.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format(CANONICAL_DATE).to_string())
}

fn is_canonical(value: &str) -> bool {
    NaiveDate::parse_from_str(value, CANONICAL_DATE)
        .map(|d| d.format(CANONICAL_DATE).to_string() == value)
        .unwrap_or(false)
}

fn numeric(part: &str, len: std::ops::RangeInclusive<usize>) -> Option<&str> {
    (len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())).then_some(part)
}
