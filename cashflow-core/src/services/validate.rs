//! Row validator - checks a sanitized row against a rule table

use chrono::NaiveDate;

use crate::domain::result::{Error, Result};
use crate::domain::{parse_amount, ColumnRule, FieldKind, ParsedRow};

/// Check every column of `row` against `rules`, in table order
///
/// Stops at the first violation. `index` is the 1-based data row used in
/// the error.
pub fn validate_row(row: &ParsedRow, index: usize, rules: &[ColumnRule]) -> Result<()> {
    for rule in rules {
        let value = row.get(rule.column);
        if let Some(reason) = violation(rule, value) {
            return Err(Error::Validation {
                row: index,
                column: rule.column.header(),
                value: value.to_string(),
                reason,
            });
        }
    }
    Ok(())
}

fn violation(rule: &ColumnRule, value: &str) -> Option<String> {
    if value.is_empty() {
        return (!rule.allow_empty).then(|| "must not be empty".to_string());
    }

    match rule.kind {
        FieldKind::String => None,
        FieldKind::Number => parse_amount(value)
            .is_none()
            .then(|| "must be a decimal number".to_string()),
        FieldKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .err()
            .map(|_| "must be a valid YYYY-MM-DD date".to_string()),
    }
}
