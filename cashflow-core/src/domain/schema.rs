//! Statement column schema and the per-column rule table
//!
//! Both the header list and the rule table are immutable statics. Callers
//! pass them by reference into the header check and the row validator.

use serde::Serialize;

use super::result::{Error, Result};

/// One of the eight statement columns, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    AccountType,
    AccountNumber,
    TransactionDate,
    ChequeNumber,
    Description1,
    Description2,
    CadAmount,
    UsdAmount,
}

impl Column {
    /// All columns in the order a statement file must declare them
    pub const ALL: [Column; 8] = [
        Column::AccountType,
        Column::AccountNumber,
        Column::TransactionDate,
        Column::ChequeNumber,
        Column::Description1,
        Column::Description2,
        Column::CadAmount,
        Column::UsdAmount,
    ];

    /// Header name as it appears in the CSV file
    pub fn header(&self) -> &'static str {
        match self {
            Column::AccountType => "Account Type",
            Column::AccountNumber => "Account Number",
            Column::TransactionDate => "Transaction Date",
            Column::ChequeNumber => "Cheque Number",
            Column::Description1 => "Description 1",
            Column::Description2 => "Description 2",
            Column::CadAmount => "CAD$",
            Column::UsdAmount => "USD$",
        }
    }

    /// Field name in the persisted record
    pub fn db_field(&self) -> &'static str {
        match self {
            Column::AccountType => "accountType",
            Column::AccountNumber => "accountNumber",
            Column::TransactionDate => "transactionDate",
            Column::ChequeNumber => "chequeNumber",
            Column::Description1 => "description1",
            Column::Description2 => "description2",
            Column::CadAmount => "cadAmount",
            Column::UsdAmount => "usdAmount",
        }
    }
}

/// Required header row, exactly as a statement file must declare it
pub static REQUIRED_HEADERS: [&str; 8] = [
    "Account Type",
    "Account Number",
    "Transaction Date",
    "Cheque Number",
    "Description 1",
    "Description 2",
    "CAD$",
    "USD$",
];

/// Value type a column must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Date,
}

/// Validation rule for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub column: Column,
    pub kind: FieldKind,
    pub allow_empty: bool,
}

/// The canonical rule table, one entry per column in schema order
///
/// Description 1 is the only free-text column that must be filled in;
/// Cheque Number and Description 2 are optional, as are both amounts.
pub static RULE_TABLE: [ColumnRule; 8] = [
    ColumnRule {
        column: Column::AccountType,
        kind: FieldKind::String,
        allow_empty: false,
    },
    ColumnRule {
        column: Column::AccountNumber,
        kind: FieldKind::String,
        allow_empty: false,
    },
    ColumnRule {
        column: Column::TransactionDate,
        kind: FieldKind::Date,
        allow_empty: false,
    },
    ColumnRule {
        column: Column::ChequeNumber,
        kind: FieldKind::String,
        allow_empty: true,
    },
    ColumnRule {
        column: Column::Description1,
        kind: FieldKind::String,
        allow_empty: false,
    },
    ColumnRule {
        column: Column::Description2,
        kind: FieldKind::String,
        allow_empty: true,
    },
    ColumnRule {
        column: Column::CadAmount,
        kind: FieldKind::Number,
        allow_empty: true,
    },
    ColumnRule {
        column: Column::UsdAmount,
        kind: FieldKind::Number,
        allow_empty: true,
    },
];

/// Check a decoded header row against the expected schema
///
/// Succeeds only when both lists have the same length and the same names in
/// the same order. Extra, missing, renamed or reordered columns all fail.
pub fn check_headers(actual: &[String], expected: &[&str]) -> Result<()> {
    let matches = actual.len() == expected.len()
        && actual.iter().zip(expected).all(|(a, e)| a == e);

    if matches {
        Ok(())
    } else {
        Err(Error::Schema {
            expected: expected.iter().map(|h| h.to_string()).collect(),
            actual: actual.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_required_headers_follow_column_order() {
        for (column, header) in Column::ALL.iter().zip(REQUIRED_HEADERS.iter()) {
            assert_eq!(column.header(), *header);
        }
        for (column, rule) in Column::ALL.iter().zip(RULE_TABLE.iter()) {
            assert_eq!(*column, rule.column);
        }
    }

    #[test]
    fn test_exact_headers_pass() {
        assert!(check_headers(&headers(&REQUIRED_HEADERS), &REQUIRED_HEADERS).is_ok());
    }

    #[test]
    fn test_swapped_amount_columns_fail() {
        let mut swapped = headers(&REQUIRED_HEADERS);
        swapped.swap(6, 7);
        let err = check_headers(&swapped, &REQUIRED_HEADERS).unwrap_err();
        match err {
            Error::Schema { expected, actual } => {
                assert_eq!(expected[6], "CAD$");
                assert_eq!(actual[6], "USD$");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_missing_and_renamed_columns_fail() {
        let mut extra = headers(&REQUIRED_HEADERS);
        extra.push("Balance".to_string());
        assert!(check_headers(&extra, &REQUIRED_HEADERS).is_err());

        let missing = headers(&REQUIRED_HEADERS[..7]);
        assert!(check_headers(&missing, &REQUIRED_HEADERS).is_err());

        let mut renamed = headers(&REQUIRED_HEADERS);
        renamed[4] = "Description".to_string();
        assert!(check_headers(&renamed, &REQUIRED_HEADERS).is_err());

        assert!(check_headers(&[], &REQUIRED_HEADERS).is_err());
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let mut lowered = headers(&REQUIRED_HEADERS);
        lowered[0] = "account type".to_string();
        assert!(check_headers(&lowered, &REQUIRED_HEADERS).is_err());
    }
}
