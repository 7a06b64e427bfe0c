//! Tabular decoder - CSV bytes to header-keyed records
//!
//! No semantic checks happen here: the header row is returned as found and
//! every field stays a string.

use csv::ReaderBuilder;

use crate::domain::result::Result;
use crate::domain::RawRecord;

/// A decoded CSV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    /// Header names in file order, BOM and surrounding whitespace removed
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Decode comma-separated bytes with a header row
///
/// Blank lines are skipped. A record with a different field count than the
/// header row, or invalid UTF-8, fails the whole decode.
pub fn decode(bytes: &[u8]) -> Result<DecodedTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        records.push(RawRecord::from_fields(index + 1, line, &headers, record.iter()));
    }

    Ok(DecodedTable { headers, records })
}

fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Error;

    const HEADER: &str = "Account Type,Account Number,Transaction Date,Cheque Number,Description 1,Description 2,CAD$,USD$";

    #[test]
    fn test_decode_keys_records_by_header() {
        let input = format!("{HEADER}\nChequing,12345,01/15/2024,,Grocery Store,,-54.32,\n");
        let table = decode(input.as_bytes()).unwrap();

        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.records.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.row, 1);
        assert_eq!(record.line, 2);
        assert_eq!(record.get("Description 1"), "Grocery Store");
        assert_eq!(record.get("CAD$"), "-54.32");
        assert_eq!(record.get("USD$"), "");
    }

    #[test]
    fn test_bom_and_header_whitespace_are_stripped() {
        let input = "\u{feff} Account Type , CAD$ \nChequing,1.00\n";
        let table = decode(input.as_bytes()).unwrap();
        assert_eq!(table.headers, ["Account Type", "CAD$"]);
        assert_eq!(table.records[0].get("Account Type"), "Chequing");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "a,b\n\n1,2\n\n3,4\n";
        let table = decode(input.as_bytes()).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].row, 2);
        assert_eq!(table.records[1].get("b"), "4");
    }

    #[test]
    fn test_quoted_fields_keep_commas_and_newlines() {
        let input = "a,b\n\"Smith, J\",\"line one\nline two\"\n";
        let table = decode(input.as_bytes()).unwrap();
        assert_eq!(table.records[0].get("a"), "Smith, J");
        assert_eq!(table.records[0].get("b"), "line one\nline two");
    }

    #[test]
    fn test_ragged_row_is_decode_error() {
        let input = "a,b\n1,2\n3\n";
        let err = decode(input.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.line().is_some());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let input: &[u8] = b"a,b\n\xff\xfe,2\n";
        assert!(matches!(decode(input), Err(Error::Decode(_))));
    }

    #[test]
    fn test_header_only_file_has_no_records() {
        let table = decode(format!("{HEADER}\n").as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 8);
        assert!(table.records.is_empty());
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let table = decode(b"").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.records.is_empty());
    }
}
