//! RFC 4180 CSV reader producing a single-sheet [`Workbook`].
//!
//! Every field stays text, numbers included. Quoted fields may contain
//! commas, doubled quotes and line breaks. Blank lines are skipped.

use crate::error::{Result, XltableError};
use crate::types::{CellValue, DecodedSheet, Row, Workbook};

/// Name given to the only sheet of a CSV file.
pub const CSV_SHEET_NAME: &str = "Sheet1";

pub fn decode_csv(data: &[u8]) -> Result<Workbook> {
    let text = std::str::from_utf8(data)
        .map_err(|e| XltableError::Decode(format!("CSV is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

    let rows = split_records(text, ',')
        .into_iter()
        .filter(|record| !is_blank(record))
        .map(|record| record.into_iter().map(CellValue::Text).collect::<Row>())
        .collect();

    Ok(Workbook {
        sheets: vec![DecodedSheet {
            name: CSV_SHEET_NAME.to_string(),
            rows,
            cell_colors: None,
        }],
    })
}

/// A line with nothing on it parses as one empty field.
fn is_blank(record: &[String]) -> bool {
    matches!(record, [only] if only.is_empty())
}

/// Split text into records of fields, honouring quotes across line breaks.
fn split_records(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else if ch == '\r' || ch == '\n' {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            fields.push(std::mem::take(&mut current));
            records.push(std::mem::take(&mut fields));
        } else {
            current.push(ch);
        }
    }

    // final record without a trailing newline
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }
    records
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn texts(wb: &Workbook) -> Vec<Vec<String>> {
        wb.sheets[0]
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_quoted_fields_and_embedded_newline() {
        let wb = decode_csv(b"Name,Note\r\n\"Al, pha\",\"He said \"\"hi\"\"\"\n\"two\nlines\",x\n").unwrap();
        assert_eq!(
            texts(&wb),
            vec![
                vec!["Name", "Note"],
                vec!["Al, pha", "He said \"hi\""],
                vec!["two\nlines", "x"],
            ]
        );
    }

    #[test]
    fn test_bom_blank_lines_and_numbers_as_text() {
        let wb = decode_csv("\u{FEFF}Sym,Qty\n\nAAPL,10\n\r\nMSFT,5".as_bytes()).unwrap();
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.name, "Sheet1");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0][0], CellValue::from("Sym"));
        assert_eq!(sheet.rows[1][1], CellValue::Text("10".into()));
        assert!(sheet.cell_colors.is_none());
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let wb = decode_csv(b"a,,c\n,,\n").unwrap();
        assert_eq!(texts(&wb), vec![vec!["a", "", "c"], vec!["", "", ""]]);
    }

    #[test]
    fn test_invalid_utf8_is_a_decode_error() {
        let err = decode_csv(&[0xFF, 0xFE, b'a']).unwrap_err();
        assert!(matches!(err, XltableError::Decode(_)));
    }

    #[test]
    fn test_empty_input() {
        let wb = decode_csv(b"").unwrap();
        assert!(wb.sheets[0].rows.is_empty());
    }
}
