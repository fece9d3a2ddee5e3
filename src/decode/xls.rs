//! Legacy BIFF `.xls` decoding through calamine. Values only; the format's
//! fills are not read, so sheets carry no colours.

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls};
use std::io::Cursor;

use crate::error::Result;
use crate::types::{CellValue, DecodedSheet, Row, Workbook};

pub fn decode_xls(data: &[u8]) -> Result<Workbook> {
    let mut workbook: Xls<_> = open_workbook_from_rs(Cursor::new(data))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names().to_owned() {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(DecodedSheet {
            rows: range_rows(&range),
            name,
            cell_colors: None,
        });
    }
    Ok(Workbook { sheets })
}

/// Rows of the used range, anchored at its first cell like `.xlsx` sheets.
fn range_rows(range: &Range<Data>) -> Vec<Row> {
    range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::default(),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(true) => "TRUE".into(),
        Data::Bool(false) => "FALSE".into(),
        Data::DateTime(serial) => CellValue::Number(serial.as_f64()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::XltableError;

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::from("TRUE"));
        assert_eq!(cell_value(&Data::Empty), CellValue::default());
        assert_eq!(
            cell_value(&Data::String("Sym".into())),
            CellValue::from("Sym")
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = decode_xls(b"definitely not a compound document").unwrap_err();
        assert!(matches!(err, XltableError::Xls(_)));
        assert!(err.is_decode_failure());
    }
}
