use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::cell::{CellValue, EMPTY_CELL};

/// One row of cells. Rows may be shorter than the header.
pub type Row = Vec<CellValue>;

/// Header plus data rows of one sheet, immutable while the sheet is active.
///
/// `rows[i]` keeps original index `i` for the lifetime of the sheet. That
/// index is the join key for colours, selection and deletion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Row,
    rows: Vec<Row>,
    column_count: usize,
}

impl Dataset {
    pub fn new(headers: Row, rows: Vec<Row>) -> Self {
        let column_count = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        Self {
            headers,
            rows,
            column_count,
        }
    }

    /// Split raw sheet rows into the header (row 0) and data rows.
    pub fn from_sheet_rows(mut sheet_rows: Vec<Row>) -> Self {
        if sheet_rows.is_empty() {
            return Self::default();
        }
        let rows = sheet_rows.split_off(1);
        let headers = sheet_rows.pop().unwrap_or_default();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[CellValue] {
        &self.headers
    }

    /// Header cell for a column; empty when the header row is short.
    pub fn header(&self, col: usize) -> &CellValue {
        self.headers.get(col).unwrap_or(&EMPTY_CELL)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, orig_idx: usize) -> Option<&[CellValue]> {
        self.rows.get(orig_idx).map(Vec::as_slice)
    }

    /// Cell at (original row, column); missing trailing cells read as empty.
    pub fn cell(&self, orig_idx: usize, col: usize) -> &CellValue {
        self.rows
            .get(orig_idx)
            .and_then(|row| row.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest of the header and every data row.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sparse background colours keyed by (sheet row, column).
///
/// Sheet row 0 is the header; data row `i` lives at sheet row `i + 1`.
/// Serializes as `{"row,col": "#rrggbb"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, String>",
    try_from = "BTreeMap<String, String>"
)]
pub struct CellColorMap {
    colors: HashMap<(usize, usize), String>,
}

impl CellColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet_row: usize, col: usize, color: impl Into<String>) {
        self.colors.insert((sheet_row, col), color.into());
    }

    pub fn get(&self, sheet_row: usize, col: usize) -> Option<&str> {
        self.colors.get(&(sheet_row, col)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl From<CellColorMap> for BTreeMap<String, String> {
    fn from(map: CellColorMap) -> Self {
        map.colors
            .into_iter()
            .map(|((row, col), color)| (format!("{row},{col}"), color))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, String>> for CellColorMap {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for (key, color) in raw {
            let parsed = key
                .split_once(',')
                .and_then(|(r, c)| Some((r.trim().parse().ok()?, c.trim().parse().ok()?)));
            let Some((row, col)) = parsed else {
                return Err(format!("invalid cell colour key: {key:?}"));
            };
            map.insert(row, col, color);
        }
        Ok(map)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sheet_rows_splits_header() {
        let ds = Dataset::from_sheet_rows(vec![
            vec!["Sym".into(), "Qty".into()],
            vec!["AAPL".into(), 10.into()],
            vec!["MSFT".into()],
        ]);
        assert_eq!(ds.headers().len(), 2);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        // short row reads as empty
        assert_eq!(ds.cell(1, 1), &CellValue::default());
        assert_eq!(ds.cell(9, 0), &CellValue::default());
    }

    #[test]
    fn test_column_count_covers_wide_rows() {
        let ds = Dataset::new(vec!["A".into()], vec![vec!["1".into(), "2".into(), "3".into()]]);
        assert_eq!(ds.column_count(), 3);
        assert!(ds.header(2).is_empty());
    }

    #[test]
    fn test_empty_sheet() {
        let ds = Dataset::from_sheet_rows(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.column_count(), 0);
    }

    #[test]
    fn test_color_map_serde_keys() {
        let mut map = CellColorMap::new();
        map.insert(1, 0, "#FF0000");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"1,0":"#FF0000"}"##);

        let back: CellColorMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(1, 0), Some("#FF0000"));
        assert!(serde_json::from_str::<CellColorMap>(r##"{"x":"#000000"}"##).is_err());
    }
}
