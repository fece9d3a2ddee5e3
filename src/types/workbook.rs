use serde::{Deserialize, Serialize};

use super::{CellColorMap, Dataset, Row};

/// A decoded spreadsheet file: one or more sheets in workbook order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<DecodedSheet>,
}

/// One decoded sheet in the decoder output format.
///
/// `rows[0]` is the header row. `cell_colors` is `None` when no cell in
/// the sheet carries an explicit background.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedSheet {
    pub name: String,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cell_colors: Option<CellColorMap>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }
}

impl DecodedSheet {
    /// Build the header/data split used by the table engine.
    pub fn dataset(&self) -> Dataset {
        Dataset::from_sheet_rows(self.rows.clone())
    }
}
