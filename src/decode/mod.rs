//! Spreadsheet decoding.
//!
//! Turns the bytes of an `.xlsx`, `.xls` or `.csv` file into a [`Workbook`]
//! of sheets whose row 0 is the header, plus sparse cell background colours
//! where the format carries them.

mod color;
mod csv;
mod xls;
mod xlsx;
mod xml;

use std::fmt;
use std::path::Path;

use crate::error::{Result, XltableError};
use crate::types::Workbook;

pub use color::{apply_tint, normalize_hex, resolve_color, ColorSpec, Palette};
pub use csv::{decode_csv, CSV_SHEET_NAME};
pub use xls::decode_xls;
pub use xlsx::decode_xlsx;

/// Accepted source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Xlsx,
    Xls,
    Csv,
}

impl FileKind {
    /// Detect the format from a file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "csv" => Ok(Self::Csv),
            _ => Err(XltableError::UnsupportedFileType(if ext.is_empty() {
                file_name.to_string()
            } else {
                format!(".{ext}")
            })),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decode a file by its name's extension.
///
/// # Errors
/// [`XltableError::UnsupportedFileType`] for unknown extensions; a decode
/// error for malformed content or a workbook without sheets.
pub fn decode(file_name: &str, data: &[u8]) -> Result<Workbook> {
    let kind = FileKind::from_file_name(file_name)?;
    decode_kind(kind, data)
}

/// Decode bytes of a known format.
pub fn decode_kind(kind: FileKind, data: &[u8]) -> Result<Workbook> {
    let workbook = match kind {
        FileKind::Xlsx => decode_xlsx(data)?,
        FileKind::Xls => decode_xls(data)?,
        FileKind::Csv => decode_csv(data)?,
    };

    if workbook.sheets.is_empty() {
        return Err(XltableError::Decode("workbook contains no sheets".into()));
    }

    log::info!(
        "decoded {kind} file: {} sheet(s) [{}], {} bytes",
        workbook.sheets.len(),
        workbook.sheet_names().join(", "),
        data.len()
    );
    Ok(workbook)
}
