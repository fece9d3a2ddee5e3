//! Structured error types for xltable.
//!
//! Only loading a file can fail. Every table operation after a successful
//! load works on in-memory state and is infallible.

/// All errors that can occur while loading a spreadsheet into the table engine.
#[derive(Debug, thiserror::Error)]
pub enum XltableError {
    /// The file extension is not one of `.xlsx`, `.xls`, `.csv`.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Malformed or corrupt file content.
    #[error("Decode error: {0}")]
    Decode(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Legacy `.xls` workbook error.
    #[error("XLS workbook: {0}")]
    Xls(#[from] calamine::XlsError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl XltableError {
    /// True for errors raised while reading file content, as opposed to
    /// rejecting the file up front by its extension.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        !matches!(self, Self::UnsupportedFileType(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XltableError>;

#[cfg(target_arch = "wasm32")]
impl From<XltableError> for wasm_bindgen::JsValue {
    fn from(e: XltableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
