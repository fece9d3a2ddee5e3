//! xltable - spreadsheet table engine for the web
//!
//! Loads an `.xlsx`, `.xls` or `.csv` file in the browser via WebAssembly
//! and turns its sheets into an interactive table:
//! - Free-text search, per-column value filters and a colour filter
//! - Stable column sort and colour sort
//! - Checkbox selection with shift ranges, soft deletion
//! - Hidden, pinned and resizable columns
//! - Sum/avg/count/min/max footer and CSV export of the current view
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableView } from 'xltable';
//! await init();
//! const view = new TableView();
//! view.load(file.name, new Uint8Array(await file.arrayBuffer()));
//! view.set_search('aapl');
//! render(view.snapshot());
//! ```

pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod export;
pub mod layout;
pub mod types;
pub mod value;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{FilterUniverse, TableConfig, WidthConfig};
pub use engine::{TableSnapshot, TableStateEngine};
pub use error::{Result, XltableError};
pub use viewer::TableView;

pub use types::*;

/// Decode a spreadsheet and return its sheets as a JSON string
///
/// # Arguments
/// * `file_name` - Used only for its extension (`.xlsx`, `.xls`, `.csv`)
/// * `data` - The raw bytes of the file
///
/// # Errors
/// Returns an error for unsupported extensions or malformed content.
#[wasm_bindgen]
pub fn decode_to_json(file_name: &str, data: &[u8]) -> std::result::Result<String, JsValue> {
    let workbook = decode::decode(file_name, data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&workbook)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Decode a spreadsheet and return the workbook as a `JsValue`
///
/// # Errors
/// Returns an error for unsupported extensions or malformed content.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn decode_to_js(file_name: &str, data: &[u8]) -> std::result::Result<JsValue, JsValue> {
    let workbook = decode::decode(file_name, data)?;
    serde_wasm_bindgen::to_value(&workbook)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
