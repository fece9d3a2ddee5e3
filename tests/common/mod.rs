//! Common test utilities and assertion helpers.
//!
//! Builders for small datasets and engines, plus accessors that turn the
//! engine's view into plain vectors for comparison.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

// Re-export fixtures for convenience
pub use super::fixtures::*;

use xltable::engine::TableStateEngine;
use xltable::types::{CellColorMap, CellValue, Dataset, Row};
use xltable::TableConfig;

// ============================================================================
// Dataset builders
// ============================================================================

/// Dataset from header names and rows of cells.
pub fn dataset(headers: &[&str], rows: Vec<Row>) -> Dataset {
    Dataset::new(headers.iter().map(|h| CellValue::from(*h)).collect(), rows)
}

/// The four-row trades sheet: Sym/Qty with one non-numeric quantity.
pub fn trades() -> Dataset {
    dataset(
        &["Sym", "Qty"],
        vec![
            vec!["AAPL".into(), 10.into()],
            vec!["MSFT".into(), 5.into()],
            vec!["AAPL".into(), 3.into()],
            vec!["NVDA".into(), "x".into()],
        ],
    )
}

/// Single-column dataset of text values.
pub fn column(header: &str, values: &[&str]) -> Dataset {
    dataset(
        &[header],
        values.iter().map(|v| vec![CellValue::from(*v)]).collect(),
    )
}

/// Colour map keyed by data row: `(orig_idx, col, colour)`.
pub fn colors(entries: &[(usize, usize, &str)]) -> CellColorMap {
    let mut map = CellColorMap::new();
    for &(orig, col, color) in entries {
        map.insert(orig + 1, col, color);
    }
    map
}

// ============================================================================
// Engine helpers
// ============================================================================

pub fn engine(dataset: Dataset) -> TableStateEngine {
    TableStateEngine::new(dataset, None, TableConfig::default())
}

pub fn colored_engine(dataset: Dataset, colors: &CellColorMap) -> TableStateEngine {
    TableStateEngine::new(dataset, Some(colors), TableConfig::default())
}

/// Visible original indices as an owned vector.
pub fn visible(engine: &TableStateEngine) -> Vec<usize> {
    engine.visible_orig_indices().to_vec()
}

/// Display text of one column over the visible rows.
pub fn column_texts(engine: &TableStateEngine, col: usize) -> Vec<String> {
    engine
        .visible_orig_indices()
        .iter()
        .map(|&orig| engine.dataset().cell(orig, col).to_string())
        .collect()
}

/// Owned allow-set for `apply_filter`.
pub fn allow(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| (*v).to_string()).collect())
}
