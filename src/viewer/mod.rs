//! `TableView`: the object JavaScript holds.
//!
//! Owns the decoded workbook, the active sheet index and one
//! [`TableStateEngine`] built from that sheet. Switching sheets or loading a
//! new file rebuilds the engine, so every filter, sort, selection, deletion,
//! hidden column, pin and width override starts fresh.
//!
//! Methods shared by both targets live in one `#[wasm_bindgen]` block. The
//! few that return `JsValue` on wasm32 have a native twin returning crate
//! types instead.

use wasm_bindgen::prelude::*;

use crate::config::TableConfig;
use crate::decode;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::TableSnapshot;
use crate::engine::{SortDirection, SummaryMode, TableStateEngine};
use crate::error::Result;
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::types::Workbook;

#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct TableView {
    config: TableConfig,
    workbook: Option<Workbook>,
    active_sheet: usize,
    engine: Option<TableStateEngine>,
}

impl TableView {
    fn load_workbook(&mut self, file_name: &str, data: &[u8]) -> Result<()> {
        // decode first so a failure leaves the current state alone
        let workbook = decode::decode(file_name, data)?;
        log::info!("loaded {file_name}: sheets {:?}", workbook.sheet_names());
        self.workbook = Some(workbook);
        self.active_sheet = 0;
        self.rebuild_engine();
        Ok(())
    }

    fn rebuild_engine(&mut self) {
        self.engine = self
            .workbook
            .as_ref()
            .and_then(|wb| wb.sheets.get(self.active_sheet))
            .map(|sheet| {
                TableStateEngine::new(
                    sheet.dataset(),
                    sheet.cell_colors.as_ref(),
                    self.config.clone(),
                )
            });
    }

    fn with_engine(&mut self, f: impl FnOnce(&mut TableStateEngine)) {
        if let Some(engine) = self.engine.as_mut() {
            f(engine);
        }
    }

    /// Viewer with an explicit configuration.
    #[must_use]
    pub fn with_table_config(config: TableConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Engine of the active sheet, once a file is loaded.
    pub fn engine(&self) -> Option<&TableStateEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut TableStateEngine> {
        self.engine.as_mut()
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }

    pub fn table_config(&self) -> &TableConfig {
        &self.config
    }
}

// ============================================================================
// Shared API
// ============================================================================

#[wasm_bindgen]
impl TableView {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> TableView {
        console_error_panic_hook::set_once();
        Self::default()
    }

    /// Drop the workbook and all table state.
    pub fn reset(&mut self) {
        self.workbook = None;
        self.engine = None;
        self.active_sheet = 0;
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook
            .as_ref()
            .map(Workbook::sheet_names)
            .unwrap_or_default()
    }

    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    /// Switch sheets. Returns false for an index past the last sheet.
    pub fn set_active_sheet(&mut self, index: usize) -> bool {
        let count = self.workbook.as_ref().map_or(0, |wb| wb.sheets.len());
        if index >= count {
            return false;
        }
        if index != self.active_sheet || self.engine.is_none() {
            log::debug!("switching to sheet {index}");
            self.active_sheet = index;
            self.rebuild_engine();
        }
        true
    }

    // ---- rows ----

    pub fn set_search(&mut self, text: &str) {
        self.with_engine(|e| e.set_search(text));
    }

    pub fn toggle_sort(&mut self, col: usize) {
        self.with_engine(|e| e.toggle_sort(col));
    }

    pub fn apply_filter(&mut self, col: usize, values: Vec<String>) {
        self.with_engine(|e| e.apply_filter(col, Some(values)));
    }

    pub fn clear_filter(&mut self, col: usize) {
        self.with_engine(|e| e.apply_filter::<Vec<String>>(col, None));
    }

    pub fn clear_filters(&mut self) {
        self.with_engine(TableStateEngine::clear_filters);
    }

    /// Values offered in a column's filter dropdown.
    pub fn filter_options(&self, col: usize) -> Vec<String> {
        self.engine
            .as_ref()
            .map(|e| e.option_values(col))
            .unwrap_or_default()
    }

    pub fn toggle_color_sort(&mut self) {
        self.with_engine(TableStateEngine::toggle_color_sort);
    }

    /// `"asc"`, `"desc"` or `None` to turn colour sorting off. Returns false
    /// for an unknown direction.
    pub fn set_color_sort(&mut self, direction: Option<String>) -> bool {
        let parsed = match direction.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<SortDirection>() {
                Ok(dir) => Some(dir),
                Err(_) => return false,
            },
        };
        self.with_engine(|e| e.set_color_sort(parsed));
        true
    }

    pub fn toggle_color_filter(&mut self, color: &str) {
        self.with_engine(|e| e.toggle_color_filter(color));
    }

    pub fn clear_color_filter(&mut self) {
        self.with_engine(TableStateEngine::clear_color_filter);
    }

    // ---- selection ----

    pub fn toggle_row(&mut self, pos: usize, shift: bool) {
        self.with_engine(|e| e.toggle_row(pos, shift));
    }

    pub fn select_all_visible(&mut self) {
        self.with_engine(TableStateEngine::select_all_visible);
    }

    pub fn deselect_all(&mut self) {
        self.with_engine(TableStateEngine::deselect_all);
    }

    pub fn delete_selected(&mut self) {
        self.with_engine(TableStateEngine::delete_selected);
    }

    // ---- columns ----

    pub fn toggle_column(&mut self, col: usize) {
        self.with_engine(|e| e.toggle_column(col));
    }

    pub fn show_all_columns(&mut self) {
        self.with_engine(TableStateEngine::show_all_columns);
    }

    pub fn hide_all_columns(&mut self) {
        self.with_engine(TableStateEngine::hide_all_columns);
    }

    pub fn begin_resize(&mut self, col: usize, pointer_x: f32) {
        self.with_engine(|e| e.begin_resize(col, pointer_x));
    }

    /// Width to draw while dragging, or `None` outside a drag.
    pub fn drag_resize(&self, pointer_x: f32) -> Option<f32> {
        self.engine
            .as_ref()
            .and_then(|e| e.drag_resize(pointer_x))
            .map(|(_, width)| width)
    }

    /// Commit the drag. Returns the stored width.
    pub fn end_resize(&mut self, pointer_x: f32) -> Option<f32> {
        self.engine
            .as_mut()
            .and_then(|e| e.end_resize(pointer_x))
            .map(|(_, width)| width)
    }

    pub fn cancel_resize(&mut self) {
        self.with_engine(TableStateEngine::cancel_resize);
    }

    pub fn reset_widths(&mut self) {
        self.with_engine(TableStateEngine::reset_widths);
    }

    pub fn add_pin(&mut self) {
        self.with_engine(TableStateEngine::add_pin);
    }

    pub fn remove_pin(&mut self) {
        self.with_engine(TableStateEngine::remove_pin);
    }

    pub fn reset_pins(&mut self) {
        self.with_engine(TableStateEngine::reset_pins);
    }

    // ---- summary ----

    pub fn cycle_summary(&mut self) {
        self.with_engine(TableStateEngine::cycle_summary);
    }

    /// Returns false for an unknown mode name.
    pub fn set_summary_mode(&mut self, mode: &str) -> bool {
        match mode.parse::<SummaryMode>() {
            Ok(mode) => {
                self.with_engine(|e| e.set_summary_mode(mode));
                true
            }
            Err(_) => false,
        }
    }

    // ---- output ----

    /// CSV of the current view. Empty when nothing is loaded.
    pub fn export_csv(&self) -> String {
        self.engine
            .as_ref()
            .map(TableStateEngine::export_csv)
            .unwrap_or_default()
    }

    pub fn export_filename(&self) -> String {
        DEFAULT_EXPORT_FILENAME.to_string()
    }

    /// Render snapshot as JSON text, `"null"` before a file is loaded.
    pub fn snapshot_json(&self) -> String {
        let snapshot = self.engine.as_ref().map(TableStateEngine::snapshot);
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("snapshot serialization failed: {e}");
            String::from("null")
        })
    }
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl TableView {
    /// Viewer with a partial `TableConfig` object; missing fields keep
    /// their defaults.
    pub fn with_config(config: JsValue) -> std::result::Result<TableView, JsValue> {
        console_error_panic_hook::set_once();
        let config: TableConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        Ok(Self::with_table_config(config))
    }

    /// Decode a file and show its first sheet.
    pub fn load(&mut self, file_name: &str, data: &[u8]) -> std::result::Result<(), JsValue> {
        self.load_workbook(file_name, data).map_err(JsValue::from)
    }

    pub fn snapshot(&self) -> std::result::Result<JsValue, JsValue> {
        let snapshot = self.engine.as_ref().map(TableStateEngine::snapshot);
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

// ============================================================================
// Native Implementation
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl TableView {
    pub fn with_config(config: TableConfig) -> Self {
        Self::with_table_config(config)
    }

    /// Decode a file and show its first sheet.
    ///
    /// # Errors
    /// Unsupported extension or malformed content. The previous workbook
    /// and engine are kept.
    pub fn load(&mut self, file_name: &str, data: &[u8]) -> Result<()> {
        self.load_workbook(file_name, data)
    }

    pub fn snapshot(&self) -> Option<TableSnapshot> {
        self.engine.as_ref().map(TableStateEngine::snapshot)
    }
}
