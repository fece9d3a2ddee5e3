//! Table state engine.
//!
//! [`TableStateEngine`] owns one sheet's dataset and every interactive
//! controller. Each command mutates exactly one controller; commands that
//! feed the row pipeline then recompute the visible rows in full through
//! [`pipeline::compute`].
//!
//! All commands are infallible. Out-of-range column or row arguments are
//! ignored.

pub mod color;
pub mod filter;
pub mod pipeline;
pub mod selection;
pub mod snapshot;
pub mod sort;
pub mod summary;

use std::collections::BTreeSet;

pub use color::{ColorFilter, ColorSort, RowColorIndex, NO_COLOR};
pub use filter::ColumnFilters;
pub use pipeline::PipelineInput;
pub use selection::Selection;
pub use snapshot::{ColumnSnapshot, Counts, RowSnapshot, TableSnapshot};
pub use sort::{ColumnSort, SortDirection, SortKey};
pub use summary::{SummaryMode, SummaryValue};

use crate::config::{FilterUniverse, TableConfig};
use crate::export::{export_headers, to_csv};
use crate::layout::{estimate_column_widths, ColumnResizeController, ColumnVisibility, PinController};
use crate::types::{CellColorMap, CellValue, Dataset};
use crate::value::is_numeric;

#[derive(Debug, Clone)]
pub struct TableStateEngine {
    dataset: Dataset,
    colors: RowColorIndex,
    config: TableConfig,

    // Pipeline inputs
    deleted: BTreeSet<usize>,
    search: String,
    filters: ColumnFilters,
    color_filter: ColorFilter,
    sort: ColumnSort,
    color_sort: ColorSort,

    // View state outside the pipeline
    selection: Selection,
    visibility: ColumnVisibility,
    pins: PinController,
    resize: ColumnResizeController,
    summary_mode: SummaryMode,

    /// Pipeline output: original indices in display order.
    visible: Vec<usize>,
}

impl TableStateEngine {
    /// Fresh engine for one sheet: nothing filtered, sorted, selected,
    /// deleted, hidden or pinned; widths at the estimate.
    pub fn new(dataset: Dataset, colors: Option<&CellColorMap>, config: TableConfig) -> Self {
        let row_colors = RowColorIndex::new(&dataset, colors);
        let estimate = estimate_column_widths(&dataset, &config.widths);
        let mut engine = Self {
            colors: row_colors,
            filters: ColumnFilters::new(&dataset),
            visibility: ColumnVisibility::new(dataset.column_count()),
            resize: ColumnResizeController::new(estimate, config.min_resize_width),
            deleted: BTreeSet::new(),
            search: String::new(),
            color_filter: ColorFilter::default(),
            sort: ColumnSort::default(),
            color_sort: ColorSort::default(),
            selection: Selection::default(),
            pins: PinController::default(),
            summary_mode: SummaryMode::None,
            visible: Vec::new(),
            dataset,
            config,
        };
        engine.recompute();
        log::debug!(
            "engine ready: {} rows x {} columns",
            engine.dataset.row_count(),
            engine.dataset.column_count()
        );
        engine
    }

    fn recompute(&mut self) {
        self.visible = pipeline::compute(&PipelineInput {
            dataset: &self.dataset,
            colors: &self.colors,
            deleted: &self.deleted,
            search: &self.search,
            filters: &self.filters,
            color_filter: &self.color_filter,
            sort: &self.sort,
            color_sort: &self.color_sort,
        });
        log::debug!(
            "pipeline: {} of {} rows visible",
            self.visible.len(),
            self.dataset.row_count()
        );
    }

    fn has_column(&self, col: usize) -> bool {
        col < self.dataset.column_count()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn row_colors(&self) -> &RowColorIndex {
        &self.colors
    }

    // ---- search ----

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: &str) {
        if self.search == text {
            return;
        }
        self.search = text.to_string();
        self.recompute();
    }

    // ---- column sort ----

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.key()
    }

    pub fn toggle_sort(&mut self, col: usize) {
        if !self.has_column(col) {
            return;
        }
        self.sort.toggle(col);
        log::debug!("sort: {:?}", self.sort.key());
        self.recompute();
    }

    pub fn set_sort(&mut self, key: Option<SortKey>) {
        if key.is_some_and(|k| !self.has_column(k.column)) {
            return;
        }
        self.sort.set(key);
        self.recompute();
    }

    // ---- column filters ----

    /// Set (`Some`) or clear (`None`) the allow-set of a column.
    pub fn apply_filter<I>(&mut self, col: usize, values: Option<I>)
    where
        I: IntoIterator<Item = String>,
    {
        if !self.has_column(col) {
            return;
        }
        self.filters.apply_filter(col, values);
        log::debug!("filter on column {col}: {:?}", self.filters.allowed(col));
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_active() {
            return;
        }
        self.filters.clear_all();
        self.recompute();
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.filters
    }

    /// Sorted distinct values over the whole sheet.
    pub fn unique_values(&self, col: usize) -> &[String] {
        self.filters.unique_values(col)
    }

    /// Options offered in a column's filter dropdown, following the
    /// configured [`FilterUniverse`].
    pub fn option_values(&self, col: usize) -> Vec<String> {
        match self.config.filter_universe {
            FilterUniverse::Static => self.unique_values(col).to_vec(),
            FilterUniverse::Narrowed => {
                if !self.has_column(col) {
                    return Vec::new();
                }
                let rows = (0..self.dataset.row_count()).filter(|i| {
                    !self.deleted.contains(i)
                        && self.filters.passes_except(&self.dataset, *i, Some(col))
                });
                filter::distinct_values(&self.dataset, rows, col)
            }
        }
    }

    // ---- colour filter / sort ----

    pub fn available_colors(&self) -> Vec<String> {
        self.colors.available_colors()
    }

    pub fn color_filter(&self) -> &ColorFilter {
        &self.color_filter
    }

    pub fn toggle_color_filter(&mut self, color: &str) {
        self.color_filter.toggle(color);
        log::debug!("colour filter: {:?}", self.color_filter.allowed());
        self.recompute();
    }

    pub fn clear_color_filter(&mut self) {
        if !self.color_filter.is_active() {
            return;
        }
        self.color_filter.clear();
        self.recompute();
    }

    pub fn color_sort(&self) -> Option<SortDirection> {
        self.color_sort.direction()
    }

    pub fn toggle_color_sort(&mut self) {
        self.color_sort.toggle();
        log::debug!("colour sort: {:?}", self.color_sort.direction());
        self.recompute();
    }

    pub fn set_color_sort(&mut self, direction: Option<SortDirection>) {
        self.color_sort.set(direction);
        self.recompute();
    }

    // ---- selection and deletion ----

    /// Click a row checkbox at visible position `pos`.
    pub fn toggle_row(&mut self, pos: usize, shift: bool) {
        if !self.selection.toggle(&self.visible, pos, shift) {
            log::debug!("ignoring row toggle at {pos}: only {} visible", self.visible.len());
        }
    }

    pub fn select_all_visible(&mut self) {
        self.selection.select_all(&self.visible);
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn all_visible_selected(&self) -> bool {
        self.selection.all_selected(&self.visible)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Move every selected row into the deleted set. Cannot be undone
    /// while this sheet stays loaded.
    pub fn delete_selected(&mut self) {
        let selected = self.selection.take();
        if selected.is_empty() {
            return;
        }
        log::debug!("deleting {} rows", selected.len());
        self.deleted.extend(selected);
        self.recompute();
    }

    pub fn deleted(&self) -> &BTreeSet<usize> {
        &self.deleted
    }

    // ---- column visibility ----

    pub fn toggle_column(&mut self, col: usize) {
        self.visibility.toggle(col);
    }

    pub fn show_all_columns(&mut self) {
        self.visibility.show_all();
    }

    pub fn hide_all_columns(&mut self) {
        self.visibility.hide_all();
    }

    pub fn is_hidden(&self, col: usize) -> bool {
        self.visibility.is_hidden(col)
    }

    pub fn visible_columns(&self) -> Vec<usize> {
        self.visibility.visible_columns()
    }

    // ---- resize ----

    pub fn column_width(&self, col: usize) -> f32 {
        self.resize.width(col)
    }

    pub fn begin_resize(&mut self, col: usize, pointer_x: f32) {
        if self.has_column(col) {
            self.resize.begin_resize(col, pointer_x);
        }
    }

    /// Live width while dragging; nothing is committed.
    pub fn drag_resize(&self, pointer_x: f32) -> Option<(usize, f32)> {
        self.resize.drag_to(pointer_x)
    }

    pub fn end_resize(&mut self, pointer_x: f32) -> Option<(usize, f32)> {
        self.resize.end_resize(pointer_x)
    }

    pub fn cancel_resize(&mut self) {
        self.resize.cancel_resize();
    }

    pub fn reset_widths(&mut self) {
        self.resize.reset_widths();
    }

    // ---- pinning ----

    pub fn pin_count(&self) -> usize {
        self.pins.count()
    }

    pub fn add_pin(&mut self) {
        let visible = self.visible_columns().len();
        self.pins.add(visible);
    }

    pub fn remove_pin(&mut self) {
        self.pins.remove();
    }

    pub fn reset_pins(&mut self) {
        self.pins.reset();
    }

    /// `(column, left offset)` for each pinned column.
    pub fn sticky_offsets(&self) -> Vec<(usize, f32)> {
        self.pins.sticky_offsets(&self.visible_columns(), &self.resize)
    }

    // ---- summary ----

    pub fn summary_mode(&self) -> SummaryMode {
        self.summary_mode
    }

    pub fn cycle_summary(&mut self) {
        self.summary_mode = self.summary_mode.next();
    }

    pub fn set_summary_mode(&mut self, mode: SummaryMode) {
        self.summary_mode = mode;
    }

    /// Footer value of a column over the visible rows.
    pub fn summary(&self, col: usize) -> Option<SummaryValue> {
        if !self.has_column(col) {
            return None;
        }
        summary::summarize(&self.dataset, &self.visible, col, self.summary_mode)
    }

    // ---- output ----

    /// Original indices of the visible rows, in display order.
    pub fn visible_orig_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_rows(&self) -> Vec<&[CellValue]> {
        self.visible
            .iter()
            .filter_map(|&i| self.dataset.row(i))
            .collect()
    }

    /// CSV of the visible columns and rows in display order.
    pub fn export_csv(&self) -> String {
        let columns = self.visible_columns();
        let headers = export_headers(&self.dataset, &columns);
        let rows: Vec<Vec<String>> = self
            .visible
            .iter()
            .map(|&orig| {
                columns
                    .iter()
                    .map(|&col| self.dataset.cell(orig, col).to_string())
                    .collect()
            })
            .collect();
        to_csv(&headers, &rows)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let columns = self.visible_columns();
        let offsets = self.sticky_offsets();

        let column_snapshots = columns
            .iter()
            .map(|&col| {
                let sticky_offset = offsets
                    .iter()
                    .find(|(c, _)| *c == col)
                    .map(|&(_, offset)| offset);
                ColumnSnapshot {
                    index: col,
                    header: self.dataset.header(col).to_string(),
                    width: self.resize.width(col),
                    pinned: sticky_offset.is_some(),
                    sticky_offset,
                    sort: self.sort.direction_for(col),
                    filtered: self.filters.is_filtered(col),
                    summary: self.summary(col).map(|v| v.to_string()),
                }
            })
            .collect();

        let rows = self
            .visible
            .iter()
            .map(|&orig| {
                let cells = columns.iter().map(|&col| self.dataset.cell(orig, col));
                RowSnapshot {
                    orig_index: orig,
                    cells: cells.clone().map(ToString::to_string).collect(),
                    numeric: cells.map(is_numeric).collect(),
                    color: self.colors.color_for(orig).map(str::to_string),
                    selected: self.selection.is_selected(orig),
                }
            })
            .collect();

        TableSnapshot {
            columns: column_snapshots,
            rows,
            counts: Counts {
                total: self.dataset.row_count(),
                visible: self.visible.len(),
                selected: self.selection.len(),
                deleted: self.deleted.len(),
            },
            search: self.search.clone(),
            color_sort: self.color_sort.direction(),
            color_filter: self
                .color_filter
                .allowed()
                .map(|set| set.iter().cloned().collect()),
            available_colors: self.available_colors(),
            summary_mode: self.summary_mode,
            pin_count: self.pins.count(),
            all_visible_selected: self.all_visible_selected(),
        }
    }
}
