//! Serializable render state handed to the presentation layer.

use serde::Serialize;

use super::sort::SortDirection;
use super::summary::SummaryMode;

/// Everything a view needs to draw the table after one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub columns: Vec<ColumnSnapshot>,
    pub rows: Vec<RowSnapshot>,
    pub counts: Counts,
    pub search: String,
    pub color_sort: Option<SortDirection>,
    /// Active colour filter keys, sorted; `None` when the filter is off.
    pub color_filter: Option<Vec<String>>,
    pub available_colors: Vec<String>,
    pub summary_mode: SummaryMode,
    pub pin_count: usize,
    pub all_visible_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSnapshot {
    /// Original column index.
    pub index: usize,
    pub header: String,
    pub width: f32,
    pub pinned: bool,
    /// Left offset when pinned.
    pub sticky_offset: Option<f32>,
    pub sort: Option<SortDirection>,
    pub filtered: bool,
    /// Rendered footer value (`-` when nothing numeric).
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub orig_index: usize,
    /// String forms of the visible columns, in column order.
    pub cells: Vec<String>,
    /// Right-align flags, parallel to `cells`.
    pub numeric: Vec<bool>,
    pub color: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub total: usize,
    pub visible: usize,
    pub selected: usize,
    pub deleted: usize,
}
