//! The derived-view pipeline as a pure function of every controller state.
//!
//! Stages run in a fixed order:
//! delete → search → column filter → colour filter → column sort → colour sort.

use std::collections::BTreeSet;

use super::color::{sort_by_color, ColorFilter, ColorSort, RowColorIndex};
use super::filter::ColumnFilters;
use super::sort::{sort_rows, ColumnSort};
use crate::types::Dataset;

/// Borrowed snapshot of everything the pipeline reads.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInput<'a> {
    pub dataset: &'a Dataset,
    pub colors: &'a RowColorIndex,
    pub deleted: &'a BTreeSet<usize>,
    pub search: &'a str,
    pub filters: &'a ColumnFilters,
    pub color_filter: &'a ColorFilter,
    pub sort: &'a ColumnSort,
    pub color_sort: &'a ColorSort,
}

/// Original indices of the visible rows, in display order.
pub fn compute(input: &PipelineInput<'_>) -> Vec<usize> {
    let needle = search_needle(input.search);

    let mut visible: Vec<usize> = (0..input.dataset.row_count())
        .filter(|i| !input.deleted.contains(i))
        .filter(|&i| {
            needle
                .as_deref()
                .map_or(true, |n| matches_search(input.dataset, i, n))
        })
        .filter(|&i| input.filters.passes(input.dataset, i))
        .filter(|&i| input.color_filter.allows(input.colors.color_key(i)))
        .collect();

    if let Some(key) = input.sort.key() {
        sort_rows(&mut visible, input.dataset, key);
    }
    if let Some(direction) = input.color_sort.direction() {
        sort_by_color(&mut visible, input.colors, direction);
    }
    visible
}

/// Lower-cased search text, or `None` when it is blank.
///
/// The text itself is not trimmed, only tested for blankness.
pub fn search_needle(search: &str) -> Option<String> {
    (!search.trim().is_empty()).then(|| search.to_lowercase())
}

/// Case-insensitive substring match over every cell of a row.
///
/// `needle` must already be lower-cased.
pub fn matches_search(dataset: &Dataset, orig_idx: usize, needle: &str) -> bool {
    dataset.row(orig_idx).is_some_and(|row| {
        row.iter()
            .any(|cell| cell.to_string().to_lowercase().contains(needle))
    })
}
