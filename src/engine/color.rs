//! Row background colours: the per-row index, the colour filter and the
//! colour sort.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::sort::SortDirection;
use crate::types::{CellColorMap, Dataset};

/// Filter key for rows without any cell colour.
pub const NO_COLOR: &str = "__none__";

/// One representative colour per data row: the first coloured cell,
/// scanning left to right.
#[derive(Debug, Clone, Default)]
pub struct RowColorIndex {
    row_colors: Vec<Option<String>>,
}

impl RowColorIndex {
    pub fn new(dataset: &Dataset, colors: Option<&CellColorMap>) -> Self {
        let row_colors = match colors {
            Some(colors) if !colors.is_empty() => (0..dataset.row_count())
                .map(|orig| {
                    (0..dataset.column_count())
                        .find_map(|col| colors.get(orig + 1, col))
                        .map(str::to_string)
                })
                .collect(),
            _ => vec![None; dataset.row_count()],
        };
        Self { row_colors }
    }

    pub fn color_for(&self, orig_idx: usize) -> Option<&str> {
        self.row_colors.get(orig_idx).and_then(|c| c.as_deref())
    }

    /// Colour filter key of a row: its colour or [`NO_COLOR`].
    pub fn color_key(&self, orig_idx: usize) -> &str {
        self.color_for(orig_idx).unwrap_or(NO_COLOR)
    }

    /// Sorted distinct colours, with [`NO_COLOR`] last when any row has none.
    pub fn available_colors(&self) -> Vec<String> {
        let mut colors: Vec<String> = self
            .row_colors
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if self.row_colors.iter().any(Option::is_none) {
            colors.push(NO_COLOR.to_string());
        }
        colors
    }
}

/// Set of colour keys a row must match. Inactive when `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFilter {
    allowed: Option<BTreeSet<String>>,
}

impl ColorFilter {
    /// Add or remove one colour. Removing the last colour turns the
    /// filter off.
    pub fn toggle(&mut self, color: &str) {
        let mut allowed = self.allowed.take().unwrap_or_default();
        if !allowed.remove(color) {
            allowed.insert(color.to_string());
        }
        self.allowed = (!allowed.is_empty()).then_some(allowed);
    }

    pub fn clear(&mut self) {
        self.allowed = None;
    }

    pub fn is_active(&self) -> bool {
        self.allowed.is_some()
    }

    pub fn allowed(&self) -> Option<&BTreeSet<String>> {
        self.allowed.as_ref()
    }

    pub fn allows(&self, key: &str) -> bool {
        self.allowed.as_ref().map_or(true, |a| a.contains(key))
    }
}

/// Tri-state colour sort, independent of the column sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorSort {
    direction: Option<SortDirection>,
}

impl ColorSort {
    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    /// None → asc → desc → none.
    pub fn toggle(&mut self) {
        self.direction = match self.direction {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };
    }

    pub fn set(&mut self, direction: Option<SortDirection>) {
        self.direction = direction;
    }
}

/// Ascending colour order: coloured rows by colour code, colourless rows
/// last. Equal colours compare equal so a stable sort keeps prior order.
fn compare_colors(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

/// Stable re-sort of original indices by row colour.
pub fn sort_by_color(indices: &mut [usize], colors: &RowColorIndex, direction: SortDirection) {
    indices.sort_by(|&a, &b| {
        direction.apply(compare_colors(colors.color_for(a), colors.color_for(b)))
    });
}
