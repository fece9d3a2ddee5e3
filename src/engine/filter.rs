//! Per-column allow-set filters.
//!
//! Each column's option universe is the sorted distinct string forms over
//! the unfiltered sheet, computed once when the dataset loads. Sibling
//! filters never shrink a column's own options unless the narrowed
//! universe is configured.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::types::Dataset;

#[derive(Debug, Clone, Default)]
pub struct ColumnFilters {
    universe: Vec<Vec<String>>,
    active: BTreeMap<usize, HashSet<String>>,
}

impl ColumnFilters {
    pub fn new(dataset: &Dataset) -> Self {
        let universe = (0..dataset.column_count())
            .map(|col| distinct_values(dataset, 0..dataset.row_count(), col))
            .collect();
        Self {
            universe,
            active: BTreeMap::new(),
        }
    }

    /// Sorted distinct values of a column over the whole sheet.
    pub fn unique_values(&self, col: usize) -> &[String] {
        self.universe.get(col).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Set (`Some`) or clear (`None`) the allow-set of one column.
    pub fn apply_filter<I>(&mut self, col: usize, values: Option<I>)
    where
        I: IntoIterator<Item = String>,
    {
        if col >= self.universe.len() {
            return;
        }
        match values {
            Some(values) => {
                self.active.insert(col, values.into_iter().collect());
            }
            None => {
                self.active.remove(&col);
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn is_filtered(&self, col: usize) -> bool {
        self.active.contains_key(&col)
    }

    pub fn allowed(&self, col: usize) -> Option<&HashSet<String>> {
        self.active.get(&col)
    }

    /// AND of every active column filter.
    pub fn passes(&self, dataset: &Dataset, orig_idx: usize) -> bool {
        self.passes_except(dataset, orig_idx, None)
    }

    /// Like [`passes`](Self::passes), ignoring the filter on `skip`.
    pub fn passes_except(&self, dataset: &Dataset, orig_idx: usize, skip: Option<usize>) -> bool {
        self.active
            .iter()
            .filter(|&(&col, _)| Some(col) != skip)
            .all(|(&col, allowed)| allowed.contains(&dataset.cell(orig_idx, col).to_string()))
    }
}

/// Sorted distinct string forms of `col` over the given rows.
pub fn distinct_values(
    dataset: &Dataset,
    rows: impl IntoIterator<Item = usize>,
    col: usize,
) -> Vec<String> {
    rows.into_iter()
        .map(|row| dataset.cell(row, col).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
