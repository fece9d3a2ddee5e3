//! Single-column tri-state sort.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::Dataset;
use crate::value::compare_cells;

/// Direction of a column or colour sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// The active sort: one column, one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

/// Cycles a column through unsorted → asc → desc → unsorted.
///
/// Clicking a different column starts over at asc on that column and
/// silently drops the previous sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSort {
    key: Option<SortKey>,
}

impl ColumnSort {
    pub fn key(&self) -> Option<SortKey> {
        self.key
    }

    /// Direction shown on a column header, if that column is the sorted one.
    pub fn direction_for(&self, column: usize) -> Option<SortDirection> {
        self.key
            .filter(|k| k.column == column)
            .map(|k| k.direction)
    }

    pub fn toggle(&mut self, column: usize) {
        self.key = match self.key {
            Some(SortKey {
                column: current,
                direction: SortDirection::Asc,
            }) if current == column => Some(SortKey {
                column,
                direction: SortDirection::Desc,
            }),
            Some(SortKey {
                column: current,
                direction: SortDirection::Desc,
            }) if current == column => None,
            _ => Some(SortKey {
                column,
                direction: SortDirection::Asc,
            }),
        };
    }

    pub fn set(&mut self, key: Option<SortKey>) {
        self.key = key;
    }
}

/// Stable-sort original row indices by one column.
pub fn sort_rows(indices: &mut [usize], dataset: &Dataset, key: SortKey) {
    indices.sort_by(|&a, &b| {
        key.direction.apply(compare_cells(
            dataset.cell(a, key.column),
            dataset.cell(b, key.column),
        ))
    });
}
