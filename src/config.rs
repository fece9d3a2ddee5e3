//! Engine configuration.
//!
//! Every field has a default, so JavaScript callers and CLI config files
//! only need to name what they change.

use serde::{Deserialize, Serialize};

/// Which rows feed a column's filter dropdown options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterUniverse {
    /// Distinct values over the whole sheet, computed once per dataset.
    #[default]
    Static,
    /// Distinct values over rows that survive deletion and every other
    /// column's filter.
    Narrowed,
}

/// Parameters of the initial column width heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidthConfig {
    /// Narrowest estimated column, in pixels
    pub min_width: f32,
    /// Widest estimated column, in pixels
    pub max_width: f32,
    /// Added to the widest measured text
    pub padding: f32,
    /// Pixel cost of one ASCII character
    pub ascii_char_width: f32,
    /// Multiplier for characters above U+007F (Hangul, CJK, ...)
    pub wide_char_factor: f32,
    /// Maximum number of data rows measured per column
    pub sample_rows: usize,
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            min_width: 60.0,
            max_width: 400.0,
            padding: 40.0,
            ascii_char_width: 8.0,
            wide_char_factor: 1.6,
            sample_rows: 100,
        }
    }
}

/// Top-level configuration for a [`crate::engine::TableStateEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub widths: WidthConfig,
    /// Floor applied while dragging a column border
    pub min_resize_width: f32,
    pub filter_universe: FilterUniverse,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            widths: WidthConfig::default(),
            min_resize_width: 50.0,
            filter_universe: FilterUniverse::default(),
        }
    }
}

impl TableConfig {
    /// Defaults with the narrowed filter-option universe.
    #[must_use]
    pub fn narrowed() -> Self {
        Self {
            filter_universe: FilterUniverse::Narrowed,
            ..Self::default()
        }
    }
}
