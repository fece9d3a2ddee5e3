//! Column geometry: estimated and user-resized widths, visibility, pinning.
//!
//! This module handles:
//! - Estimating initial column widths from header and sampled cell text
//! - Border-drag resizing with live (uncommitted) widths
//! - Hidden column bookkeeping
//! - Pinned leading columns and their sticky offsets

mod column_width;
mod pin;
mod resize;
mod visibility;

pub use column_width::{estimate_column_widths, measure_text, sample_row_indices};
pub use pin::PinController;
pub use resize::{ColumnResizeController, DragSession, DEFAULT_COL_WIDTH};
pub use visibility::ColumnVisibility;
