//! Export of the current view.
//!
//! Only CSV is produced. The output always reflects the pipeline result:
//! visible columns, visible rows, display order.

pub mod csv;

pub use csv::{export_headers, to_csv, DEFAULT_EXPORT_FILENAME};
