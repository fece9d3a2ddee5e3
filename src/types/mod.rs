//! Data types shared by the decoder and the table engine.

mod cell;
mod dataset;
mod workbook;

pub use cell::*;
pub use dataset::*;
pub use workbook::*;
