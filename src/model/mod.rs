//! Document model types.
//!
//! This is the boundary between extraction and formatting: an extractor
//! produces a [`Document`] of pages (optional text plus table grids), and the
//! Markdown formatter consumes it without knowing where it came from.

mod document;
mod page;
mod table;

pub use document::Document;
pub use page::Page;
pub use table::{cell_is_empty, row_is_empty, Cell, Table};
