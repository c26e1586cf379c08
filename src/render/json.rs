//! JSON dump of an extracted document.
//!
//! Shows exactly what the extractor handed to the formatter: page text and
//! table grids, before any normalization.

use crate::error::Result;
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
        JsonFormat::Compact => serde_json::to_string(doc)?,
    };
    Ok(json)
}
