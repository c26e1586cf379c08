//! Page-level types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A single extracted page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Raw extracted text, `None` when the page has no text layer
    pub text: Option<String>,

    /// Tables detected on the page, in reading order
    pub tables: Vec<Table>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            text: None,
            tables: Vec::new(),
        }
    }

    /// Create a page holding only text.
    pub fn with_text(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: Some(text.into()),
            tables: Vec::new(),
        }
    }

    /// Add a table to the page.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Check if the page carries neither text nor tables.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty()) && self.tables.is_empty()
    }
}
