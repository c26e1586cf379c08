//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// An extracted document, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Title shown in the top-level heading
    pub title: String,

    /// Number of pages in the source file
    pub page_count: u32,

    /// Extracted pages in source order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document with a title and a source page count.
    pub fn new(title: impl Into<String>, page_count: u32) -> Self {
        Self {
            title: title.into(),
            page_count,
            pages: Vec::new(),
        }
    }

    /// Append a page.
    ///
    /// Pages are rendered in insertion order; callers add them in source order.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Get a page by its 1-based number.
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Check if the document has no extracted pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of tables across all pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_pages() {
        let mut doc = Document::new("Manual", 3);
        doc.add_page(Page::with_text(1, "first"));
        doc.add_page(Page::with_text(3, "third"));

        assert_eq!(doc.page_count, 3);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.get_page(3).and_then(|p| p.text.as_deref()), Some("third"));
        assert!(doc.get_page(2).is_none());
    }
}
