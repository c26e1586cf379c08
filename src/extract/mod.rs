//! Page extraction.
//!
//! A [`PageSource`] yields the raw text and table grids of each page. The
//! PDF implementation is [`PdfExtractor`]; [`MemorySource`] serves pages that
//! were built or extracted elsewhere.

mod backend;
mod content;
mod lines;
mod options;
mod pdf;
mod table_detector;

pub use backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use content::{SpanCollector, TextSpan};
pub use lines::{group_lines, lines_to_text, TextLine};
pub use options::ExtractOptions;
pub use pdf::PdfExtractor;
pub use table_detector::{DetectedTable, SpanRow, TableDetector, TableDetectorConfig};

use crate::error::{Error, Result};
use crate::model::{Document, Page};
use crate::render::PageSelection;

/// Something that can produce pages of a document.
pub trait PageSource {
    /// Number of pages in the source.
    fn page_count(&self) -> u32;

    /// Extract one page (1-indexed).
    fn extract_page(&self, number: u32) -> Result<Page>;

    /// Document title, if the source records one.
    fn title(&self) -> Option<String> {
        None
    }
}

/// Walk the selected pages in order and build a [`Document`].
///
/// The document's page count is the source's total, whatever the selection.
pub fn collect_document<S: PageSource + ?Sized>(
    source: &S,
    title: &str,
    selection: &PageSelection,
) -> Result<Document> {
    let page_count = source.page_count();
    let mut document = Document::new(title, page_count);

    for number in 1..=page_count {
        if !selection.includes(number) {
            continue;
        }
        document.add_page(source.extract_page(number)?);
    }

    log::debug!(
        "collected {} of {} pages ({} tables)",
        document.pages.len(),
        page_count,
        document.table_count()
    );
    Ok(document)
}

/// A [`PageSource`] over pages already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Page>,
    title: Option<String>,
}

impl MemorySource {
    /// Create a source from pages. Pages are renumbered 1..=n in order.
    pub fn new(pages: Vec<Page>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.number = i as u32 + 1;
                page
            })
            .collect();
        Self { pages, title: None }
    }

    /// Set the title reported by the source.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_page(&self, number: u32) -> Result<Page> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn source() -> MemorySource {
        let mut second = Page::with_text(9, "Second");
        second.add_table(Table::from_strings(vec![vec!["a", "b"]]));
        MemorySource::new(vec![
            Page::with_text(7, "First"),
            second,
            Page::new(0),
        ])
    }

    #[test]
    fn test_memory_source_renumbers() {
        let source = source();
        assert_eq!(source.page_count(), 3);
        assert_eq!(source.extract_page(2).unwrap().number, 2);
        assert!(source.title().is_none());
    }

    #[test]
    fn test_memory_source_out_of_range() {
        let source = source();
        assert!(matches!(source.extract_page(0), Err(Error::PageOutOfRange(0, 3))));
        assert!(matches!(source.extract_page(4), Err(Error::PageOutOfRange(4, 3))));
    }

    #[test]
    fn test_collect_document_all() {
        let doc = collect_document(&source(), "Manual", &PageSelection::All).unwrap();
        assert_eq!(doc.title, "Manual");
        assert_eq!(doc.page_count, 3);
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.table_count(), 1);
        assert_eq!(doc.pages[0].text.as_deref(), Some("First"));
    }

    #[test]
    fn test_collect_document_selection_keeps_page_count() {
        let selection = PageSelection::Pages(vec![2]);
        let doc = collect_document(&source(), "Manual", &selection).unwrap();
        assert_eq!(doc.page_count, 3);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].number, 2);
    }

    #[test]
    fn test_collect_document_dyn_source() {
        let source: Box<dyn PageSource> = Box::new(source().with_title("Boxed"));
        assert_eq!(source.title().as_deref(), Some("Boxed"));
        let doc = collect_document(source.as_ref(), "t", &PageSelection::Range(1..=2)).unwrap();
        assert_eq!(doc.pages.len(), 2);
    }
}
