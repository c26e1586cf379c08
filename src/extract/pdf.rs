//! `lopdf`-backed page extraction.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::detect::{pdf_version_from_bytes, pdf_version_from_path};
use crate::error::{Error, Result};
use crate::model::Page;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::{SpanCollector, TextSpan};
use super::lines::{group_lines, lines_to_text};
use super::options::ExtractOptions;
use super::table_detector::TableDetector;
use super::PageSource;

/// Extracts page text and tables from a PDF.
pub struct PdfExtractor<B: PdfBackend = LopdfBackend> {
    backend: B,
    pages: BTreeMap<u32, PageId>,
    options: ExtractOptions,
}

impl PdfExtractor<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }

        let version = pdf_version_from_path(path)?;
        log::debug!("opening {} (PDF {})", path.display(), version);

        Ok(Self::with_backend(LopdfBackend::load_file(path)?, options))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        pdf_version_from_bytes(data)?;
        Ok(Self::with_backend(LopdfBackend::load_bytes(data)?, options))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R, options: ExtractOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }
}

impl<B: PdfBackend> PdfExtractor<B> {
    /// Wrap an already loaded backend.
    pub fn with_backend(backend: B, options: ExtractOptions) -> Self {
        let pages = backend.pages();
        Self {
            backend,
            pages,
            options,
        }
    }

    /// Extraction options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Positioned text spans of a page, in content stream order.
    pub fn page_spans(&self, number: u32) -> Result<Vec<TextSpan>> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))?;

        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;
        Ok(SpanCollector::new(&self.backend, page_id).collect(&ops))
    }

    fn spans_to_text(&self, spans: &[TextSpan]) -> Option<String> {
        let lines = group_lines(spans, self.options.line_tolerance);
        let text = lines_to_text(&lines, self.options.paragraph_gap_factor);
        (!text.trim().is_empty()).then_some(text)
    }
}

impl<B: PdfBackend> PageSource for PdfExtractor<B> {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_page(&self, number: u32) -> Result<Page> {
        let spans = self.page_spans(number)?;
        let mut page = Page::new(number);

        if !self.options.detect_tables {
            page.text = self.spans_to_text(&spans);
            return Ok(page);
        }

        let detector = TableDetector::with_config(self.options.table_detector.clone());
        let all_text = self
            .options
            .keep_table_text
            .then(|| self.spans_to_text(&spans))
            .flatten();
        let (tables, remaining) = detector.detect(spans);

        page.text = if self.options.keep_table_text {
            all_text
        } else {
            self.spans_to_text(&remaining)
        };

        if !tables.is_empty() {
            log::debug!("page {}: {} table(s) detected", number, tables.len());
        }
        page.tables = tables.iter().map(|t| t.to_table()).collect();

        Ok(page)
    }

    fn title(&self) -> Option<String> {
        self.backend.title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::backend::{ContentOp, PdfValue};

    /// Serves one page whose content is a fixed list of operations.
    struct ScriptedBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for ScriptedBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (3, 0))])
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(b"scripted".to_vec())
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
        fn title(&self) -> Option<String> {
            Some("Scripted".to_string())
        }
    }

    fn show_at(x: f32, y: f32, text: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new(
                "Tm",
                vec![
                    PdfValue::Real(1.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(0.0),
                    PdfValue::Real(1.0),
                    PdfValue::Real(x),
                    PdfValue::Real(y),
                ],
            ),
            ContentOp::new("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
        ]
    }

    fn table_page() -> ScriptedBackend {
        let mut ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Real(10.0)]),
        ];
        ops.extend(show_at(72.0, 720.0, "Specification"));
        for (y, a, b) in [(690.0, "Model", "Power"), (676.0, "X1", "5kW"), (662.0, "X2", "7kW")] {
            ops.extend(show_at(72.0, y, a));
            ops.extend(show_at(200.0, y, b));
        }
        ops.push(ContentOp::new("ET", vec![]));
        ScriptedBackend { ops }
    }

    #[test]
    fn test_extract_text_and_table() {
        let extractor = PdfExtractor::with_backend(table_page(), ExtractOptions::default());
        assert_eq!(extractor.page_count(), 1);
        assert_eq!(extractor.title().as_deref(), Some("Scripted"));

        let page = extractor.extract_page(1).unwrap();
        let text = page.text.unwrap();
        assert!(text.starts_with("Specification"));
        assert!(text.contains("Model Power"));

        assert_eq!(page.tables.len(), 1);
        assert_eq!(page.tables[0].rows[0], vec![Some("Model".into()), Some("Power".into())]);
        assert_eq!(page.tables[0].row_count(), 3);
    }

    #[test]
    fn test_table_text_removed_when_not_kept() {
        let options = ExtractOptions::new().with_table_text(false);
        let extractor = PdfExtractor::with_backend(table_page(), options);

        let page = extractor.extract_page(1).unwrap();
        assert_eq!(page.text.as_deref(), Some("Specification"));
        assert_eq!(page.tables.len(), 1);
    }

    #[test]
    fn test_tables_disabled() {
        let options = ExtractOptions::new().with_tables(false);
        let extractor = PdfExtractor::with_backend(table_page(), options);

        let page = extractor.extract_page(1).unwrap();
        assert!(page.tables.is_empty());
        assert!(page.text.unwrap().contains("X2 7kW"));
    }

    #[test]
    fn test_page_out_of_range() {
        let extractor = PdfExtractor::with_backend(table_page(), ExtractOptions::default());
        assert!(matches!(
            extractor.extract_page(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = PdfExtractor::open("/nonexistent/manual.pdf");
        assert!(matches!(result, Err(Error::InputNotFound(_))));
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = PdfExtractor::from_bytes(b"<html><body>not a pdf</body></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
