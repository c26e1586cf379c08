//! # pdfmd
//!
//! Converts PDF documents to Markdown.
//!
//! Each page's text is cleaned up and split into paragraphs, short
//! all-caps lines and keyword lines become headings, and detected tables are
//! rendered as Markdown tables.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfmd::{extract_file, render};
//!
//! fn main() -> pdfmd::Result<()> {
//!     let doc = extract_file("manual.pdf")?;
//!
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options);
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! Extraction and formatting meet at the [`Document`] model, so the
//! formatter works on any [`PageSource`], not only on PDFs.

pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;

pub use convert::{convert_bytes, convert_file, ConvertOptions, ConvertOutcome};
pub use detect::{is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, ErrorKind, Result};
pub use extract::{collect_document, ExtractOptions, MemorySource, PageSource, PdfExtractor};
pub use model::{Cell, Document, Page, Table};
pub use render::{
    HeadingRules, JsonFormat, Labels, MarkdownFormatter, PageSelection, RenderOptions,
};

use std::path::Path;

/// Extract every page of a PDF file.
///
/// The title is the PDF's own `/Title`, or the file name without extension.
///
/// # Example
///
/// ```no_run
/// use pdfmd::extract_file;
///
/// let doc = extract_file("manual.pdf").unwrap();
/// println!("Pages: {}", doc.page_count);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    extract_file_with_options(path, ExtractOptions::default(), &PageSelection::All)
}

/// Extract the selected pages of a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
    selection: &PageSelection,
) -> Result<Document> {
    let path = path.as_ref();
    let extractor = PdfExtractor::open_with_options(path, options)?;
    let title = extractor.title().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    collect_document(&extractor, &title, selection)
}

/// Extract every page of a PDF held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<Document> {
    let extractor = PdfExtractor::from_bytes(data)?;
    let title = extractor.title().unwrap_or_default();
    collect_document(&extractor, &title, &PageSelection::All)
}

/// Convert a PDF file to a Markdown string.
///
/// # Example
///
/// ```no_run
/// use pdfmd::to_markdown;
///
/// let markdown = to_markdown("manual.pdf").unwrap();
/// std::fs::write("manual.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    to_markdown_with_options(path, &RenderOptions::default())
}

/// Convert a PDF file to a Markdown string with custom render options.
///
/// # Example
///
/// ```no_run
/// use pdfmd::{to_markdown_with_options, HeadingRules, Labels, RenderOptions};
///
/// let options = RenderOptions::new()
///     .with_labels(Labels::chinese())
///     .with_heading_rules(HeadingRules::caps_only(30));
/// let markdown = to_markdown_with_options("manual.pdf", &options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = extract_file_with_options(path, ExtractOptions::default(), &options.page_selection)?;
    Ok(render::to_markdown(&doc, options))
}

/// Dump the extracted document of a PDF file as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = extract_file(path)?;
    render::to_json(&doc, format)
}
