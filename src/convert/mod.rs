//! PDF to Markdown file conversion.
//!
//! # Example
//!
//! ```no_run
//! use pdfmd::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> pdfmd::Result<()> {
//!     let outcome = convert_file("manual.pdf", None, &ConvertOptions::default())?;
//!     println!("wrote {}", outcome.output.display());
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::{collect_document, ExtractOptions, PageSource, PdfExtractor};
use crate::render::{to_markdown_with_stats, ExtractionStats, RenderOptions, RenderResult};

/// Default extension of the output file.
pub const DEFAULT_SUFFIX: &str = ".md";

/// Title used when neither the caller, the PDF nor a file name supplies one.
const FALLBACK_TITLE: &str = "Untitled";

/// Options for converting a PDF.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Rendering options
    pub render: RenderOptions,

    /// Extraction options
    pub extract: ExtractOptions,

    /// Document title; overrides the PDF's own title and the file name
    pub title: Option<String>,

    /// Suffix replacing the input extension when no output path is given
    pub suffix: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            extract: ExtractOptions::default(),
            title: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the output suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Enable or disable tables, in both extraction and rendering.
    pub fn with_tables(mut self, tables: bool) -> Self {
        self.extract = self.extract.with_tables(tables);
        self.render = self.render.with_tables(tables);
        self
    }
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    /// Path of the written Markdown file
    pub output: PathBuf,

    /// Pages rendered into the output
    pub pages_rendered: u32,

    /// Pages in the source PDF
    pub page_count: u32,

    /// Render statistics
    pub stats: ExtractionStats,
}

/// Output path for `input` when none is given: same directory and stem,
/// with `suffix` in place of the extension.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}{}", stem, suffix))
}

/// Convert the PDF at `input` into a Markdown file.
///
/// A missing input fails with [`Error::InputNotFound`] before anything is
/// read or written. The Markdown is rendered in full before the output file
/// is created.
pub fn convert_file<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConvertOutcome> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input, &options.suffix),
    };
    log::info!("converting {} -> {}", input.display(), output.display());

    let extractor = PdfExtractor::open_with_options(input, options.extract.clone())?;
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned());
    let title = resolve_title(options.title.as_deref(), extractor.title(), stem);

    let result = render_source(&extractor, &title, &options.render)?;
    write_output(&output, &result.content)?;

    log::info!(
        "wrote {} ({} of {} pages, {} tables)",
        output.display(),
        result.stats.page_count,
        extractor.page_count(),
        result.stats.table_count
    );

    Ok(ConvertOutcome {
        output,
        pages_rendered: result.stats.page_count,
        page_count: extractor.page_count(),
        stats: result.stats,
    })
}

/// Convert PDF bytes to Markdown without touching the file system.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<String> {
    let extractor = PdfExtractor::from_bytes_with_options(data, options.extract.clone())?;
    let title = resolve_title(options.title.as_deref(), extractor.title(), None);
    Ok(render_source(&extractor, &title, &options.render)?.content)
}

/// Extract the selected pages of `source` and render them.
pub fn render_source<S: PageSource + ?Sized>(
    source: &S,
    title: &str,
    options: &RenderOptions,
) -> Result<RenderResult> {
    let document = collect_document(source, title, &options.page_selection)?;
    Ok(to_markdown_with_stats(&document, options))
}

fn resolve_title(explicit: Option<&str>, embedded: Option<String>, stem: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or(embedded)
        .or(stem)
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Write the whole Markdown at once; a partially written file is removed.
fn write_output(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| {
        if path.is_file() {
            if let Err(e) = fs::remove_file(path) {
                log::warn!("could not remove partial output {}: {}", path.display(), e);
            }
        }
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}
