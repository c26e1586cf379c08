//! Extraction options.

use serde::{Deserialize, Serialize};

use super::table_detector::TableDetectorConfig;

/// Options for extracting pages from a PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Run the table detector on each page
    pub detect_tables: bool,

    /// Keep the text of detected tables in the page text as well
    pub keep_table_text: bool,

    /// Spans whose baselines differ by at most this fraction of the font
    /// size share a line
    pub line_tolerance: f32,

    /// A vertical gap larger than this multiple of the median line spacing
    /// starts a new paragraph
    pub paragraph_gap_factor: f32,

    /// Table detector tuning
    pub table_detector: TableDetectorConfig,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            detect_tables: true,
            keep_table_text: true,
            line_tolerance: 0.5,
            paragraph_gap_factor: 1.5,
            table_detector: TableDetectorConfig::default(),
        }
    }
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Keep or remove table text from the page text.
    pub fn with_table_text(mut self, keep: bool) -> Self {
        self.keep_table_text = keep;
        self
    }

    /// Set the paragraph gap factor.
    pub fn with_paragraph_gap(mut self, factor: f32) -> Self {
        self.paragraph_gap_factor = factor;
        self
    }

    /// Set the table detector tuning.
    pub fn with_detector(mut self, config: TableDetectorConfig) -> Self {
        self.table_detector = config;
        self
    }
}
