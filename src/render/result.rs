//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// What the renderer emitted
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ExtractionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages rendered
    pub page_count: u32,

    /// Plain paragraphs rendered
    pub paragraph_count: u32,

    /// Paragraphs promoted to headings
    pub heading_count: u32,

    /// Tables rendered
    pub table_count: u32,

    /// Tables dropped because no cell had content
    pub dropped_table_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment dropped table count.
    pub fn add_dropped_table(&mut self) {
        self.dropped_table_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_stats_count_text() {
        let mut stats = ExtractionStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_render_result_len() {
        let result = RenderResult::new("# Hello".to_string(), ExtractionStats::new());
        assert_eq!(result.content_len(), 7);
        assert_eq!(result.stats.paragraph_count, 0);
    }
}
