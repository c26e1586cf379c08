//! Text normalization applied to extracted page text before rendering.

use regex::Regex;
use std::sync::OnceLock;

/// Entities produced by [`escape_html`]; an `&` that already starts one of
/// these is left alone so that normalizing twice changes nothing.
const ENTITIES: [&str; 3] = ["&amp;", "&lt;", "&gt;"];

/// Whitespace and entity normalizer for raw page text.
pub struct TextNormalizer {
    horizontal_space: Regex,
    blank_lines: Regex,
}

impl TextNormalizer {
    /// Create a normalizer.
    pub fn new() -> Self {
        Self {
            // Any whitespace except the line feed itself.
            horizontal_space: Regex::new(r"[^\S\n]+").expect("valid regex"),
            // Two line feeds with only whitespace (or more line feeds) between.
            blank_lines: Regex::new(r"\n\s*\n").expect("valid regex"),
        }
    }

    /// Normalize raw extracted text.
    ///
    /// Collapses horizontal whitespace runs to one space, collapses runs of
    /// blank lines to a single blank line, escapes `&`, `<` and `>`, and trims.
    /// Absent input yields an empty string.
    pub fn normalize(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };

        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let text = self.horizontal_space.replace_all(&text, " ");
        let text = self.blank_lines.replace_all(&text, "\n\n");
        escape_html(text.trim())
    }

    /// Split normalized text into trimmed, non-empty paragraphs.
    pub fn paragraphs<'a>(&self, normalized: &'a str) -> impl Iterator<Item = &'a str> {
        normalized
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize raw text with a shared [`TextNormalizer`].
pub fn normalize_text(raw: Option<&str>) -> String {
    static NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TextNormalizer::new).normalize(raw)
}

/// Replace `&`, `<` and `>` with their HTML entities.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '&' if ENTITIES.iter().any(|e| text[i..].starts_with(e)) => result.push('&'),
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
