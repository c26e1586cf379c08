//! Rendering options and configuration.

use super::HeadingRules;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Options for rendering a document to Markdown.
///
/// Deserializable from JSON with every field optional, so a config file only
/// needs to name what it changes:
///
/// ```
/// use pdfmd::RenderOptions;
///
/// let options = RenderOptions::from_json_str(
///     r#"{ "labels": "zh", "heading_rules": { "max_caps_len": 100 } }"#,
/// ).unwrap();
/// assert_eq!(options.heading_rules.max_caps_len, 100);
/// assert_eq!(options.labels.page(3), "第 3 页");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Text of the generated headings and page-count line
    #[serde(deserialize_with = "deserialize_labels")]
    pub labels: Labels,

    /// Heading detection configuration
    pub heading_rules: HeadingRules,

    /// Render detected tables
    pub include_tables: bool,

    /// Page selection
    #[serde(skip)]
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the labels.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the heading rules.
    pub fn with_heading_rules(mut self, rules: HeadingRules) -> Self {
        self.heading_rules = rules;
        self
    }

    /// Enable or disable table rendering.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            labels: Labels::default(),
            heading_rules: HeadingRules::default(),
            include_tables: true,
            page_selection: PageSelection::All,
        }
    }
}

/// Generated text around the extracted content. `{n}` is replaced by a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Per-page heading, e.g. `Page {n}`
    pub page_heading: String,

    /// Per-table heading, e.g. `Table {n}`
    pub table_heading: String,

    /// Italic line under the title, e.g. `Converted from PDF - {n} pages`
    pub page_count: String,
}

impl Labels {
    /// English labels.
    pub fn english() -> Self {
        Self {
            page_heading: "Page {n}".to_string(),
            table_heading: "Table {n}".to_string(),
            page_count: "Converted from PDF - {n} pages".to_string(),
        }
    }

    /// Chinese labels.
    pub fn chinese() -> Self {
        Self {
            page_heading: "第 {n} 页".to_string(),
            table_heading: "表格 {n}".to_string(),
            page_count: "文档页数: {n}".to_string(),
        }
    }

    /// Look up a preset by language name (`en`, `english`, `zh`, `chinese`).
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::english()),
            "zh" | "cn" | "chinese" => Ok(Self::chinese()),
            other => Err(Error::Config(format!("unknown label preset '{}'", other))),
        }
    }

    /// Page heading text for page `n`.
    pub fn page(&self, n: u32) -> String {
        fill(&self.page_heading, n as usize)
    }

    /// Table heading text for the `n`-th table of a page.
    pub fn table(&self, n: usize) -> String {
        fill(&self.table_heading, n)
    }

    /// Page-count line text.
    pub fn pages(&self, count: u32) -> String {
        fill(&self.page_count, count as usize)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

fn fill(template: &str, n: usize) -> String {
    template.replace("{n}", &n.to_string())
}

/// Labels may be given as a preset name or as a full object.
fn deserialize_labels<'de, D>(deserializer: D) -> std::result::Result<Labels, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LabelsRepr {
        Preset(String),
        Custom(Labels),
    }

    match LabelsRepr::deserialize(deserializer)? {
        LabelsRepr::Preset(name) => Labels::preset(&name).map_err(serde::de::Error::custom),
        LabelsRepr::Custom(labels) => Ok(labels),
    }
}

/// Page selection for extraction and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = parse_bounds(start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_bounds(start, end)?;
                let span = (end - start) as usize + 1;
                if pages.len() + span > MAX_LISTED_PAGES {
                    return Err(Error::InvalidPageRange(format!(
                        "'{}' lists more than {} pages",
                        s, MAX_LISTED_PAGES
                    )));
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

/// Upper bound on the pages a comma list may expand to. A single `a-b`
/// range is stored as a range and has no limit.
const MAX_LISTED_PAGES: usize = 100_000;

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange("pages are numbered from 1".to_string())),
        Ok(n) => Ok(n),
        Err(_) => Err(Error::InvalidPageRange(format!(
            "invalid page number '{}'",
            s.trim()
        ))),
    }
}

fn parse_bounds(start: &str, end: &str) -> Result<(u32, u32)> {
    let (start, end) = (parse_page(start)?, parse_page(end)?);
    if start > end {
        return Err(Error::InvalidPageRange(format!("{}-{}", start, end)));
    }
    Ok((start, end))
}
