//! Markdown rendering for extracted documents.

use crate::model::{row_is_empty, Cell, Document, Page, Table};

use super::{ExtractionStats, RenderOptions, RenderResult, TextNormalizer};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> String {
    MarkdownFormatter::new(options.clone()).render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> RenderResult {
    MarkdownFormatter::new(options.clone()).render_with_stats(doc)
}

/// Turns extracted page text and table grids into Markdown.
///
/// Output layout:
///
/// ```text
/// # {title}
///
/// *{page count line}*
///
/// ---
///
/// ## {page heading}
///
/// {paragraph or ### heading} ...
///
/// ### {table heading}
///
/// | header | row |
/// | --- | --- |
/// | data | row |
///
/// ---
/// ```
pub struct MarkdownFormatter {
    options: RenderOptions,
    normalizer: TextNormalizer,
}

impl MarkdownFormatter {
    /// Create a new formatter.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            normalizer: TextNormalizer::new(),
        }
    }

    /// The options this formatter renders with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Normalize raw page text (see [`TextNormalizer::normalize`]).
    pub fn normalize_text(&self, raw: Option<&str>) -> String {
        self.normalizer.normalize(raw)
    }

    /// Apply the configured heading heuristic.
    pub fn is_heading(&self, text: &str) -> bool {
        self.options.heading_rules.is_heading(text)
    }

    /// Render one paragraph as a `###` heading or as plain text, followed by
    /// a blank line.
    pub fn render_paragraph(&self, text: &str) -> String {
        if self.is_heading(text) {
            format!("### {}\n\n", text)
        } else {
            format!("{}\n\n", text)
        }
    }

    /// Render a table grid.
    ///
    /// Rows without content are dropped; the first remaining row becomes the
    /// header. Returns an empty string when nothing remains. Rows shorter or
    /// longer than the header are rendered as they are.
    pub fn render_table(&self, table: &Table) -> String {
        let mut rows = table.rows.iter().filter(|row| !row_is_empty(row));

        let Some(header) = rows.next() else {
            return String::new();
        };

        let mut lines = Vec::with_capacity(table.rows.len() + 1);
        lines.push(render_row(header));
        lines.push(format!("| {} |", vec!["---"; header.len()].join(" | ")));
        lines.extend(rows.map(|row| render_row(row)));
        lines.join("\n")
    }

    /// Render one page: heading, paragraphs, tables, closing rule.
    pub fn render_page(&self, page_number: u32, text: Option<&str>, tables: &[Table]) -> String {
        let mut output = String::new();
        output.push_str(&format!("## {}\n\n", self.options.labels.page(page_number)));

        let normalized = self.normalize_text(text);
        for paragraph in self.normalizer.paragraphs(&normalized) {
            output.push_str(&self.render_paragraph(paragraph));
        }

        if self.options.include_tables {
            for (index, table) in tables.iter().enumerate() {
                let rendered = self.render_table(table);
                if rendered.is_empty() {
                    log::debug!(
                        "page {}: dropping table {} with no content",
                        page_number,
                        index + 1
                    );
                    continue;
                }
                output.push_str(&format!("### {}\n\n", self.options.labels.table(index + 1)));
                output.push_str(&rendered);
                output.push_str("\n\n");
            }
        }

        output.push_str("---\n\n");
        output
    }

    /// Render the title block followed by every page in order.
    pub fn render_document(&self, title: &str, page_count: u32, pages: &[Page]) -> String {
        let mut output = String::new();
        output.push_str(&format!("# {}\n\n", title));
        output.push_str(&format!("*{}*\n\n", self.options.labels.pages(page_count)));
        output.push_str("---\n\n");

        for page in pages {
            output.push_str(&self.render_page(page.number, page.text.as_deref(), &page.tables));
        }

        output
    }

    /// Render a document, honoring the page selection.
    pub fn render(&self, doc: &Document) -> String {
        let pages: Vec<Page> = self.selected_pages(doc).cloned().collect();
        self.render_document(&doc.title, doc.page_count, &pages)
    }

    /// Render a document and count what was emitted.
    pub fn render_with_stats(&self, doc: &Document) -> RenderResult {
        let content = self.render(doc);

        let mut stats = ExtractionStats::new();
        for page in self.selected_pages(doc) {
            stats.add_page();

            let normalized = self.normalize_text(page.text.as_deref());
            for paragraph in self.normalizer.paragraphs(&normalized) {
                if self.is_heading(paragraph) {
                    stats.add_heading();
                } else {
                    stats.add_paragraph();
                }
            }

            if self.options.include_tables {
                for table in &page.tables {
                    if table.is_blank() {
                        stats.add_dropped_table();
                    } else {
                        stats.add_table();
                    }
                }
            }
        }
        stats.count_text(&content);

        RenderResult::new(content, stats)
    }

    fn selected_pages<'a>(&'a self, doc: &'a Document) -> impl Iterator<Item = &'a Page> {
        doc.pages
            .iter()
            .filter(|page| self.options.page_selection.includes(page.number))
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

fn render_row(row: &[Cell]) -> String {
    let cells: Vec<String> = row.iter().map(render_cell).collect();
    format!("| {} |", cells.join(" | "))
}

/// Absent cells render empty; line breaks inside a cell become spaces.
fn render_cell(cell: &Cell) -> String {
    cell.as_deref()
        .map(|c| c.replace("\r\n", " ").replace(|ch: char| ch == '\n' || ch == '\r', " "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadingRules, Labels, PageSelection};

    fn formatter() -> MarkdownFormatter {
        MarkdownFormatter::default()
    }

    #[test]
    fn test_render_paragraph() {
        let f = formatter();
        assert_eq!(f.render_paragraph("WORLD"), "### WORLD\n\n");
        assert_eq!(f.render_paragraph("Hello"), "Hello\n\n");
    }

    #[test]
    fn test_render_table_drops_empty_rows() {
        let table = Table::from_strings(vec![vec!["A", "B"], vec!["", ""], vec!["1", "2"]]);
        assert_eq!(
            formatter().render_table(&table),
            "| A | B |\n| --- | --- |\n| 1 | 2 |"
        );
    }

    #[test]
    fn test_render_table_all_empty() {
        let table = Table::from_rows(vec![vec![None, Some(String::new())], vec![None]]);
        assert_eq!(formatter().render_table(&table), "");
        assert_eq!(formatter().render_table(&Table::new()), "");
    }

    #[test]
    fn test_render_table_header_after_empty_rows() {
        let table = Table::from_rows(vec![
            vec![None, None, None],
            vec![Some("x".into()), None, Some("z".into())],
        ]);
        assert_eq!(formatter().render_table(&table), "| x |  | z |\n| --- | --- | --- |");
    }

    #[test]
    fn test_render_table_ragged_rows() {
        let table = Table::from_strings(vec![vec!["A", "B", "C"], vec!["1"]]);
        assert_eq!(
            formatter().render_table(&table),
            "| A | B | C |\n| --- | --- | --- |\n| 1 |"
        );
    }

    #[test]
    fn test_render_cell_line_breaks() {
        let table = Table::from_strings(vec![vec!["two\nlines", "x"]]);
        assert_eq!(
            formatter().render_table(&table),
            "| two lines | x |\n| --- | --- |"
        );
    }

    #[test]
    fn test_render_page_empty_text() {
        let page = formatter().render_page(3, None, &[]);
        assert_eq!(page, "## Page 3\n\n---\n\n");
    }

    #[test]
    fn test_render_page_table_numbering() {
        let tables = vec![
            Table::from_rows(vec![vec![None]]),
            Table::from_strings(vec![vec!["k", "v"]]),
        ];
        let page = formatter().render_page(1, Some("body text here"), &tables);
        assert!(!page.contains("Table 1"));
        assert!(page.contains("### Table 2\n\n| k | v |\n| --- | --- |\n\n---\n\n"));
    }

    #[test]
    fn test_render_page_without_tables() {
        let f = MarkdownFormatter::new(RenderOptions::new().with_tables(false));
        let tables = vec![Table::from_strings(vec![vec!["k", "v"]])];
        let page = f.render_page(1, Some("text body"), &tables);
        assert!(!page.contains('|'));
    }

    #[test]
    fn test_render_document_chinese_labels() {
        let f = MarkdownFormatter::new(RenderOptions::new().with_labels(Labels::chinese()));
        let pages = vec![Page::with_text(1, "型号 DM4340")];
        let doc = f.render_document("减速电机技术文档", 1, &pages);
        assert_eq!(
            doc,
            "# 减速电机技术文档\n\n*文档页数: 1*\n\n---\n\n## 第 1 页\n\n### 型号 DM4340\n\n---\n\n"
        );
    }

    #[test]
    fn test_render_respects_page_selection() {
        let mut doc = Document::new("Doc", 3);
        for n in 1..=3 {
            doc.add_page(Page::with_text(n, format!("page body number {}", n)));
        }
        let f = MarkdownFormatter::new(RenderOptions::new().with_pages(PageSelection::Pages(vec![2])));
        let out = f.render(&doc);
        assert!(out.contains("*Converted from PDF - 3 pages*"));
        assert!(out.contains("## Page 2"));
        assert!(!out.contains("## Page 1"));
        assert!(!out.contains("## Page 3"));
    }

    #[test]
    fn test_heading_threshold_is_configurable() {
        let text = "B".repeat(70);
        let default = formatter();
        let wide = MarkdownFormatter::new(
            RenderOptions::new().with_heading_rules(HeadingRules::caps_only(100)),
        );
        assert!(!default.is_heading(&text));
        assert!(wide.is_heading(&text));
    }

    #[test]
    fn test_render_with_stats() {
        let mut doc = Document::new("Doc", 1);
        let mut page = Page::with_text(1, "INTRO\n\nsome body text");
        page.add_table(Table::from_strings(vec![vec!["a", "b"]]));
        page.add_table(Table::from_rows(vec![vec![None]]));
        doc.add_page(page);

        let result = formatter().render_with_stats(&doc);
        assert_eq!(result.stats.page_count, 1);
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.paragraph_count, 1);
        assert_eq!(result.stats.table_count, 1);
        assert_eq!(result.stats.dropped_table_count, 1);
        assert!(result.content.starts_with("# Doc\n\n"));
    }
}
