//! Table detection from text positions (stream mode).
//!
//! Tables are found without ruling lines: spans are grouped into rows by
//! baseline, column edges are the left edges that line up across rows, and a
//! run of consecutive rows aligned to those edges becomes a table.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Cell, Table};

use super::content::TextSpan;

/// Width of the buckets left edges are snapped to when counting alignment.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span may sit from a column edge and still count as aligned.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Slack allowed for a span starting slightly left of its column.
const COLUMN_SLACK: f32 = 10.0;

/// A table region found on a page.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first row
    pub top_y: f32,
    /// Baseline of the last row
    pub bottom_y: f32,
    /// Column left edges, ascending
    pub columns: Vec<f32>,
    /// Rows top to bottom
    pub rows: Vec<SpanRow>,
}

impl DetectedTable {
    /// Build the cell grid. Spans falling in the same column are joined with
    /// a space; a column with no span is an absent cell.
    pub fn to_table(&self) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Vec<&str>> = vec![Vec::new(); self.columns.len()];
                for span in &row.spans {
                    let col = column_for(span.x, &self.columns);
                    if let Some(cell) = cells.get_mut(col) {
                        cell.push(span.text.trim());
                    }
                }
                cells
                    .into_iter()
                    .map(|parts| -> Cell {
                        if parts.is_empty() {
                            None
                        } else {
                            Some(parts.join(" "))
                        }
                    })
                    .collect()
            })
            .collect();

        Table::from_rows(rows)
    }
}

/// Spans sharing a baseline, with their positions in the page's span list.
#[derive(Debug, Clone)]
pub struct SpanRow {
    /// Mean baseline of the row
    pub y: f32,
    /// Spans sorted by X
    pub spans: Vec<TextSpan>,
    indices: Vec<usize>,
}

/// Detector tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum share of a row's spans that must sit on a column edge
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in a page's spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom tuning.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables, top to bottom. Returns the tables and the spans that
    /// were not part of any table, in their original order.
    pub fn detect(&self, spans: Vec<TextSpan>) -> (Vec<DetectedTable>, Vec<TextSpan>) {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            return (Vec::new(), spans);
        }

        let rows = self.group_into_rows(&spans);
        if rows.len() < cfg.min_rows {
            return (Vec::new(), spans);
        }

        let columns = self.detect_columns(&rows);
        log::debug!("table detector: {} rows, column edges {:?}", rows.len(), columns);
        if columns.len() < cfg.min_columns {
            return (Vec::new(), spans);
        }

        let mut tables = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();

        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Column edges are re-derived from the region alone
            let region_columns = self.detect_columns(region);
            if region_columns.len() < cfg.min_columns {
                continue;
            }
            if region_columns.len() > cfg.max_columns {
                log::debug!(
                    "table detector: rejecting region with {} columns",
                    region_columns.len()
                );
                continue;
            }
            if self.is_list_pattern(region, &region_columns) {
                log::debug!("table detector: rejecting list-like region");
                continue;
            }

            used.extend(region.iter().flat_map(|r| r.indices.iter().copied()));
            tables.push(DetectedTable {
                top_y: region[0].y,
                bottom_y: region[region.len() - 1].y,
                columns: region_columns,
                rows: region.to_vec(),
            });
        }

        let remaining = spans
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, span)| span)
            .collect();

        (tables, remaining)
    }

    /// Group spans into rows by baseline, top to bottom.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut order: Vec<usize> = (0..spans.len()).collect();
        order.sort_by(|&a, &b| {
            spans[b]
                .y
                .partial_cmp(&spans[a].y)
                .unwrap_or(Ordering::Equal)
                .then(spans[a].x.partial_cmp(&spans[b].x).unwrap_or(Ordering::Equal))
        });

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut anchor_y: Option<f32> = None;

        for i in order {
            let span = &spans[i];
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match (anchor_y, rows.last_mut()) {
                (Some(y), Some(row)) if (span.y - y).abs() <= tolerance => {
                    row.spans.push(span.clone());
                    row.indices.push(i);
                }
                _ => {
                    anchor_y = Some(span.y);
                    rows.push(SpanRow {
                        y: span.y,
                        spans: vec![span.clone()],
                        indices: vec![i],
                    });
                }
            }
        }

        for row in &mut rows {
            row.y = row.spans.iter().map(|s| s.y).sum::<f32>() / row.spans.len() as f32;
        }

        rows
    }

    /// Column edges: bucketed left edges that recur in enough rows.
    ///
    /// Rows with at least two spans are the evidence; when too few rows have
    /// two spans, every row counts.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let evidence: Vec<&SpanRow> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };
        if evidence.is_empty() {
            return Vec::new();
        }

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for row in &evidence {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|s| (s.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((evidence.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Runs of at least `min_rows` consecutive aligned rows, as inclusive
    /// index ranges. A row needs two spans to count as a table row.
    fn find_table_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.spans.len() >= 2
                && alignment_score(row, columns) >= self.config.min_alignment_ratio;
            if aligned {
                start.get_or_insert(i);
            } else if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Numbered or bulleted lists split into a marker span and a text span
    /// look like two-column tables.
    fn is_list_pattern(&self, rows: &[SpanRow], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;
        for row in rows {
            let Some(first) = row.spans.first() else {
                continue;
            };
            let text = first.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }

        let total = rows.len() as f32;
        if bullets as f32 / total >= 0.5 {
            return true;
        }
        columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5
    }
}

/// Share of the row's spans that start on a column edge.
fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Index of the column a span starting at `x` falls into.
fn column_for(x: f32, columns: &[f32]) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let next = columns.get(i + 1).copied().unwrap_or(f32::INFINITY);
        if x >= start - COLUMN_SLACK && x < next - COLUMN_SLACK {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (x - **a)
                .abs()
                .partial_cmp(&(x - **b).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map_or(0, |(i, _)| i)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "※" | "□" | "◆" | "◇" | "▶"
    )
}

/// "1.", "12)", "3", "a.", "B)", also "1 ." with inner whitespace.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let digits = cleaned.chars().take_while(char::is_ascii_digit).count();
    let suffix = &cleaned[digits..];
    if digits > 0 && (suffix == "." || suffix == ")") {
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.' | ')'), None) if c.is_alphabetic()
    )
}
