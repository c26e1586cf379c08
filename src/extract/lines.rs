//! Reading-order text assembly from positioned spans.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use super::content::{is_spaceless_script_char, TextSpan};

/// Spans closer than this fraction of the font size join without a space.
const JOIN_GAP_FACTOR: f32 = 0.15;

/// A line of text: spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Baseline Y (PDF coordinates, larger is higher on the page)
    pub y: f32,
    /// Spans on this line, sorted by X
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Join the spans of the line into a string.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<&TextSpan> = None;

        for span in &self.spans {
            if let Some(p) = prev {
                if needs_space(p, span) {
                    out.push(' ');
                }
            }
            out.push_str(&span.text);
            prev = Some(span);
        }

        out
    }

    /// Largest font size on the line.
    pub fn font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }
}

fn needs_space(prev: &TextSpan, next: &TextSpan) -> bool {
    let (Some(last), Some(first)) = (prev.text.chars().last(), next.text.chars().next()) else {
        return false;
    };
    if last.is_whitespace() || first.is_whitespace() {
        return false;
    }
    if is_spaceless_script_char(last) && is_spaceless_script_char(first) {
        return false;
    }
    let gap = next.x - prev.right();
    gap >= prev.font_size.max(next.font_size) * JOIN_GAP_FACTOR
}

/// Group spans into lines. Spans whose baselines differ by no more than
/// `y_tolerance_factor` times their font size share a line.
pub fn group_lines(spans: &[TextSpan], y_tolerance_factor: f32) -> Vec<TextLine> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for span in sorted {
        let tolerance = span.font_size * y_tolerance_factor;
        match lines.last_mut() {
            Some(line) if (line.y - span.y).abs() <= tolerance => line.spans.push(span),
            _ => lines.push(TextLine {
                y: span.y,
                spans: vec![span],
            }),
        }
    }

    for line in &mut lines {
        line.spans
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    }

    lines
}

/// Render lines as text: one line per text line, with a blank line where the
/// spacing to the previous line exceeds `paragraph_gap_factor` times the
/// median spacing. The result is NFC normalized.
pub fn lines_to_text(lines: &[TextLine], paragraph_gap_factor: f32) -> String {
    let gaps: Vec<f32> = lines.windows(2).map(|w| w[0].y - w[1].y).collect();
    let threshold = median(&gaps).map(|m| m * paragraph_gap_factor);

    let mut out = String::new();
    // Baseline of the last line written; blank lines in between are skipped.
    let mut last_y: Option<f32> = None;
    for line in lines {
        let text = line.text();
        if text.trim().is_empty() {
            continue;
        }
        if let Some(prev) = last_y {
            let breaks_paragraph = match threshold {
                Some(t) => prev - line.y > t,
                None => false,
            };
            out.push_str(if breaks_paragraph { "\n\n" } else { "\n" });
        }
        out.push_str(text.trim_end());
        last_y = Some(line.y);
    }

    out.nfc().collect()
}

/// Median of the positive values, when there are at least two.
fn median(values: &[f32]) -> Option<f32> {
    let mut positive: Vec<f32> = values.iter().copied().filter(|v| *v > 0.0).collect();
    if positive.len() < 2 {
        return None;
    }
    positive.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = positive.len() / 2;
    Some(if positive.len() % 2 == 0 {
        (positive[mid - 1] + positive[mid]) / 2.0
    } else {
        positive[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 10.0)
    }

    #[test]
    fn test_group_lines_by_baseline() {
        let spans = vec![
            span("World", 100.0, 700.5),
            span("Hello", 50.0, 700.0),
            span("Next", 50.0, 686.0),
        ];

        let lines = group_lines(&spans, 0.5);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[1].text(), "Next");
    }

    #[test]
    fn test_adjacent_spans_join() {
        // "Hel" is 15pt wide at 10pt, so "lo" starts right where it ends
        let line = TextLine {
            y: 0.0,
            spans: vec![span("Hel", 0.0, 0.0), span("lo", 15.0, 0.0)],
        };
        assert_eq!(line.text(), "Hello");
    }

    #[test]
    fn test_cjk_spans_join_without_space() {
        let line = TextLine {
            y: 0.0,
            spans: vec![span("额定", 0.0, 0.0), span("转矩", 40.0, 0.0)],
        };
        assert_eq!(line.text(), "额定转矩");
    }

    #[test]
    fn test_paragraph_break_on_large_gap() {
        let spans = vec![
            span("one", 50.0, 700.0),
            span("two", 50.0, 686.0),
            span("three", 50.0, 672.0),
            span("four", 50.0, 630.0),
        ];

        let text = lines_to_text(&group_lines(&spans, 0.5), 1.5);
        assert_eq!(text, "one\ntwo\nthree\n\nfour");
    }

    #[test]
    fn test_gap_measured_across_blank_line() {
        let spans = vec![
            span("one", 50.0, 700.0),
            span("two", 50.0, 686.0),
            span("three", 50.0, 672.0),
            span(" ", 50.0, 660.0),
            span("four", 50.0, 646.0),
        ];

        let text = lines_to_text(&group_lines(&spans, 0.5), 1.5);
        assert_eq!(text, "one\ntwo\nthree\n\nfour");
    }

    #[test]
    fn test_single_gap_never_breaks() {
        let spans = vec![span("one", 50.0, 700.0), span("two", 50.0, 600.0)];
        let text = lines_to_text(&group_lines(&spans, 0.5), 1.5);
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_nfc_normalization() {
        let spans = vec![span("Cafe\u{301}", 50.0, 700.0)];
        let text = lines_to_text(&group_lines(&spans, 0.5), 1.5);
        assert_eq!(text, "Caf\u{e9}");
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[14.0]), None);
        assert_eq!(median(&[14.0, 14.0, 42.0]), Some(14.0));
        assert_eq!(median(&[10.0, 20.0]), Some(15.0));
    }
}
