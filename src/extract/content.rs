//! Content stream interpretation: text-showing operators to positioned spans.

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Default leading when a stream uses `T*` without setting `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// `TJ` adjustments beyond this many thousandths of an em read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A run of text at a position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated advance width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span, estimating its width from the text and font size.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = estimate_width(&text, font_size);
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Approximate advance width: half an em for most glyphs, a full em for
/// ideographs.
pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars()
        .map(|c| if is_spaceless_script_char(c) { 1.0 } else { 0.5 })
        .sum::<f32>()
        * font_size
}

/// Check if a character belongs to a script written without word spaces
/// (Chinese, Japanese kana, CJK punctuation). Hangul is excluded: Korean
/// uses spaces.
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F
        | 0xFF00..=0xFFEF
    )
}

/// Text and line matrices of a `BT`/`ET` block.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line (translation part of the line matrix).
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    /// `Td`: move to the start of the next line, offset from the current one.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    /// Move along the baseline after showing text.
    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
        self.f += width * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Walks a page's content stream and collects its text spans.
pub struct SpanCollector<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    spans: Vec<TextSpan>,
    matrix: TextMatrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl<'a, B: PdfBackend + ?Sized> SpanCollector<'a, B> {
    /// Create a collector for one page.
    pub fn new(backend: &'a B, page: PageId) -> Self {
        Self {
            backend,
            page,
            spans: Vec::new(),
            matrix: TextMatrix::default(),
            font: Vec::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            in_text: false,
        }
    }

    /// Interpret the operations and return the spans in stream order.
    pub fn collect(mut self, ops: &[ContentOp]) -> Vec<TextSpan> {
        for op in ops {
            self.apply(op);
        }
        self.spans
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "BT" => {
                self.in_text = true;
                self.matrix = TextMatrix::default();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font = name.clone();
                }
                self.font_size = op.number(1).unwrap_or(self.font_size);
            }
            "TL" => self.leading = op.number(0).unwrap_or(self.leading),
            "Td" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.matrix.translate(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.leading = -ty;
                    self.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    self.matrix.set(
                        op.number(0).unwrap_or(1.0),
                        op.number(1).unwrap_or(0.0),
                        op.number(2).unwrap_or(0.0),
                        op.number(3).unwrap_or(1.0),
                        op.number(4).unwrap_or(0.0),
                        op.number(5).unwrap_or(0.0),
                    );
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = self.decode_array(items);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        self.matrix.translate(0.0, -self.leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend.decode_text(self.page, &self.font, bytes)
    }

    /// Join the strings of a `TJ` array, turning large negative kerning into
    /// a space except between ideographs.
    fn decode_array(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                other => {
                    let Some(adjustment) = other.as_number() else {
                        continue;
                    };
                    if -adjustment > TJ_SPACE_THRESHOLD {
                        match combined.chars().last() {
                            Some(c) if !c.is_whitespace() && !is_spaceless_script_char(c) => {
                                combined.push(' ')
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        if !self.in_text {
            return;
        }

        let size = self.font_size * self.matrix.scale();
        let (x, y) = self.matrix.position();
        let width = estimate_width(&text, self.font_size);
        self.matrix.advance(width);

        if !text.trim().is_empty() {
            self.spans.push(TextSpan::new(text, x, y, size));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::collections::BTreeMap;

    /// Backend that decodes every string as UTF-8.
    struct Utf8Backend;

    impl PdfBackend for Utf8Backend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(Vec::new())
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
        fn title(&self) -> Option<String> {
            None
        }
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    fn s(text: &str) -> PdfValue {
        PdfValue::Str(text.as_bytes().to_vec())
    }

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp::new(operator, operands)
    }

    fn collect(ops: Vec<ContentOp>) -> Vec<TextSpan> {
        SpanCollector::new(&Utf8Backend, (1, 0)).collect(&ops)
    }

    #[test]
    fn test_td_positions() {
        let spans = collect(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            op("Td", vec![num(72.0), num(700.0)]),
            op("Tj", vec![s("Hello")]),
            op("Td", vec![num(0.0), num(-14.0)]),
            op("Tj", vec![s("World")]),
            op("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].x, spans[0].y), (72.0, 700.0));
        assert_eq!((spans[1].x, spans[1].y), (72.0, 686.0));
        assert_eq!(spans[0].font_size, 10.0);
    }

    #[test]
    fn test_consecutive_tj_advance() {
        let spans = collect(vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            op("Tm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(100.0), num(500.0)]),
            op("Tj", vec![s("ab")]),
            op("Tj", vec![s("cd")]),
            op("ET", vec![]),
        ]);

        assert_eq!(spans[0].x, 100.0);
        assert_eq!(spans[1].x, 110.0);
        assert_eq!(spans[1].y, 500.0);
    }

    #[test]
    fn test_tstar_uses_leading() {
        let spans = collect(vec![
            op("BT", vec![]),
            op("TL", vec![num(20.0)]),
            op("Td", vec![num(50.0), num(400.0)]),
            op("Tj", vec![s("one")]),
            op("T*", vec![]),
            op("Tj", vec![s("two")]),
            op("'", vec![s("three")]),
            op("ET", vec![]),
        ]);

        let ys: Vec<f32> = spans.iter().map(|s| s.y).collect();
        assert_eq!(ys, vec![400.0, 380.0, 360.0]);
        assert!(spans.iter().all(|s| s.x == 50.0));
    }

    #[test]
    fn test_tj_array_spacing() {
        let spans = collect(vec![
            op("BT", vec![]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    s("Rated"),
                    PdfValue::Integer(-300),
                    s("torque"),
                    PdfValue::Integer(-20),
                    s("s"),
                ])],
            ),
            op(
                "TJ",
                vec![PdfValue::Array(vec![s("额定"), PdfValue::Integer(-500), s("转矩")])],
            ),
            op("ET", vec![]),
        ]);

        assert_eq!(spans[0].text, "Rated torques");
        assert_eq!(spans[1].text, "额定转矩");
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let spans = collect(vec![op("Tj", vec![s("stray")])]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_blank_text_not_emitted() {
        let spans = collect(vec![
            op("BT", vec![]),
            op("Tj", vec![s("   ")]),
            op("ET", vec![]),
        ]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_estimate_width() {
        assert_eq!(estimate_width("ab", 10.0), 10.0);
        assert_eq!(estimate_width("规格", 10.0), 20.0);
    }
}
