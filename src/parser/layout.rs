//! Layout analysis for PDF pages.
//!
//! Interprets a page's content stream into positioned spans, groups spans
//! sharing a baseline into lines, and groups consecutive lines into blocks.
//! Each span keeps its effective font size and the style flags of its font,
//! which is all the title/paragraph classifier needs.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{Block, Line, PageLayout, Span};

use super::backend::{ContentOp, FontResource, Operand, PageId, PdfBackend};

/// Default font size when a content stream shows text before any `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// TJ adjustment (in thousandths of text space) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A span with its position on the page.
#[derive(Debug, Clone)]
pub struct PositionedSpan {
    /// The span itself
    pub span: Span,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
}

impl PositionedSpan {
    fn new(span: Span, x: f32, y: f32) -> Self {
        // No glyph metrics: assume an average glyph is half an em wide.
        let width = span.text.chars().count() as f32 * span.size * 0.5;
        Self { span, x, y, width }
    }
}

/// A line with the geometry used for block grouping.
#[derive(Debug, Clone)]
struct PositionedLine {
    line: Line,
    y: f32,
    size: f32,
    bold: bool,
}

/// Layout analyzer for extracting blocks, lines and spans from PDF pages.
pub struct LayoutAnalyzer<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer over a backend.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Analyze one page (1-indexed) into blocks of lines of spans.
    pub fn page_layout(&self, page_num: u32) -> Result<PageLayout> {
        let spans = self.extract_page_spans(page_num)?;
        let lines = group_spans_into_lines(spans);
        let blocks = group_lines_into_blocks(lines);
        Ok(PageLayout::new(page_num, blocks))
    }

    /// Extract positioned spans from a page's content stream.
    pub fn extract_page_spans(&self, page_num: u32) -> Result<Vec<PositionedSpan>> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let fonts: HashMap<Vec<u8>, FontResource> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();

        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        Ok(self.interpret(page_id, &ops, &fonts))
    }

    fn interpret(
        &self,
        page_id: PageId,
        ops: &[ContentOp],
        fonts: &HashMap<Vec<u8>, FontResource>,
    ) -> Vec<PositionedSpan> {
        let mut state = TextState::default();
        let mut spans = Vec::new();

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    state.in_text = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(Operand::Name(name)) = op.operands.first() {
                        state.font_flags = fonts.get(name).map(|f| f.flags).unwrap_or(0);
                        state.font = name.clone();
                    }
                    state.font_size = op.number(1, DEFAULT_FONT_SIZE);
                }
                "TL" => state.leading = op.number(0, 0.0),
                "Td" => state.matrix.translate(op.number(0, 0.0), op.number(1, 0.0)),
                "TD" => {
                    let ty = op.number(1, 0.0);
                    state.leading = -ty;
                    state.matrix.translate(op.number(0, 0.0), ty);
                }
                "Tm" => state.matrix.set([
                    op.number(0, 1.0),
                    op.number(1, 0.0),
                    op.number(2, 0.0),
                    op.number(3, 1.0),
                    op.number(4, 0.0),
                    op.number(5, 0.0),
                ]),
                "T*" => state.matrix.next_line(state.leading),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.matrix.next_line(state.leading);
                    }
                    if !state.in_text {
                        continue;
                    }
                    let text = self.show_text(page_id, &state.font, op);
                    if text.trim().is_empty() {
                        continue;
                    }
                    let (x, y) = state.matrix.position();
                    let size = state.font_size * state.matrix.vertical_scale();
                    let span = Span::new(text, size, state.font_flags);
                    let positioned = PositionedSpan::new(span, x, y);
                    state.matrix.advance(positioned.width);
                    spans.push(positioned);
                }
                _ => {}
            }
        }

        spans
    }

    /// Decode the string operand(s) of a text-showing operator.
    fn show_text(&self, page_id: PageId, font: &[u8], op: &ContentOp) -> String {
        let decode = |bytes: &[u8]| self.backend.decode_text(page_id, font, bytes);

        match op.operator.as_str() {
            "TJ" => {
                let Some(Operand::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        Operand::Str(bytes) => combined.push_str(&decode(bytes)),
                        other => {
                            // Large negative kerning moves the pen right: a word gap.
                            let adjustment = -other.as_f32().unwrap_or(0.0);
                            if adjustment > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(char::is_whitespace)
                            {
                                combined.push(' ');
                            }
                        }
                    }
                }
                combined
            }
            // `"` carries word and character spacing before the string.
            "\"" => match op.operands.get(2) {
                Some(Operand::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
            _ => match op.operands.first() {
                Some(Operand::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
        }
    }
}

/// Group spans into lines by baseline, top to bottom.
///
/// Spans within a line are ordered left to right; a space is inserted
/// between two spans when the horizontal gap between them looks like a
/// word break and neither side already carries whitespace.
fn group_spans_into_lines(mut spans: Vec<PositionedSpan>) -> Vec<PositionedLine> {
    // PDF Y grows upwards.
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<PositionedSpan> = Vec::new();

    for span in spans {
        if let Some(first) = current.first() {
            let tolerance = span.span.size.max(first.span.size) * 0.3;
            if (span.y - first.y).abs() > tolerance {
                lines.push(build_line(std::mem::take(&mut current)));
            }
        }
        current.push(span);
    }
    if !current.is_empty() {
        lines.push(build_line(current));
    }

    lines
}

fn build_line(mut spans: Vec<PositionedSpan>) -> PositionedLine {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));

    let y = spans.first().map(|s| s.y).unwrap_or(0.0);
    let total_chars: usize = spans.iter().map(|s| s.span.text.len()).sum();
    let bold_chars: usize = spans
        .iter()
        .filter(|s| s.span.is_bold())
        .map(|s| s.span.text.len())
        .sum();
    let size = if total_chars > 0 {
        spans
            .iter()
            .map(|s| s.span.size * s.span.text.len() as f32)
            .sum::<f32>()
            / total_chars as f32
    } else {
        spans.first().map(|s| s.span.size).unwrap_or(0.0)
    };

    let mut out: Vec<Span> = Vec::with_capacity(spans.len());
    let mut prev_end: Option<f32> = None;
    for positioned in spans {
        if let (Some(end), Some(prev)) = (prev_end, out.last_mut()) {
            let gap = positioned.x - end;
            let needs_space = gap > positioned.span.size * 0.1
                && !prev.text.ends_with(char::is_whitespace)
                && !positioned.span.text.starts_with(char::is_whitespace);
            if needs_space {
                prev.text.push(' ');
            }
        }
        prev_end = Some(positioned.x + positioned.width);
        out.push(positioned.span);
    }

    PositionedLine {
        line: Line::new(out),
        y,
        size,
        bold: total_chars > 0 && bold_chars * 2 > total_chars,
    }
}

/// Group lines into blocks, breaking on large vertical gaps, font size
/// changes and bold/regular switches.
fn group_lines_into_blocks(lines: Vec<PositionedLine>) -> Vec<Block> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut prev: Option<(f32, f32, bool)> = None;

    for line in lines {
        if let Some((prev_y, prev_size, prev_bold)) = prev {
            let breaks = (prev_y - line.y).abs() > avg_spacing * 1.5
                || (prev_size - line.size).abs() > 1.0
                || prev_bold != line.bold;
            if breaks && !current.is_empty() {
                blocks.push(Block::new(std::mem::take(&mut current)));
            }
        }
        prev = Some((line.y, line.size, line.bold));
        current.push(line.line);
    }
    if !current.is_empty() {
        blocks.push(Block::new(current));
    }

    blocks
}

fn average_line_spacing(lines: &[PositionedLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return DEFAULT_FONT_SIZE;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Text-object state tracked while interpreting a content stream.
#[derive(Debug, Clone)]
struct TextState {
    in_text: bool,
    font: Vec<u8>,
    font_flags: u32,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            font: Vec::new(),
            font_flags: 0,
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_FONT_SIZE,
            matrix: TextMatrix::default(),
        }
    }
}

/// Text matrix plus the start of the current line.
#[derive(Debug, Clone)]
struct TextMatrix {
    m: [f32; 6],
    line: [f32; 6],
}

impl Default for TextMatrix {
    fn default() -> Self {
        let identity = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        Self {
            m: identity,
            line: identity,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: [f32; 6]) {
        self.m = m;
        self.line = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line;
        self.line = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.m = self.line;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    /// Move the pen right after showing text, without starting a new line.
    fn advance(&mut self, width: f32) {
        self.m[4] += width * self.m[0];
        self.m[5] += width * self.m[1];
    }

    fn position(&self) -> (f32, f32) {
        (self.m[4], self.m[5])
    }

    /// Length of the text-space y unit vector, `(c, d)`.
    fn vertical_scale(&self) -> f32 {
        (self.m[2] * self.m[2] + self.m[3] * self.m[3]).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flags;
    use std::collections::BTreeMap;

    /// Backend serving one page with a fixed operation list.
    struct ScriptedBackend {
        fonts: Vec<FontResource>,
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for ScriptedBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (3, 0))])
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<FontResource>> {
            Ok(self.fonts.clone())
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }
    }

    fn name(n: &str) -> Operand {
        Operand::Name(n.as_bytes().to_vec())
    }

    fn text(t: &str) -> Operand {
        Operand::Str(t.as_bytes().to_vec())
    }

    fn show(font: &str, size: i64, x: i64, y: i64, t: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name(font), Operand::Integer(size)]),
            ContentOp::new("Td", vec![Operand::Integer(x), Operand::Integer(y)]),
            ContentOp::new("Tj", vec![text(t)]),
            ContentOp::new("ET", vec![]),
        ]
    }

    fn backend(ops: Vec<ContentOp>) -> ScriptedBackend {
        ScriptedBackend {
            fonts: vec![
                FontResource::new(b"F1".to_vec(), "Helvetica"),
                FontResource::new(b"F2".to_vec(), "Helvetica-Bold"),
            ],
            ops,
        }
    }

    #[test]
    fn test_heading_and_body_become_separate_blocks() {
        let mut ops = show("F2", 20, 72, 720, "Cloud Storage Overview");
        ops.extend(show("F1", 11, 72, 690, "Object stores keep data durable"));
        ops.extend(show("F1", 11, 72, 676, "across regions and zones."));

        let backend = backend(ops);
        let page = LayoutAnalyzer::new(&backend).page_layout(1).unwrap();

        assert_eq!(page.number, 1);
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].raw_text(), "Cloud Storage Overview ");
        assert!(page.blocks[0].spans().all(|s| s.flags & flags::BOLD != 0));
        assert_eq!(page.blocks[0].lines[0].spans[0].size, 20.0);
        assert_eq!(
            page.blocks[1].raw_text(),
            "Object stores keep data durable across regions and zones. "
        );
        assert_eq!(page.blocks[1].lines.len(), 2);
    }

    #[test]
    fn test_large_gap_breaks_block() {
        let mut ops = show("F1", 10, 72, 700, "First paragraph line one");
        ops.extend(show("F1", 10, 72, 688, "First paragraph line two"));
        ops.extend(show("F1", 10, 72, 676, "First paragraph line three"));
        ops.extend(show("F1", 10, 72, 600, "Second paragraph"));

        let backend = backend(ops);
        let page = LayoutAnalyzer::new(&backend).page_layout(1).unwrap();
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[1].raw_text(), "Second paragraph ");
    }

    #[test]
    fn test_tj_kerning_inserts_word_space() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), Operand::Integer(12)]),
            ContentOp::new("Td", vec![Operand::Integer(72), Operand::Integer(700)]),
            ContentOp::new(
                "TJ",
                vec![Operand::Array(vec![
                    text("Hello"),
                    Operand::Integer(-250),
                    text("world"),
                    Operand::Integer(-20),
                    text("!"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ];
        let backend = backend(ops);
        let spans = LayoutAnalyzer::new(&backend).extract_page_spans(1).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].span.text, "Hello world!");
    }

    #[test]
    fn test_tm_scales_font_size() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), Operand::Integer(1)]),
            ContentOp::new(
                "Tm",
                vec![
                    Operand::Integer(14),
                    Operand::Integer(0),
                    Operand::Integer(0),
                    Operand::Integer(14),
                    Operand::Integer(72),
                    Operand::Integer(500),
                ],
            ),
            ContentOp::new("Tj", vec![text("Scaled")]),
            ContentOp::new("ET", vec![]),
        ];
        let backend = backend(ops);
        let spans = LayoutAnalyzer::new(&backend).extract_page_spans(1).unwrap();
        assert_eq!(spans[0].span.size, 14.0);
        assert_eq!((spans[0].x, spans[0].y), (72.0, 500.0));
    }

    #[test]
    fn test_skewed_tm_uses_y_axis_for_size() {
        let matrix = [10, 10, 0, 10, 72, 500];
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), Operand::Integer(1)]),
            ContentOp::new("Tm", matrix.iter().map(|&v| Operand::Integer(v)).collect()),
            ContentOp::new("Tj", vec![text("Sheared")]),
            ContentOp::new("ET", vec![]),
        ];
        let backend = backend(ops);
        let spans = LayoutAnalyzer::new(&backend).extract_page_spans(1).unwrap();
        assert_eq!(spans[0].span.size, 10.0);
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let ops = vec![ContentOp::new("Tj", vec![text("stray")])];
        let backend = backend(ops);
        let page = LayoutAnalyzer::new(&backend).page_layout(1).unwrap();
        assert!(page.is_empty());
        assert!(page.span_sizes().is_empty());
    }

    #[test]
    fn test_page_out_of_range() {
        let backend = backend(vec![]);
        let result = LayoutAnalyzer::new(&backend).page_layout(2);
        assert!(matches!(result, Err(Error::PageOutOfRange(2, 1))));
    }

    #[test]
    fn test_adjacent_spans_on_one_line_are_spaced() {
        let mut ops = show("F1", 10, 72, 700, "Left");
        ops.extend(show("F2", 10, 200, 700, "Right"));
        let backend = backend(ops);
        let page = LayoutAnalyzer::new(&backend).page_layout(1).unwrap();
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].lines.len(), 1);
        assert_eq!(page.blocks[0].raw_text(), "Left Right ");
    }
}
