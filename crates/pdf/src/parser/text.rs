//! Content-stream walking and line assembly.
//!
//! ```text
//! content ops  ->  TextSpan[]  ->  TextLine[]  ->  page text
//!   (per page)      extract         group_spans     join lines
//! ```
//!
//! Positions are tracked only as precisely as line grouping needs; glyph
//! widths are approximated from the font size.

use super::backend::{ContentOp, Operand, PageFont, PageId, PdfBackend};
use crate::normalize::normalize_run;
use crate::PdfError;

/// A run of text shown by one text-showing operator.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

/// Spans sharing (approximately) the same baseline.
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub y: f32,
}

impl TextLine {
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Spans whose baselines differ by less than this share a line.
const Y_TOLERANCE: f32 = 1.0;

/// Glyph width as a fraction of font size when real metrics are unknown.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Below this gap (points) adjacent same-font spans are glued without a space.
const MIN_WORD_GAP: f32 = 1.5;

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Rendered size: `font_size * sqrt(b^2 + d^2)` of the text matrix.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    fn char_advance(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    /// Move past `text` and return the horizontal displacement.
    fn advance_after_show(&mut self, text: &str) -> f32 {
        let dx: f32 = text
            .chars()
            .map(|ch| {
                let spacing = if ch == ' ' { self.word_spacing } else { 0.0 };
                self.char_advance() + self.char_spacing + spacing
            })
            .sum();
        self.advance_x(dx);
        dx
    }
}

fn number(operands: &[Operand], index: usize) -> Option<f32> {
    operands.get(index).and_then(Operand::as_number)
}

fn handle_tf(operands: &[Operand], fonts: &[PageFont], state: &mut TextState) {
    let key = match operands.first() {
        Some(Operand::Name(n)) | Some(Operand::Str(n)) => n.clone(),
        _ => return,
    };

    // Fonts missing from the resource dictionary keep their resource key as name.
    state.font_name = fonts
        .iter()
        .find(|font| font.key == key)
        .and_then(|font| font.base_font.clone())
        .unwrap_or_else(|| String::from_utf8_lossy(&key).into_owned());
    state.font_size = number(operands, 1).unwrap_or(0.0);
    state.font_key = key;
}

fn handle_tm(operands: &[Operand], state: &mut TextState) {
    let vals: Vec<f32> = operands.iter().take(6).filter_map(Operand::as_number).collect();
    if let [a, b, c, d, e, f] = vals[..] {
        state.text_matrix = [a, b, c, d, e, f];
        state.line_matrix = state.text_matrix;
    }
}

/// Walks one page's content stream, collecting spans.
struct SpanCollector<'a> {
    backend: &'a dyn PdfBackend,
    page: PageId,
    state: TextState,
    spans: Vec<TextSpan>,
}

impl SpanCollector<'_> {
    fn decode(&self, operand: &Operand) -> String {
        match operand {
            Operand::Str(bytes) => normalize_run(&self.backend.decode_text(
                self.page,
                &self.state.font_key,
                bytes,
            )),
            _ => String::new(),
        }
    }

    fn push_span(&mut self, text: String, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        let width = text.chars().count() as f32 * self.state.char_advance();
        self.spans.push(TextSpan {
            text,
            x,
            y,
            width,
            font_size: self.state.effective_font_size(),
            font_name: self.state.font_name.clone(),
        });
    }

    /// `Tj`, `'` and `"`: one string, one span.
    fn show_string(&mut self, operand: &Operand) {
        let text = self.decode(operand);
        let x = self.state.text_matrix[4];
        let y = self.state.text_matrix[5] + self.state.text_rise;
        self.state.advance_after_show(&text);
        self.push_span(text, x, y);
    }

    /// `TJ`: strings interleaved with kerning in thousandths of text space.
    /// Contiguous strings become one span; wide kerns become spaces.
    fn show_array(&mut self, elements: &[Operand]) {
        let mut buf = String::new();
        let mut x = self.state.text_matrix[4];
        let y = self.state.text_matrix[5] + self.state.text_rise;

        for element in elements {
            if let Operand::Str(_) = element {
                if buf.is_empty() {
                    x = self.state.text_matrix[4];
                }
                let fragment = self.decode(element);
                self.state.advance_after_show(&fragment);
                buf.push_str(&fragment);
            } else if let Some(adjust) = element.as_number() {
                let dx = -adjust / 1000.0 * self.state.font_size * self.state.horiz_scale;
                if dx > self.state.char_advance() * 0.3 && !buf.is_empty() {
                    buf.push(' ');
                }
                self.state.advance_x(dx);
            }
        }

        self.push_span(buf.trim_end().to_string(), x, y);
    }

    fn apply(&mut self, op: &ContentOp, fonts: &[PageFont]) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "BT" => {
                self.state.text_matrix = IDENTITY_MATRIX;
                self.state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => handle_tf(operands, fonts, &mut self.state),
            "Tm" => handle_tm(operands, &mut self.state),
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    self.state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    self.state.leading = -ty;
                    self.state.translate_line(tx, ty);
                }
            }
            "T*" => self.state.next_line(),
            "TL" => {
                if let Some(v) = number(operands, 0) {
                    self.state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(operands, 0) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(operands, 0) {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(operands, 0) {
                    self.state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number(operands, 0) {
                    self.state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(first) = operands.first() {
                    self.show_string(first);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(elements)) = operands.first() {
                    self.show_array(elements);
                }
            }
            "'" => {
                self.state.next_line();
                if let Some(first) = operands.first() {
                    self.show_string(first);
                }
            }
            "\"" => {
                if let [aw, ac, string] = operands {
                    if let Some(aw) = aw.as_number() {
                        self.state.word_spacing = aw;
                    }
                    if let Some(ac) = ac.as_number() {
                        self.state.char_spacing = ac;
                    }
                    self.state.next_line();
                    self.show_string(string);
                }
            }
            _ => {}
        }
    }
}

/// Walk a page's content stream and return its spans in rendering order.
///
/// Handles the text-state and text-showing operators
/// (`BT Tf Tm Td TD T* TL Tc Tw Tz Ts Tj TJ ' "`); everything else is
/// ignored. Span text is normalized with [`normalize_run`].
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page: PageId,
) -> Result<Vec<TextSpan>, PdfError> {
    let ops = backend.page_ops(page)?;
    let fonts = backend.page_fonts(page).unwrap_or_default();

    let mut collector = SpanCollector {
        backend,
        page,
        state: TextState::default(),
        spans: Vec::new(),
    };
    for op in &ops {
        collector.apply(op, &fonts);
    }

    Ok(collector.spans)
}

/// Spans of every page, keyed by 1-based page number.
pub fn extract_all_pages(
    backend: &dyn PdfBackend,
) -> Result<Vec<(usize, Vec<TextSpan>)>, PdfError> {
    backend
        .pages()
        .into_iter()
        .map(|(page_num, page_id)| {
            let spans = extract_page_spans(backend, page_id)?;
            log::debug!("page {}: {} spans", page_num, spans.len());
            Ok((page_num as usize, spans))
        })
        .collect()
}

/// Group spans into lines, top of the page first.
///
/// Within a line, spans run left to right. Adjacent spans in the same font
/// are glued together (with a space when there is a visible gap), so a
/// span's text always survives verbatim inside its line.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<TextLine> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some(line) if (span.y - line.y).abs() <= Y_TOLERANCE => line.spans.push(span),
            _ => lines.push(TextLine {
                y: span.y,
                spans: vec![span],
            }),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.spans.sort_by(|a, b| a.x.total_cmp(&b.x));
            merge_line(line)
        })
        .collect()
}

fn merge_line(line: TextLine) -> TextLine {
    let mut merged: Vec<TextSpan> = Vec::with_capacity(line.spans.len());

    for span in line.spans {
        if let Some(prev) = merged.last_mut() {
            let gap = span.x - (prev.x + prev.width);
            let same_font = prev.font_name == span.font_name
                && (prev.font_size - span.font_size).abs() < 0.5;

            if same_font && gap > -prev.font_size && gap < prev.font_size * 2.0 {
                if gap >= MIN_WORD_GAP {
                    prev.text.push(' ');
                }
                prev.text.push_str(&span.text);
                prev.width = (span.x + span.width) - prev.x;
                continue;
            }
        }
        merged.push(span);
    }

    TextLine {
        spans: merged,
        y: line.y,
    }
}
