//! Layout analysis for PDF pages.
//!
//! Interprets a page's content stream into text spans with positions,
//! groups spans into lines by baseline and lines into blocks by spacing,
//! font size and indentation. Blocks are returned in top-down page
//! coordinates.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BBox, TextBlock};

use super::text::{decode_text_simple, is_spaceless_script_char, number};

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Default text leading when a stream never sets `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// A text span with position information, in PDF user space (bottom-up).
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span with a width estimated from its length.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A text line composed of multiple spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans,
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Get the combined text of all spans with appropriate spacing.
    ///
    /// A space is inserted where the gap between spans exceeds a fifth of a
    /// glyph, except between two characters of a spaceless script.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - prev_span.right();

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * AVG_GLYPH_WIDTH
            };

            let should_insert_space = gap > avg_char_width * 0.2 && {
                let prev_is_cjk = prev_span
                    .text
                    .chars()
                    .last()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                let curr_is_cjk = span
                    .text
                    .chars()
                    .next()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                !(prev_is_cjk && curr_is_cjk)
            };

            let prev_ends_with_space =
                prev_span.text.ends_with(' ') || prev_span.text.ends_with('\u{00A0}');
            let curr_starts_with_space =
                span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

            if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }

    fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(TextSpan::top)
            .fold(f32::MIN, f32::max)
    }

    fn bottom(&self) -> f32 {
        self.spans
            .iter()
            .map(TextSpan::bottom)
            .fold(f32::MAX, f32::min)
    }

    fn right(&self) -> f32 {
        self.spans
            .iter()
            .map(TextSpan::right)
            .fold(f32::MIN, f32::max)
    }
}

/// Page origin used to flip PDF user space into top-down coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// Left edge of the media box
    pub left: f32,
    /// Top edge of the media box (its upper y coordinate)
    pub top: f32,
}

impl PageFrame {
    /// Convert a user-space box to top-down page coordinates.
    pub fn flip(&self, x0: f32, bottom: f32, x1: f32, top: f32) -> BBox {
        BBox::new(x0 - self.left, self.top - top, x1 - self.left, self.top - bottom)
    }
}

/// 2D affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn origin(&self) -> (f32, f32) {
        (self.0[4], self.0[5])
    }

    fn horizontal_scale(&self) -> f32 {
        (self.0[0] * self.0[0] + self.0[1] * self.0[1]).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.0[2] * self.0[2] + self.0[3] * self.0[3]).sqrt()
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        let mut m = [0.0; 6];
        for (slot, obj) in m.iter_mut().zip(operands) {
            *slot = number(obj)?;
        }
        Some(Matrix(m))
    }
}

/// Text and line matrices for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    tm: Matrix,
    tlm: Matrix,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: Matrix) {
        self.tm = m;
        self.tlm = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    /// Move the text position right by `tx` text-space units.
    fn advance(&mut self, tx: f32) {
        self.tm = Matrix::translation(tx, 0.0).multiply(&self.tm);
    }
}

/// Extracts text spans and blocks from pages of one document.
pub struct LayoutAnalyzer<'a> {
    doc: &'a Document,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// Extract text spans from a page with position information.
    /// Uses lopdf's font encoding support for text decoding.
    pub fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_default();

        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::TextExtract(e.to_string()))?;

        self.parse_content_stream(&content, &fonts)
    }

    /// Extract positioned text blocks from a page.
    pub fn extract_page_blocks(&self, page_id: ObjectId, frame: PageFrame) -> Result<Vec<TextBlock>> {
        let spans = self.extract_page_spans(page_id)?;
        let lines = group_spans_into_lines(spans);
        let blocks = group_lines_into_blocks(lines);

        Ok(blocks
            .into_iter()
            .map(|lines| to_text_block(&lines, frame))
            .filter(|block| !block.text.trim().is_empty())
            .collect())
    }

    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        match fonts.get(font).and_then(|f| f.get_font_encoding(self.doc).ok()) {
            Some(encoding) => Document::decode_text(&encoding, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content =
            Content::decode(content).map_err(|e| Error::TextExtract(e.to_string()))?;

        let mut spans = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut current_font: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut leading = DEFAULT_LEADING;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        ctm = m.multiply(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(name) = &operands[0] {
                            current_font = name.clone();
                        }
                        font_size = number(&operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(tl) = operands.first().and_then(number) {
                        leading = tl;
                    }
                }
                "Td" | "TD" => {
                    if operands.len() >= 2 {
                        let tx = number(&operands[0]).unwrap_or(0.0);
                        let ty = number(&operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        text_matrix.set(m);
                    }
                }
                "T*" => text_matrix.next_line(leading),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        text_matrix.next_line(leading);
                    }
                    if !in_text_block {
                        continue;
                    }

                    let (text, advance) = match op.operator.as_str() {
                        "TJ" => match operands.first() {
                            Some(Object::Array(items)) => {
                                self.show_array(items, fonts, &current_font, font_size)
                            }
                            _ => (String::new(), 0.0),
                        },
                        operator => {
                            let idx = if operator == "\"" { 2 } else { 0 };
                            match operands.get(idx) {
                                Some(Object::String(bytes, _)) => {
                                    let text = self.decode(fonts, &current_font, bytes);
                                    let advance = glyph_advance(&text, font_size);
                                    (text, advance)
                                }
                                _ => (String::new(), 0.0),
                            }
                        }
                    };

                    if !text.trim().is_empty() {
                        let trm = text_matrix.tm.multiply(&ctm);
                        let (x, y) = trm.origin();
                        let size = font_size * trm.vertical_scale();
                        let mut span = TextSpan::new(text, x, y, size);
                        span.width = advance * trm.horizontal_scale();
                        spans.push(span);
                    }
                    text_matrix.advance(advance);
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode a `TJ` array, returning its text and horizontal advance.
    ///
    /// Adjustments are in thousandths of text space; large negative values
    /// usually stand for word spaces.
    fn show_array(
        &self,
        items: &[Object],
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        font_size: f32,
    ) -> (String, f32) {
        let space_threshold = 200.0;
        let mut combined = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = self.decode(fonts, font, bytes);
                    advance += glyph_advance(&decoded, font_size);
                    combined.push_str(&decoded);
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -number(item).unwrap_or(0.0);
                    advance += adjustment / 1000.0 * font_size;
                    if adjustment > space_threshold
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && !combined
                            .chars()
                            .last()
                            .map(is_spaceless_script_char)
                            .unwrap_or(false)
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        (combined, advance)
    }
}

fn glyph_advance(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH
}

/// Group spans into lines based on baseline, top of the page first.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF y grows upwards: sort by y descending, then x
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => {
                current_line_spans.push(span);
            }
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(
                        &mut current_line_spans,
                    )));
                }
                current_y = Some(span.y);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(TextLine::from_spans(current_line_spans));
    }

    lines
}

/// Group lines into blocks (paragraphs) based on spacing.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = calculate_avg_line_spacing(&lines);
    let mut blocks: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev_line) = current.last() {
            if should_break_block(prev_line, &line, avg_spacing) {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return DEFAULT_LEADING;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (prev_line.y - curr_line.y).abs();

    // Paragraph gap relative to the page's rhythm, or a blank line's worth
    if spacing > avg_spacing * 1.5 || spacing > prev_line.font_size.max(curr_line.font_size) * 2.0
    {
        return true;
    }

    // Significant font size change
    if (prev_line.font_size - curr_line.font_size).abs() > 1.0 {
        return true;
    }

    // Significant left margin change (indentation)
    (prev_line.x - curr_line.x).abs() > 20.0
}

fn to_text_block(lines: &[TextLine], frame: PageFrame) -> TextBlock {
    let x0 = lines.iter().map(|l| l.x).fold(f32::MAX, f32::min);
    let x1 = lines.iter().map(TextLine::right).fold(f32::MIN, f32::max);
    let top = lines.iter().map(TextLine::top).fold(f32::MIN, f32::max);
    let bottom = lines.iter().map(TextLine::bottom).fold(f32::MAX, f32::min);

    let text = lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n");

    TextBlock::new(frame.flip(x0, bottom, x1, top), text)
}

/// Raw page text: block lines joined by newlines, blocks by a blank line.
pub fn page_text(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
