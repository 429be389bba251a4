//! Rebuilding a PDF from classified page text.
//!
//! Each source page becomes a header section, a body section and a footer
//! section (empty ones are left out), each introduced by a bold label and
//! followed by a page break. The output is a plain content dump with no
//! attempt at visual fidelity.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::model::{Classification, Region};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const LABEL_SIZE: f32 = 12.0;
const LABEL_LEADING: f32 = 18.0;
const TEXT_SIZE: f32 = 11.0;
const TEXT_LEADING: f32 = 14.0;
const PARAGRAPH_GAP: f32 = 6.0;

/// Average Helvetica advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// One element of the rebuilt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutBlock {
    /// Bold section label
    Label(Region),
    /// One classified text
    Paragraph(String),
    /// End of a source page
    PageBreak,
}

/// Layout of the rebuilt document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    blocks: Vec<LayoutBlock>,
}

impl Reconstruction {
    /// Lay out classified pages in order: header, body, footer, page break.
    pub fn from_classifications(classifications: &[Classification]) -> Self {
        let mut blocks = Vec::new();

        for classification in classifications {
            for region in Region::ALL {
                let texts = classification.region(region);
                if texts.is_empty() {
                    continue;
                }
                blocks.push(LayoutBlock::Label(region));
                blocks.extend(texts.iter().cloned().map(LayoutBlock::Paragraph));
            }
            blocks.push(LayoutBlock::PageBreak);
        }

        Self { blocks }
    }

    /// Layout blocks in document order.
    pub fn blocks(&self) -> &[LayoutBlock] {
        &self.blocks
    }

    /// Number of page breaks, one per source page.
    pub fn page_breaks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, LayoutBlock::PageBreak))
            .count()
    }

    /// Number of sections labelled with `region`.
    pub fn label_count(&self, region: Region) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, LayoutBlock::Label(r) if *r == region))
            .count()
    }

    /// Serialize the layout as a PDF.
    ///
    /// Long sections continue on extra pages; a source page with no
    /// classified text still produces a blank page.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new();

        for block in &self.blocks {
            match block {
                LayoutBlock::Label(region) => {
                    writer.gap(PARAGRAPH_GAP);
                    writer.line(BOLD_FONT, LABEL_SIZE, LABEL_LEADING, region.label())?;
                }
                LayoutBlock::Paragraph(text) => {
                    for line in wrap(text, TEXT_SIZE, TEXT_WIDTH) {
                        writer.line(REGULAR_FONT, TEXT_SIZE, TEXT_LEADING, &line)?;
                    }
                    writer.gap(PARAGRAPH_GAP);
                }
                LayoutBlock::PageBreak => writer.flush_page()?,
            }
        }

        writer.finish()
    }
}

/// Minimal page-by-page PDF writer.
struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    kids: Vec<Object>,
    operations: Vec<Operation>,
    y: f32,
}

impl PdfWriter {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular,
                BOLD_FONT => bold,
            },
        });

        Self {
            doc,
            pages_id,
            resources_id,
            kids: Vec::new(),
            operations: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn gap(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn line(&mut self, font: &str, size: f32, leading: f32, text: &str) -> Result<()> {
        if self.y - leading < MARGIN && !self.operations.is_empty() {
            self.flush_page()?;
        }
        self.y -= leading;

        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
            ),
            Operation::new("Td", vec![Object::Real(MARGIN), Object::Real(self.y)]),
            Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn flush_page(&mut self) -> Result<()> {
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let bytes = content
            .encode()
            .map_err(|e| Error::Render(format!("content stream: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, bytes));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ],
            "Resources" => self.resources_id,
            "Contents" => content_id,
        });
        self.kids.push(page_id.into());
        self.y = PAGE_HEIGHT - MARGIN;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if !self.operations.is_empty() || self.kids.is_empty() {
            self.flush_page()?;
        }

        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => std::mem::take(&mut self.kids),
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal(concat!("pdfsift ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| Error::Render(format!("failed to write PDF: {}", e)))?;
        log::debug!("rebuilt PDF: {} pages, {} bytes", count, buf.len());
        Ok(buf)
    }
}

/// Greedy word wrap on an average glyph width.
///
/// Explicit line breaks are kept and words longer than a line are split.
fn wrap(text: &str, font_size: f32, width: f32) -> Vec<String> {
    let max_chars = ((width / (font_size * GLYPH_WIDTH)) as usize).max(1);
    let mut lines = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in source_line.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                let piece_len = piece.len();
                let needed = if current_len == 0 {
                    piece_len
                } else {
                    current_len + 1 + piece_len
                };
                if needed > max_chars && current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(piece);
                current_len += piece_len;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Encode text for a WinAnsi simple font, replacing what it cannot show.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => win_ansi_extra(c).unwrap_or(b'?'),
        })
        .collect()
}

/// WinAnsiEncoding code points 0x80-0x9F.
fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_only(page: u32, text: &str) -> Classification {
        let mut c = Classification::new(page);
        c.push(Region::Body, text.to_string());
        c
    }

    #[test]
    fn test_body_only_layout() {
        let pages = vec![body_only(1, "one"), body_only(2, "two"), body_only(3, "three")];
        let rebuilt = Reconstruction::from_classifications(&pages);

        assert_eq!(rebuilt.page_breaks(), 3);
        assert_eq!(rebuilt.label_count(Region::Body), 3);
        assert_eq!(rebuilt.label_count(Region::Header), 0);
        assert_eq!(rebuilt.label_count(Region::Footer), 0);
    }

    #[test]
    fn test_section_order() {
        let mut c = Classification::new(1);
        c.push(Region::Footer, "f".to_string());
        c.push(Region::Body, "b1".to_string());
        c.push(Region::Header, "h".to_string());
        c.push(Region::Body, "b2".to_string());

        let rebuilt = Reconstruction::from_classifications(&[c]);
        assert_eq!(
            rebuilt.blocks(),
            &[
                LayoutBlock::Label(Region::Header),
                LayoutBlock::Paragraph("h".to_string()),
                LayoutBlock::Label(Region::Body),
                LayoutBlock::Paragraph("b1".to_string()),
                LayoutBlock::Paragraph("b2".to_string()),
                LayoutBlock::Label(Region::Footer),
                LayoutBlock::Paragraph("f".to_string()),
                LayoutBlock::PageBreak,
            ]
        );
    }

    #[test]
    fn test_empty_page_still_breaks() {
        let rebuilt = Reconstruction::from_classifications(&[
            Classification::new(1),
            body_only(2, "text"),
        ]);
        assert_eq!(rebuilt.blocks()[0], LayoutBlock::PageBreak);
        assert_eq!(rebuilt.page_breaks(), 2);
    }

    #[test]
    fn test_pdf_has_one_page_per_source_page() {
        let pages = vec![Classification::new(1), body_only(2, "Hello"), body_only(3, "World")];
        let bytes = Reconstruction::from_classifications(&pages).to_pdf().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        let text = doc.extract_text(&[2]).unwrap();
        assert!(text.contains("Body"));
        assert!(text.contains("Hello"));
    }

    #[test]
    fn test_long_section_overflows() {
        let long = vec!["word"; 4000].join(" ");
        let bytes = Reconstruction::from_classifications(&[body_only(1, &long)])
            .to_pdf()
            .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_empty_reconstruction_is_valid_pdf() {
        let bytes = Reconstruction::default().to_pdf().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("aaa bbb ccc", 10.0, 40.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("abcdefghij", 10.0, 20.0), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("one\ntwo", 11.0, TEXT_WIDTH), vec!["one", "two"]);
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(win_ansi("中"), b"?".to_vec());
    }

    #[test]
    fn test_win_ansi_typographic_punctuation() {
        assert_eq!(
            win_ansi("\u{2018}a\u{2019} \u{201C}b\u{201D}"),
            b"\x91a\x92 \x93b\x94".to_vec()
        );
        assert_eq!(
            win_ansi("1\u{2013}2\u{2014}3 \u{2022} \u{20AC}5\u{2122}"),
            b"1\x962\x973 \x95 \x805\x99".to_vec()
        );
        // Holes in the 0x80-0x9F block stay unmapped
        assert_eq!(win_ansi("\u{0081}"), b"?".to_vec());
    }
}
