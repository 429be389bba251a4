//! lopdf-backed page decoder.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::detect::{sniff, PdfHeader};
use crate::error::{Error, Result};
use crate::model::{DocumentInfo, ExtractedImage, ImageRef, Page};
use crate::options::ErrorMode;

use super::images::{extract_image, page_image_refs};
use super::layout::{page_text, LayoutAnalyzer, PageFrame};
use super::links::extract_page_links;
use super::text::{dict_string, number, parse_pdf_date, resolve, resolve_dict};
use super::PageSource;

/// Inherited page attributes are looked up at most this many levels up.
const MAX_TREE_DEPTH: usize = 32;

/// US Letter, used when a page has no usable `/MediaBox`.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A [`PageSource`] over a PDF loaded in memory with lopdf.
pub struct LopdfSource {
    doc: Document,
    header: PdfHeader,
    pages: BTreeMap<u32, ObjectId>,
    error_mode: ErrorMode,
}

impl LopdfSource {
    /// Load a PDF from bytes.
    ///
    /// Anything that does not carry a `%PDF-x.y` header is rejected before
    /// lopdf sees it.
    pub fn open(data: &[u8]) -> Result<Self> {
        let header = sniff(data)?;
        let doc = Document::load_mem(data)?;
        Ok(Self::from_document(doc, header))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: Document, header: PdfHeader) -> Self {
        let pages = doc.get_pages();
        log::debug!("loaded {} with {} pages", header, pages.len());
        Self {
            doc,
            header,
            pages,
            error_mode: ErrorMode::default(),
        }
    }

    /// Set how per-page text failures are handled.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Header version of the loaded file.
    pub fn header(&self) -> PdfHeader {
        self.header
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    /// Look up a page attribute, walking up `/Parent` for inheritable keys.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return resolve(&self.doc, value);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let Some(Object::Array(arr)) = self.inherited(page_id, b"MediaBox") else {
            return DEFAULT_MEDIA_BOX;
        };
        let values: Vec<f32> = arr
            .iter()
            .filter_map(|obj| resolve(&self.doc, obj).and_then(number))
            .collect();
        match values.as_slice() {
            [x0, y0, x1, y1, ..] => [*x0, *y0, *x1, *y1],
            _ => DEFAULT_MEDIA_BOX,
        }
    }

    fn rotation(&self, page_id: ObjectId) -> i64 {
        self.inherited(page_id, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|r| r.rem_euclid(360))
            .unwrap_or(0)
    }

    fn resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        self.inherited(page_id, b"Resources")
            .and_then(|obj| obj.as_dict().ok())
    }

    /// Decode the text of one page, positioned blocks first.
    ///
    /// When the content stream cannot be interpreted, lopdf's own text
    /// extraction supplies the raw text and the page has no blocks.
    fn decode_text(&self, page: &mut Page, page_id: ObjectId, frame: PageFrame) -> Result<()> {
        let analyzer = LayoutAnalyzer::new(&self.doc);
        match analyzer.extract_page_blocks(page_id, frame) {
            Ok(blocks) if !blocks.is_empty() => {
                page.text = page_text(&blocks);
                page.blocks = blocks;
                Ok(())
            }
            Ok(_) => {
                // Nothing positioned; lopdf may still find text we skip
                let plain = self.doc.extract_text(&[page.number]);
                apply_plain_text(page, plain);
                Ok(())
            }
            Err(layout_err) => {
                log::debug!(
                    "page {}: layout analysis failed ({}), falling back to plain text",
                    page.number,
                    layout_err
                );
                page.text = self
                    .doc
                    .extract_text(&[page.number])
                    .map(|t| t.trim().to_string())
                    .map_err(|e| Error::TextExtract(format!("Page {}: {}", page.number, e)))?;
                Ok(())
            }
        }
    }
}

/// Fill page text from lopdf's plain extraction; a failure is kept as a
/// page warning.
fn apply_plain_text(page: &mut Page, plain: lopdf::Result<String>) {
    match plain {
        Ok(text) => page.text = text.trim().to_string(),
        Err(e) => {
            log::debug!("page {}: plain text fallback failed ({})", page.number, e);
            let err = Error::TextExtract(format!("Page {}: {}", page.number, e));
            page.warnings.push(err.to_string());
        }
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<Page> {
        let page_id = self.page_id(number)?;

        let [x0, y0, x1, y1] = self.media_box(page_id);
        let mut page = Page::new(number, (x1 - x0).abs(), (y1 - y0).abs());
        page.rotation = self.rotation(page_id);

        let frame = PageFrame {
            left: x0.min(x1),
            top: y0.max(y1),
        };

        if let Err(e) = self.decode_text(&mut page, page_id, frame) {
            if self.error_mode == ErrorMode::Strict {
                return Err(e);
            }
            log::warn!("Failed to extract text from page {}: {}", number, e);
            page.warnings.push(e.to_string());
        }

        page.links = extract_page_links(&self.doc, page_id, &self.pages, frame);
        page.images = page_image_refs(&self.doc, self.resources(page_id));

        Ok(page)
    }

    fn extract_image(&self, reference: &ImageRef) -> Result<ExtractedImage> {
        extract_image(&self.doc, reference)
    }

    fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::with_version(self.doc.version.to_string());

        if let Some(dict) = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| resolve_dict(&self.doc, obj))
        {
            info.title = dict_string(&self.doc, dict, b"Title");
            info.author = dict_string(&self.doc, dict, b"Author");
            info.subject = dict_string(&self.doc, dict, b"Subject");
            info.keywords = dict_string(&self.doc, dict, b"Keywords");
            info.creator = dict_string(&self.doc, dict, b"Creator");
            info.producer = dict_string(&self.doc, dict, b"Producer");

            info.created = dict_string(&self.doc, dict, b"CreationDate")
                .as_deref()
                .and_then(parse_pdf_date);
            info.modified = dict_string(&self.doc, dict, b"ModDate")
                .as_deref()
                .and_then(parse_pdf_date);
        }

        info.page_count = self.page_count();
        info.encrypted = self.doc.is_encrypted();
        info
    }
}
