//! Page decoding.
//!
//! The analysis stages only see pages through [`PageSource`]. The crate's
//! own implementation, [`LopdfSource`], interprets content streams with
//! lopdf: it positions text into blocks, reads link annotations and
//! resolves image XObjects. Tables come from a separate, whole-document
//! [`TableExtractor`].

mod images;
pub mod layout;
mod links;
mod source;
pub mod tables;
mod text;

pub use layout::{LayoutAnalyzer, PageFrame, TextLine, TextSpan};
pub use source::LopdfSource;
pub use tables::{StreamTableExtractor, TableDetectorConfig, TableExtractor};

use crate::error::Result;
use crate::model::{DocumentInfo, ExtractedImage, ImageRef, Page};

/// Supplies decoded pages to the pipeline.
///
/// Pages are requested one at a time in increasing number order.
pub trait PageSource {
    /// Total number of pages in the document.
    fn page_count(&self) -> u32;

    /// Decode one page (1-indexed).
    fn page(&self, number: u32) -> Result<Page>;

    /// Materialize the binary content of an embedded image.
    fn extract_image(&self, reference: &ImageRef) -> Result<ExtractedImage>;

    /// Document information. Sources without metadata report only the
    /// page count.
    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count(),
            ..Default::default()
        }
    }
}
