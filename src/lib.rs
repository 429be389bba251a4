//! # pdfsift
//!
//! Structural content extraction from PDF documents.
//!
//! One run decodes every page of a PDF, splits each page's text into
//! header, body and footer by vertical position, finds the table of
//! contents, collects tables and each unique embedded image, and can
//! repackage the results as a report, JSON, a contents CSV, an image ZIP
//! and a rebuilt PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{analyze_file, export};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let analysis = analyze_file("document.pdf")?;
//!
//!     for page in &analysis.classifications {
//!         println!("page {}: {} headers", page.page, page.headers.len());
//!     }
//!     println!("{}", export::toc_csv(&analysis.toc));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Stages
//!
//! - **Decoding** ([`decode`]): positioned text blocks, links and image
//!   references per page, via lopdf
//! - **Classification**: header / body / footer bands of a configurable
//!   [`Threshold`]
//! - **Contents detection**: dot-leader lines or parsed `title ... page`
//!   entries, see [`TocMode`]
//! - **Image deduplication**: one record per image object, first page wins
//! - **Export** ([`export`]): report, JSON, CSV, ZIP and rebuilt PDF, written
//!   to any [`export::ArtifactSink`]

pub mod analyze;
pub mod decode;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod options;

// Re-export commonly used types
pub use analyze::{Pipeline, StructuralClassifier, TocDetector};
pub use decode::{LopdfSource, PageSource, StreamTableExtractor, TableExtractor};
pub use detect::{is_pdf, sniff, PdfHeader};
pub use error::{Error, Result};
pub use export::{ArtifactSink, DirSink, ExportOptions, JsonFormat, MemorySink};
pub use model::{
    Analysis, BBox, Classification, DetectedToc, DocumentInfo, ExtractedImage, Grid, ImageFormat,
    ImageRecord, ImageRef, ImageStore, Link, LinkKind, Notice, NoticeLevel, Page, PageSummary,
    PageTables, Region, TextBlock, TocEntry,
};
pub use options::{
    ErrorMode, ExtractOptions, PageSelection, Threshold, ThresholdPreset, TocMode,
    DEFAULT_TOC_PAGE_CAP,
};

use std::io::Read;
use std::path::Path;

/// Analyse a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfsift::analyze_file;
///
/// let analysis = analyze_file("document.pdf").unwrap();
/// println!("Pages: {}", analysis.page_count());
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<Analysis> {
    analyze_file_with_options(path, ExtractOptions::default())
}

/// Analyse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{analyze_file_with_options, ExtractOptions, ThresholdPreset, TocMode};
///
/// let options = ExtractOptions::new()
///     .with_preset(ThresholdPreset::Standard)
///     .with_toc_mode(TocMode::pattern())
///     .lenient();
/// let analysis = analyze_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn analyze_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Analysis> {
    let data = std::fs::read(path)?;
    analyze_bytes_with_options(&data, options)
}

/// Analyse a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdfsift::analyze_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let analysis = analyze_bytes(&data).unwrap();
/// ```
pub fn analyze_bytes(data: &[u8]) -> Result<Analysis> {
    analyze_bytes_with_options(data, ExtractOptions::default())
}

/// Analyse a PDF held in memory with custom options.
pub fn analyze_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Analysis> {
    Pipeline::new(options).run(data)
}

/// Analyse a PDF read to the end from a reader.
pub fn analyze_reader<R: Read>(mut reader: R) -> Result<Analysis> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    analyze_bytes(&data)
}

/// Builder for analysing PDF documents and producing artifacts.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{Sift, ThresholdPreset};
///
/// let result = Sift::new()
///     .with_preset(ThresholdPreset::Tight)
///     .with_tables(false)
///     .lenient()
///     .analyze("document.pdf")?;
/// std::fs::write("toc.csv", result.toc_csv())?;
/// std::fs::write("rebuilt.pdf", result.rebuild_pdf()?)?;
/// # Ok::<(), pdfsift::Error>(())
/// ```
pub struct Sift {
    options: ExtractOptions,
}

impl Sift {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Set the header/footer band height.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.options = self.options.with_threshold(threshold);
        self
    }

    /// Use a threshold preset.
    pub fn with_preset(mut self, preset: ThresholdPreset) -> Self {
        self.options = self.options.with_preset(preset);
        self
    }

    /// Set the contents detection mode.
    pub fn with_toc_mode(mut self, mode: TocMode) -> Self {
        self.options = self.options.with_toc_mode(mode);
        self
    }

    /// Enable or disable image collection.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.options = self.options.with_images(extract);
        self
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.options = self.options.with_tables(extract);
        self
    }

    /// Enable lenient mode.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Analyse a PDF file.
    pub fn analyze<P: AsRef<Path>>(self, path: P) -> Result<SiftResult> {
        let analysis = analyze_file_with_options(path, self.options)?;
        Ok(SiftResult { analysis })
    }

    /// Analyse a PDF from bytes.
    pub fn analyze_bytes(self, data: &[u8]) -> Result<SiftResult> {
        let analysis = analyze_bytes_with_options(data, self.options)?;
        Ok(SiftResult { analysis })
    }
}

impl Default for Sift {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of analysing a PDF document.
pub struct SiftResult {
    /// The analysis
    pub analysis: Analysis,
}

impl SiftResult {
    /// Text report.
    pub fn to_text(&self) -> String {
        export::to_text(&self.analysis)
    }

    /// JSON analysis.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        export::to_json(&self.analysis, format)
    }

    /// Contents as `Title,Page` CSV.
    pub fn toc_csv(&self) -> String {
        export::toc_csv(&self.analysis.toc)
    }

    /// Unique images as a ZIP archive.
    pub fn image_archive(&self) -> Result<Vec<u8>> {
        export::image_archive(&self.analysis.images)
    }

    /// PDF rebuilt from the header/body/footer partition.
    pub fn rebuild_pdf(&self) -> Result<Vec<u8>> {
        export::Reconstruction::from_classifications(&self.analysis.classifications).to_pdf()
    }

    /// Write the selected artifacts to a sink.
    pub fn export(
        &self,
        options: &ExportOptions,
        sink: &mut dyn ArtifactSink,
    ) -> Result<Vec<&'static str>> {
        export::export_all(&self.analysis, options, sink)
    }

    /// Get the analysis.
    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sift_builder() {
        let sift = Sift::new()
            .with_preset(ThresholdPreset::Tight)
            .with_tables(false)
            .lenient();

        assert_eq!(sift.options.threshold, Threshold::TIGHT);
        assert!(!sift.options.extract_tables);
        assert_eq!(sift.options.error_mode, ErrorMode::Lenient);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_analyze_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(matches!(analyze_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_analyze_bytes_too_short() {
        let data = b"%PDF";
        assert!(analyze_bytes(data).is_err());
    }

    #[test]
    fn test_analyze_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(analyze_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_analyze_bytes_truncated_body() {
        // Valid header, nothing a parser can use after it
        let data = b"%PDF-1.7\n%garbage without objects";
        assert!(analyze_bytes(data).is_err());
    }

    #[test]
    fn test_analyze_reader_propagates_format_error() {
        let reader = std::io::Cursor::new(b"GIF89a".to_vec());
        assert!(matches!(analyze_reader(reader), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_analyze_file_missing() {
        assert!(matches!(
            analyze_file("/nonexistent/file.pdf"),
            Err(Error::Io(_))
        ));
    }
}
