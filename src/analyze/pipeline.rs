//! The extraction pipeline.

use crate::decode::{LopdfSource, PageSource, StreamTableExtractor, TableExtractor};
use crate::error::Result;
use crate::model::{Analysis, Notice, PageTables};
use crate::options::{ErrorMode, ExtractOptions};

use super::aggregate::DocumentAggregator;
use super::classify::StructuralClassifier;
use super::dedup::ImageDeduplicator;
use super::toc::TocDetector;

/// Runs decoding and analysis for one document at a time.
///
/// Every run starts from fresh accumulators, so one pipeline can process
/// any number of documents.
pub struct Pipeline {
    options: ExtractOptions,
    tables: Box<dyn TableExtractor>,
}

impl Pipeline {
    /// Create a pipeline with the stream-mode table extractor.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            tables: Box::new(StreamTableExtractor::new()),
        }
    }

    /// Replace the table extractor.
    pub fn with_table_extractor(mut self, extractor: impl TableExtractor + 'static) -> Self {
        self.tables = Box::new(extractor);
        self
    }

    /// Options this pipeline runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Decode and analyse a PDF held in memory.
    ///
    /// Fails only when the bytes are not a readable PDF (or, in strict
    /// mode, when a page cannot be decoded). Everything else ends up as a
    /// [`Notice`] on the returned analysis.
    pub fn run(&self, data: &[u8]) -> Result<Analysis> {
        let source = LopdfSource::open(data)?.with_error_mode(self.options.error_mode);
        let mut analysis = self.run_source(&source)?;

        if self.options.extract_tables {
            self.extract_tables(data, &mut analysis);
        }

        log::info!(
            "processed {} pages: {} toc items, {} tables, {} images, {} notices",
            analysis.page_count(),
            analysis.toc.len(),
            analysis.tables.table_count(),
            analysis.images.len(),
            analysis.notices.len()
        );
        Ok(analysis)
    }

    /// Run the page stages over any page source. Tables are not extracted.
    pub fn run_source(&self, source: &dyn PageSource) -> Result<Analysis> {
        let classifier = StructuralClassifier::new(self.options.threshold);
        let mut aggregator = DocumentAggregator::new();
        let mut images = ImageDeduplicator::new();
        let mut pages = Vec::new();
        let mut notices = Vec::new();

        for number in 1..=source.page_count() {
            if !self.options.pages.includes(number) {
                continue;
            }

            let page = match source.page(number) {
                Ok(page) => page,
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping page {}: {}", number, e);
                    notices.push(Notice::error(e.to_string()).on_page(number));
                    continue;
                }
                Err(e) => return Err(e),
            };

            notices.extend(
                page.warnings
                    .iter()
                    .map(|w| Notice::warning(w.clone()).on_page(number)),
            );
            if !page.has_text() {
                notices.push(Notice::info("No text found on this page.").on_page(number));
            }

            let classification = classifier.classify(&page);
            if self.options.extract_images {
                images.collect(source, number, &page.images);
            }
            aggregator.push(&page, classification);
            pages.push(page);
        }

        let aggregate = aggregator.finish();
        let toc = TocDetector::new(self.options.toc_mode).detect(&aggregate);
        if toc.is_empty() {
            notices.push(Notice::info("No Table of Contents entries detected."));
        }

        let (images, image_notices) = images.finish();
        notices.extend(image_notices);
        if self.options.extract_images && images.is_empty() {
            notices.push(Notice::info("No embedded images found in the entire PDF."));
        }

        let mut info = source.info();
        info.page_count = source.page_count();

        Ok(Analysis {
            info,
            summaries: aggregate.summaries,
            pages,
            classifications: aggregate.classifications,
            toc,
            images,
            tables: PageTables::new(),
            notices,
        })
    }

    fn extract_tables(&self, data: &[u8], analysis: &mut Analysis) {
        match self.tables.extract_tables(data) {
            Ok(found) => {
                let mut tables = PageTables::new();
                for (page, _, grid) in found.iter() {
                    if self.options.pages.includes(page) {
                        tables.push(page, grid.clone());
                    }
                }
                if tables.is_empty() {
                    analysis
                        .notices
                        .push(Notice::info("No tables detected in the PDF."));
                }
                analysis.tables = tables;
            }
            Err(e) => {
                log::warn!("Table extraction failed: {}", e);
                analysis
                    .notices
                    .push(Notice::error(format!("Table extraction failed: {}", e)));
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
