//! First-seen collection of embedded images.

use crate::decode::PageSource;
use crate::model::{ImageRecord, ImageRef, ImageStore, Notice};

/// Collects each embedded image once, keyed by its object reference.
#[derive(Debug, Default)]
pub struct ImageDeduplicator {
    store: ImageStore,
    notices: Vec<Notice>,
}

impl ImageDeduplicator {
    /// Create an empty deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the images referenced by one page.
    ///
    /// References already stored are skipped without touching the source.
    /// A reference that fails to materialize produces a warning and is
    /// left out; it will be attempted again if a later page uses it.
    pub fn collect(&mut self, source: &dyn PageSource, page: u32, refs: &[ImageRef]) {
        for reference in refs {
            if self.store.contains(reference) {
                continue;
            }

            match source.extract_image(reference) {
                Ok(image) => {
                    log::debug!(
                        "image {} first seen on page {} ({}, {} bytes)",
                        reference,
                        page,
                        image.format,
                        image.data.len()
                    );
                    self.store
                        .insert_if_absent(ImageRecord::new(reference.clone(), page, image));
                }
                Err(e) => {
                    log::warn!("Error extracting image {} on page {}: {}", reference, page, e);
                    self.notices.push(
                        Notice::warning(format!("Error extracting image {}: {}", reference, e))
                            .on_page(page),
                    );
                }
            }
        }
    }

    /// Number of unique images collected so far.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The collected images and the warnings raised along the way.
    pub fn finish(self) -> (ImageStore, Vec<Notice>) {
        (self.store, self.notices)
    }
}
