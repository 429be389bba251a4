//! Header / body / footer classification by vertical position.

use crate::model::{Classification, Page, Region, TextBlock};
use crate::options::Threshold;

/// Assigns each text block of a page to the header, body or footer band.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralClassifier {
    threshold: Threshold,
}

impl StructuralClassifier {
    /// Create a classifier with the given band height.
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    /// Band height in points.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Classify every block of a decoded page.
    pub fn classify(&self, page: &Page) -> Classification {
        classify(page.number, &page.blocks, page.height, self.threshold)
    }

    /// Region of a single block, or `None` if it carries no text.
    pub fn region_of(&self, block: &TextBlock, page_height: f32) -> Option<Region> {
        region_of(block, page_height, self.threshold.points())
    }
}

/// Partition a page's blocks into headers, body and footers.
///
/// A block whose top lies within `threshold` of the page top is a header;
/// otherwise one whose bottom lies within `threshold` of the page bottom is
/// a footer; everything else is body. The header test wins when both hold.
/// Whitespace-only blocks are dropped and malformed boxes count as body.
/// Texts are trimmed and keep the page's block order.
pub fn classify(
    page_number: u32,
    blocks: &[TextBlock],
    page_height: f32,
    threshold: Threshold,
) -> Classification {
    let mut result = Classification::new(page_number);
    let t = threshold.points();

    for block in blocks {
        if let Some(region) = region_of(block, page_height, t) {
            result.push(region, block.text.trim().to_string());
        }
    }

    log::debug!(
        "page {}: {} headers, {} body, {} footers",
        page_number,
        result.headers.len(),
        result.body.len(),
        result.footers.len()
    );
    result
}

fn region_of(block: &TextBlock, page_height: f32, t: f32) -> Option<Region> {
    if block.text.trim().is_empty() {
        return None;
    }

    let bbox = &block.bbox;
    if !bbox.is_well_formed() {
        return Some(Region::Body);
    }

    Some(if bbox.y0 < t {
        Region::Header
    } else if bbox.y1 > page_height - t {
        Region::Footer
    } else {
        Region::Body
    })
}
