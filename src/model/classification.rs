//! Header / body / footer partition of a page.

use serde::{Deserialize, Serialize};

/// Vertical region a text block was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Top band of the page
    Header,
    /// Everything between the bands
    Body,
    /// Bottom band of the page
    Footer,
}

impl Region {
    /// All regions in page order.
    pub const ALL: [Region; 3] = [Region::Header, Region::Body, Region::Footer];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Region::Header => "Header",
            Region::Body => "Body",
            Region::Footer => "Footer",
        }
    }
}

/// Classified text of one page.
///
/// Every non-empty block of the page lands in exactly one list, in the
/// page's block order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Page number (1-indexed)
    pub page: u32,
    /// Header texts
    pub headers: Vec<String>,
    /// Body texts
    pub body: Vec<String>,
    /// Footer texts
    pub footers: Vec<String>,
}

impl Classification {
    /// Create an empty classification for a page.
    pub fn new(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Append a text to a region.
    pub fn push(&mut self, region: Region, text: String) {
        match region {
            Region::Header => self.headers.push(text),
            Region::Body => self.body.push(text),
            Region::Footer => self.footers.push(text),
        }
    }

    /// Texts assigned to a region.
    pub fn region(&self, region: Region) -> &[String] {
        match region {
            Region::Header => &self.headers,
            Region::Body => &self.body,
            Region::Footer => &self.footers,
        }
    }

    /// Total number of classified blocks.
    pub fn len(&self) -> usize {
        self.headers.len() + self.body.len() + self.footers.len()
    }

    /// Check if nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
