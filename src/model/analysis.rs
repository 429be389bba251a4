//! Document-level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Classification, DetectedToc, ImageStore, Notice, NoticeLevel, Page, PageSummary, PageTables,
};

/// Document information dictionary and header data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl DocumentInfo {
    /// Create new info with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }
}

/// The complete result of one extraction run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    /// Document information
    pub info: DocumentInfo,

    /// Per-page metadata, in page order
    pub summaries: Vec<PageSummary>,

    /// Decoded pages, in page order
    pub pages: Vec<Page>,

    /// Header/body/footer partition, one per page
    pub classifications: Vec<Classification>,

    /// Detected table of contents
    pub toc: DetectedToc,

    /// Unique embedded images
    pub images: ImageStore,

    /// Tables by page
    pub tables: PageTables,

    /// Messages produced during the run
    pub notices: Vec<Notice>,
}

impl Analysis {
    /// Number of processed pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Look up a processed page by number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Classification of a processed page.
    pub fn classification(&self, number: u32) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.page == number)
    }

    /// Notices at a given level.
    pub fn notices_at(&self, level: NoticeLevel) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.level == level)
    }

    /// Whether any recoverable error was recorded.
    pub fn has_errors(&self) -> bool {
        self.notices_at(NoticeLevel::Error).next().is_some()
    }

    /// Plain text of all processed pages, separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
