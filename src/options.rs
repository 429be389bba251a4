//! Extraction options and configuration.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Only the first this-many pages are searched for a contents listing
/// unless configured otherwise.
pub const DEFAULT_TOC_PAGE_CAP: u32 = 30;

/// Options for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Distance from the top/bottom edge that counts as header/footer
    pub threshold: Threshold,

    /// How the table of contents is detected
    pub toc_mode: TocMode,

    /// Whether to materialize embedded images
    pub extract_images: bool,

    /// Whether to run the table extraction phase
    pub extract_tables: bool,

    /// Error handling mode for per-page text failures
    pub error_mode: ErrorMode,

    /// Page selection (which pages to process)
    pub pages: PageSelection,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header/footer threshold.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the header/footer threshold from a preset.
    pub fn with_preset(mut self, preset: ThresholdPreset) -> Self {
        self.threshold = preset.threshold();
        self
    }

    /// Set the TOC detection mode.
    pub fn with_toc_mode(mut self, mode: TocMode) -> Self {
        self.toc_mode = mode;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (keep going when a page's text cannot be read).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            toc_mode: TocMode::default(),
            extract_images: true,
            extract_tables: true,
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
        }
    }
}

/// Header/footer band height in points.
///
/// A block whose top edge lies within this distance of the top of the page
/// is a header; one whose bottom edge lies within it of the bottom is a
/// footer.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f32);

impl Threshold {
    /// 80pt band.
    pub const TIGHT: Threshold = Threshold(80.0);
    /// 90pt band.
    pub const STANDARD: Threshold = Threshold(90.0);
    /// 95pt band.
    pub const LOOSE: Threshold = Threshold(95.0);

    /// Create a threshold, rejecting negative or non-finite values.
    pub fn new(points: f32) -> Result<Self> {
        if !points.is_finite() || points < 0.0 {
            return Err(Error::InvalidOption(format!(
                "threshold must be a non-negative number of points, got {}",
                points
            )));
        }
        Ok(Self(points))
    }

    /// Band height in points.
    pub fn points(self) -> f32 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::LOOSE
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt", self.0)
    }
}

impl FromStr for Threshold {
    type Err = Error;

    /// Accepts a preset name (`tight`, `standard`, `loose`) or a number.
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(preset) = s.parse::<ThresholdPreset>() {
            return Ok(preset.threshold());
        }
        let points: f32 = s
            .trim()
            .trim_end_matches("pt")
            .parse()
            .map_err(|_| Error::InvalidOption(format!("invalid threshold: {}", s)))?;
        Self::new(points)
    }
}

/// Named threshold presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPreset {
    /// 80pt
    Tight,
    /// 90pt
    Standard,
    /// 95pt
    #[default]
    Loose,
}

impl ThresholdPreset {
    /// The threshold this preset stands for.
    pub fn threshold(self) -> Threshold {
        match self {
            ThresholdPreset::Tight => Threshold::TIGHT,
            ThresholdPreset::Standard => Threshold::STANDARD,
            ThresholdPreset::Loose => Threshold::LOOSE,
        }
    }
}

impl FromStr for ThresholdPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tight" => Ok(ThresholdPreset::Tight),
            "standard" => Ok(ThresholdPreset::Standard),
            "loose" => Ok(ThresholdPreset::Loose),
            other => Err(Error::InvalidOption(format!("unknown preset: {}", other))),
        }
    }
}

/// Table of contents detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TocMode {
    /// Keep every line ending in a dot leader and a page number, verbatim.
    Pattern {
        /// Only look at pages up to this number (all pages when `None`)
        page_cap: Option<u32>,
    },
    /// Parse `title ... page` entries on pages that announce a contents listing.
    Structured {
        /// Only look at pages up to this number
        page_cap: u32,
    },
}

impl TocMode {
    /// Pattern mode over the whole document.
    pub fn pattern() -> Self {
        TocMode::Pattern { page_cap: None }
    }

    /// Structured mode with the default page cap.
    pub fn structured() -> Self {
        TocMode::Structured {
            page_cap: DEFAULT_TOC_PAGE_CAP,
        }
    }

    /// Highest page number inspected, if capped.
    pub fn page_cap(&self) -> Option<u32> {
        match self {
            TocMode::Pattern { page_cap } => *page_cap,
            TocMode::Structured { page_cap } => Some(*page_cap),
        }
    }

    /// Same mode with a different page cap.
    pub fn with_page_cap(self, cap: u32) -> Self {
        match self {
            TocMode::Pattern { .. } => TocMode::Pattern {
                page_cap: Some(cap),
            },
            TocMode::Structured { .. } => TocMode::Structured { page_cap: cap },
        }
    }
}

impl Default for TocMode {
    fn default() -> Self {
        Self::structured()
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page-level error
    #[default]
    Strict,
    /// Record a notice and continue
    Lenient,
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Process all pages
    #[default]
    All,
    /// Process a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Process specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_bounds(start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_bounds(start, end)?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p = parse_page_number(part)?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        pages.sort_unstable();
        Ok(PageSelection::Pages(pages))
    }
}

impl FromStr for PageSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_bounds(start: &str, end: &str) -> Result<(u32, u32)> {
    let start = parse_page_number(start)?;
    let end = parse_page_number(end)?;
    if start > end {
        return Err(Error::InvalidPageRange(format!("{}-{}", start, end)));
    }
    Ok((start, end))
}

fn parse_page_number(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "invalid page number: {:?}",
            s.trim()
        ))),
        Ok(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .lenient()
            .with_preset(ThresholdPreset::Tight)
            .with_tables(false)
            .with_toc_mode(TocMode::pattern());

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.threshold, Threshold::TIGHT);
        assert!(!options.extract_tables);
        assert!(options.extract_images);
        assert_eq!(options.toc_mode, TocMode::Pattern { page_cap: None });
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.threshold.points(), 95.0);
        assert_eq!(
            options.toc_mode,
            TocMode::Structured {
                page_cap: DEFAULT_TOC_PAGE_CAP
            }
        );
    }

    #[test]
    fn test_threshold_parse() {
        assert_eq!("tight".parse::<Threshold>().unwrap(), Threshold::TIGHT);
        assert_eq!("Standard".parse::<Threshold>().unwrap(), Threshold::STANDARD);
        assert_eq!("72".parse::<Threshold>().unwrap().points(), 72.0);
        assert_eq!("60pt".parse::<Threshold>().unwrap().points(), 60.0);
        assert!("-5".parse::<Threshold>().is_err());
        assert!("wide".parse::<Threshold>().is_err());
        assert!(Threshold::new(f32::NAN).is_err());
    }

    #[test]
    fn test_toc_mode_page_cap() {
        assert_eq!(TocMode::pattern().page_cap(), None);
        assert_eq!(TocMode::structured().page_cap(), Some(30));
        assert_eq!(TocMode::pattern().with_page_cap(5).page_cap(), Some(5));
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes(100));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));
        assert!(pages.includes(3));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("1-10").unwrap(),
            PageSelection::Range(1..=10)
        );
        assert_eq!(
            PageSelection::parse("1,3,5-7,10").unwrap(),
            PageSelection::Pages(vec![1, 3, 5, 6, 7, 10])
        );
        assert!(PageSelection::parse("0").is_err());
        assert!(PageSelection::parse("5-2").is_err());
        assert!(PageSelection::parse("x").is_err());
    }
}
