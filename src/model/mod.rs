//! Data model for extraction results.
//!
//! Pages come out of a [`PageSource`](crate::decode::PageSource) and are
//! never modified afterwards; everything else here is derived from them by
//! the analysis stages and collected into an [`Analysis`].

mod analysis;
mod classification;
mod image;
mod notice;
mod page;
mod table;
mod toc;

pub use analysis::{Analysis, DocumentInfo};
pub use classification::{Classification, Region};
pub use image::{ExtractedImage, ImageFormat, ImageRecord, ImageStore};
pub use notice::{Notice, NoticeLevel};
pub use page::{BBox, ImageRef, Link, LinkKind, Page, PageSummary, TextBlock};
pub use table::{Grid, PageTables};
pub use toc::{DetectedToc, TocEntry};
