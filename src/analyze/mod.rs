//! Structural analysis of decoded pages.
//!
//! Pages flow through the stages strictly in page order:
//!
//! 1. [`StructuralClassifier`] splits each page's blocks into header, body
//!    and footer by vertical position.
//! 2. [`ImageDeduplicator`] keeps the first occurrence of every embedded
//!    image.
//! 3. [`DocumentAggregator`] collects per-page results and text lines.
//! 4. [`TocDetector`] finds contents entries in the aggregated lines.
//!
//! [`Pipeline`] drives the stages and adds whole-document table
//! extraction.

mod aggregate;
mod classify;
mod dedup;
mod pipeline;
mod toc;

pub use aggregate::{Aggregate, DocumentAggregator, PageLine};
pub use classify::{classify, StructuralClassifier};
pub use dedup::ImageDeduplicator;
pub use pipeline::Pipeline;
pub use toc::TocDetector;
