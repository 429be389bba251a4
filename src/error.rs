//! Error types for the pdfsift library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding, analysing or exporting a document.
///
/// Only decoding errors are fatal to a run. Image, table and per-page text
/// failures are caught by the pipeline and turned into
/// [`Notice`](crate::model::Notice)s.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The header carries a version string we cannot make sense of.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF structure could not be parsed.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Text could not be extracted from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// An embedded image could not be materialized.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Table extraction failed for the document.
    #[error("Table extraction error: {0}")]
    TableExtract(String),

    /// The ZIP archive could not be written.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Error while producing an output artifact.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A configuration value is out of its accepted domain.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageExtract(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format: not a valid PDF");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Archive(_)));
    }
}
