//! PDF header sniffing.
//!
//! The decoder refuses anything that does not start with a `%PDF-x.y`
//! header before handing bytes to lopdf, so that non-PDF uploads fail fast
//! with [`Error::UnknownFormat`].

use crate::error::{Error, Result};

const MAGIC: &[u8] = b"%PDF-";

/// Version information read from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfHeader {
    /// Major version digit
    pub major: u8,
    /// Minor version digit
    pub minor: u8,
}

impl PdfHeader {
    /// Version as it appears in the header, e.g. `"1.7"`.
    pub fn version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}.{}", self.major, self.minor)
    }
}

/// Read the PDF header from the start of `data`.
///
/// # Example
/// ```
/// use pdfsift::detect::sniff;
///
/// let header = sniff(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
/// assert_eq!(header.version(), "1.7");
/// assert!(sniff(b"<html></html>").is_err());
/// ```
pub fn sniff(data: &[u8]) -> Result<PdfHeader> {
    let rest = data.strip_prefix(MAGIC).ok_or(Error::UnknownFormat)?;
    match rest {
        [major, b'.', minor, ..] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(PdfHeader {
                major: major - b'0',
                minor: minor - b'0',
            })
        }
        [_, _, _, ..] => {
            let raw = String::from_utf8_lossy(&rest[..3]).to_string();
            Err(Error::UnsupportedVersion(raw))
        }
        _ => Err(Error::UnknownFormat),
    }
}

/// Check whether `data` starts with a usable PDF header.
pub fn is_pdf(data: &[u8]) -> bool {
    sniff(data).is_ok()
}
