//! Output artifacts and where they are written.
//!
//! Each artifact is produced in memory. An [`ArtifactSink`] decides where
//! the bytes go, so the analysis itself never touches the filesystem.

mod archive;
mod csv;
mod json;
mod rebuild;
mod text;

pub use archive::image_archive;
pub use csv::{toc_csv, TOC_CSV_HEADER};
pub use json::{to_json, JsonFormat};
pub use rebuild::{LayoutBlock, Reconstruction};
pub use text::to_text;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Analysis;

/// File name of the text report.
pub const REPORT_FILE: &str = "report.txt";
/// File name of the JSON analysis.
pub const JSON_FILE: &str = "analysis.json";
/// File name of the contents CSV.
pub const TOC_CSV_FILE: &str = "toc.csv";
/// File name of the image archive.
pub const IMAGES_ZIP_FILE: &str = "images.zip";
/// File name of the rebuilt PDF.
pub const REBUILT_PDF_FILE: &str = "rebuilt.pdf";

/// Destination for named output artifacts.
pub trait ArtifactSink {
    /// Store one artifact under `name`, replacing any previous one.
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Keeps artifacts in memory, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.artifacts.get(name).map(Vec::as_slice)
    }

    /// Names of all stored artifacts.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Check if nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Take the stored artifacts.
    pub fn into_inner(self) -> BTreeMap<String, Vec<u8>> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.artifacts.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Writes artifacts as files in a directory, creating it on first write.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    /// Target `dir`; nothing is created until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, bytes)?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        self.written.push(path);
        Ok(())
    }
}

/// Which artifacts [`export_all`] produces.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Text report (`report.txt`)
    pub text: bool,
    /// JSON analysis (`analysis.json`)
    pub json: bool,
    /// Contents CSV (`toc.csv`)
    pub toc_csv: bool,
    /// Image archive (`images.zip`), skipped when there are no images
    pub images_zip: bool,
    /// Rebuilt document (`rebuilt.pdf`)
    pub rebuilt_pdf: bool,
    /// JSON layout
    pub json_format: JsonFormat,
}

impl ExportOptions {
    /// All artifacts.
    pub fn new() -> Self {
        Self::default()
    }

    /// No artifacts; enable the wanted ones with the builder methods.
    pub fn none() -> Self {
        Self {
            text: false,
            json: false,
            toc_csv: false,
            images_zip: false,
            rebuilt_pdf: false,
            json_format: JsonFormat::default(),
        }
    }

    /// Set whether to write the text report.
    pub fn with_text(mut self, enabled: bool) -> Self {
        self.text = enabled;
        self
    }

    /// Set whether to write the JSON analysis.
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Set whether to write the contents CSV.
    pub fn with_toc_csv(mut self, enabled: bool) -> Self {
        self.toc_csv = enabled;
        self
    }

    /// Set whether to write the image archive.
    pub fn with_images_zip(mut self, enabled: bool) -> Self {
        self.images_zip = enabled;
        self
    }

    /// Set whether to write the rebuilt PDF.
    pub fn with_rebuilt_pdf(mut self, enabled: bool) -> Self {
        self.rebuilt_pdf = enabled;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            text: true,
            json: true,
            toc_csv: true,
            images_zip: true,
            rebuilt_pdf: true,
            json_format: JsonFormat::default(),
        }
    }
}

/// Write the selected artifacts of an analysis to a sink.
///
/// Returns the names written, in order.
pub fn export_all(
    analysis: &Analysis,
    options: &ExportOptions,
    sink: &mut dyn ArtifactSink,
) -> Result<Vec<&'static str>> {
    let mut written = Vec::new();

    if options.text {
        sink.write(REPORT_FILE, to_text(analysis).as_bytes())?;
        written.push(REPORT_FILE);
    }
    if options.json {
        sink.write(JSON_FILE, to_json(analysis, options.json_format)?.as_bytes())?;
        written.push(JSON_FILE);
    }
    if options.toc_csv {
        sink.write(TOC_CSV_FILE, toc_csv(&analysis.toc).as_bytes())?;
        written.push(TOC_CSV_FILE);
    }
    if options.images_zip && !analysis.images.is_empty() {
        sink.write(IMAGES_ZIP_FILE, &image_archive(&analysis.images)?)?;
        written.push(IMAGES_ZIP_FILE);
    }
    if options.rebuilt_pdf {
        let pdf = Reconstruction::from_classifications(&analysis.classifications).to_pdf()?;
        sink.write(REBUILT_PDF_FILE, &pdf)?;
        written.push(REBUILT_PDF_FILE);
    }

    Ok(written)
}
