//! ZIP bundling of extracted images.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::model::ImageStore;

/// Pack every image record into a ZIP archive.
///
/// Entries are named `page{first_page}_img{n}.{ext}` and appear in
/// first-seen order. An empty store gives an empty, valid archive.
pub fn image_archive(images: &ImageStore) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, record) in images.file_names() {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&record.data)?;
    }

    let cursor = zip.finish()?;
    log::debug!("image archive: {} entries", images.len());
    Ok(cursor.into_inner())
}
