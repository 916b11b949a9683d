//! In-memory zip packaging of retrieved images.

use crate::error::Result;
use crate::results::FetchedImage;
use crate::utils::unique_name;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Content type of a serialized archive
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Builds a zip archive in memory, one entry per image
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    folder: String,
    entries: Vec<String>,
    taken: HashSet<String>,
}

impl ArchiveBuilder {
    /// Create an empty archive whose entries are placed under `folder`
    pub fn new(folder: &str) -> Self {
        let folder = folder.trim_matches('/');
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            folder: if folder.is_empty() {
                String::new()
            } else {
                format!("{}/", folder)
            },
            entries: Vec::new(),
            taken: HashSet::new(),
        }
    }

    /// Add one image, renaming it on collision. Returns the entry name used.
    pub fn add(&mut self, image: &FetchedImage) -> Result<String> {
        let file_name = unique_name(&image.file_name, |n| self.taken.contains(n));
        let entry_name = format!("{}{}", self.folder, file_name);

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(entry_name.as_str(), options)?;
        self.writer.write_all(&image.bytes)?;

        ::log::debug!(
            "Added {} ({} bytes) from {}",
            entry_name,
            image.bytes.len(),
            image.url
        );

        self.taken.insert(file_name);
        self.entries.push(entry_name.clone());
        Ok(entry_name)
    }

    /// Serialize the archive, returning its bytes and entry names
    pub fn finish(self) -> Result<(Vec<u8>, Vec<String>)> {
        let cursor = self.writer.finish()?;
        Ok((cursor.into_inner(), self.entries))
    }
}
